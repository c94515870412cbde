use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "signup")]
#[command(bin_name = "signup")]
#[command(version)]
#[command(about = "Step-by-step account registration in the terminal")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Write a diagnostics log under ~/.config/signup/diagnostics"
    )]
    pub diagnostics: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Score a password the way the wizard's strength meter does")]
    Strength {
        #[arg(help = "Password to score")]
        password: String,
    },
    #[command(about = "Run environment and configuration checks")]
    Doctor,
}

impl Command {
    /// Name safe to record in logs; never includes arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Strength { .. } => "strength",
            Self::Doctor => "doctor",
        }
    }
}
