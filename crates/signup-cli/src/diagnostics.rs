use std::backtrace::Backtrace;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use env_logger::{Env, Target};

static HOOK_ONCE: Once = Once::new();
static LOG_FILE: OnceLock<Mutex<Option<(PathBuf, File)>>> = OnceLock::new();

fn log_file() -> &'static Mutex<Option<(PathBuf, File)>> {
    LOG_FILE.get_or_init(|| Mutex::new(None))
}

fn epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Owns the optional diagnostics log for one process run.
///
/// When enabled, the `log` facade is routed into the same file through
/// `env_logger`; `RUST_LOG` overrides the default `info` filter.
pub struct DiagnosticsSession {
    path: Option<PathBuf>,
}

impl DiagnosticsSession {
    pub fn initialize(enabled: bool) -> Result<Self> {
        install_panic_hook();
        if !enabled {
            return Ok(Self { path: None });
        }

        let config_path = signup_core::config::resolve_config_path()
            .context("failed to resolve signup config path for diagnostics")?;
        let path = create_log_path(&config_path)?;
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("failed to create diagnostics log at {}", path.display()))?;

        writeln!(
            file,
            "signup diagnostics start\nversion={}\nstart_epoch_ms={}\npid={}",
            env!("CARGO_PKG_VERSION"),
            epoch_ms(),
            std::process::id()
        )
        .with_context(|| format!("failed to write diagnostics header to {}", path.display()))?;

        let logger_file = file
            .try_clone()
            .with_context(|| format!("failed to share diagnostics log {}", path.display()))?;
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .target(Target::Pipe(Box::new(logger_file)))
            .format_timestamp_millis()
            .try_init()
            .context("failed to install diagnostics logger")?;

        *log_file().lock().unwrap_or_else(PoisonError::into_inner) = Some((path.clone(), file));
        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn record<S: AsRef<str>>(&self, entry: S) {
        append_line(entry.as_ref());
    }
}

fn install_panic_hook() {
    HOOK_ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            let location = panic_info
                .location()
                .map(|value| format!("{}:{}:{}", value.file(), value.line(), value.column()))
                .unwrap_or_else(|| "unknown".to_string());

            append_line("panic captured");
            append_line(format!("panic_message={}", panic_payload(panic_info)));
            append_line(format!("panic_location={location}"));
            append_line(format!("panic_backtrace={:?}", Backtrace::force_capture()));

            let path = log_file()
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .map(|(path, _)| path.clone());

            eprintln!("Fatal internal error in signup.");
            match path {
                Some(path) => eprintln!("Diagnostics written to {}", path.display()),
                None => eprintln!("Run `signup --diagnostics` to capture a diagnostics log."),
            }
        }));
    });
}

fn panic_payload(panic_info: &std::panic::PanicHookInfo<'_>) -> String {
    if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
        return (*payload).to_string();
    }
    if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
        return payload.clone();
    }
    "unknown panic payload".to_string()
}

fn append_line<S: AsRef<str>>(line: S) {
    let mut guard = log_file().lock().unwrap_or_else(PoisonError::into_inner);
    let Some((_, file)) = guard.as_mut() else {
        return;
    };

    let _ = writeln!(file, "[{}] {}", epoch_ms(), line.as_ref());
    let _ = file.flush();
}

/// `<config dir>/diagnostics/<epoch_ms>.log`, creating the directory.
fn create_log_path(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path.parent().ok_or_else(|| {
        anyhow!(
            "failed to resolve diagnostics directory from config path {}",
            config_path.display()
        )
    })?;

    let diagnostics_dir = config_dir.join("diagnostics");
    fs::create_dir_all(&diagnostics_dir).with_context(|| {
        format!(
            "failed to create diagnostics directory {}",
            diagnostics_dir.display()
        )
    })?;

    Ok(diagnostics_dir.join(format!("{}.log", epoch_ms())))
}
