fn main() {
    if let Err(error) = signup_cli::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
