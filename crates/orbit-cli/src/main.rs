#![forbid(unsafe_code)]

fn main() {
    orbit_cli::logging::init();
    if let Err(error) = orbit_cli::run_from_env() {
        eprintln!("orbit: {error}");
        std::process::exit(error.exit_code());
    }
}
