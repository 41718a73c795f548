pub mod args;
pub mod progress;

pub use args::DeployArgs;
pub use progress::UploadProgressBar;

use console::style;

/// Success line, printed in bright green.
pub fn success_line(message: &str) -> String {
    style(message).green().bright().to_string()
}

/// Failure line, printed in bold red with an `ERROR:` prefix.
pub fn error_line(message: &str) -> String {
    style(format!("ERROR: {}", message)).red().bold().to_string()
}

/// Initialize tracing for the CLI. Logs go to stderr so `--json` output stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
