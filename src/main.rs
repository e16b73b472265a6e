use clap::{ArgAction, Parser};
use fkm_config::{Overrides, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialise and populate a Keymapp database with metadata and layout
/// information, so Keymapp can run without network access.
#[derive(Debug, Parser)]
#[command(name = "fkm", version, about)]
struct Cli {
    /// Link to the configure.zsa.io page for the layout
    #[arg(long, value_name = "URL")]
    layout: String,
    /// Path to the Keymapp config database [default: ~/.config/.keymapp/keymapp.sqlite3]
    #[arg(long, value_name = "FILE")]
    path: Option<PathBuf>,
    /// Create the database's parent directories if missing [default: true]
    #[arg(long, value_name = "BOOL")]
    mkdir: Option<bool>,
    /// Config file to load instead of the default one
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace); overridden by RUST_LOG
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = Overrides { database: cli.path, mkdir: cli.mkdir };
    let settings = match Settings::load(cli.config.as_deref(), &overrides) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load configuration: {err:?}");
            return ExitCode::FAILURE;
        }
    };
    match fkm::run(&settings, &cli.layout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("failed to synchronize layout: {err:?}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind as ClapErrorKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_layout_is_required() {
        let err = Cli::try_parse_from(["fkm"]).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "fkm",
            "--layout",
            "https://configure.zsa.io/ErgoDox/layouts/abcd1234/efgh5678/",
            "--path",
            "/tmp/keymapp.sqlite3",
            "--mkdir",
            "false",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.layout, "https://configure.zsa.io/ErgoDox/layouts/abcd1234/efgh5678/");
        assert_eq!(cli.path, Some(PathBuf::from("/tmp/keymapp.sqlite3")));
        assert_eq!(cli.mkdir, Some(false));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_optional_arguments_default_to_none() {
        let cli = Cli::try_parse_from(["fkm", "--layout", "https://configure.zsa.io/a/b/c/d"]).unwrap();
        assert_eq!(cli.path, None);
        assert_eq!(cli.mkdir, None);
        assert_eq!(cli.config, None);
    }
}
