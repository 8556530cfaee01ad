// # ddnss-updater
//
// Runs one check-update-notify cycle and exits. Meant to be started by an
// external scheduler (cron, systemd timer); runs must not overlap.
//
// The binary is responsible for:
// 1. Parsing the command line
// 2. Checking that the config, log and IP files exist
// 3. Loading and validating configuration
// 4. Wiring the components and running the controller once
//
// All cycle logic lives in ddnss-core.
//
// ## Usage
//
// ```bash
// ddnss-updater /etc/ddnss/updater.ini
// ddnss-updater --dry-run --log-level debug /etc/ddnss/updater.ini
// ```
//
// ## Environment
//
// - `DDNSS_LOG_LEVEL`: stderr diagnostics level (trace, debug, info, warn, error)

use anyhow::Result;
use clap::Parser;
use ddnss_core::preflight;
use ddnss_core::{FileIpStore, Journal, RunController, Settings, TcpConnectivityProbe};
use ddnss_ip_http::HttpAddressResolver;
use ddnss_notify_smtp::SmtpNotifier;
use ddnss_provider::DdnssProvider;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: The cycle ran (its outcome is in the operator log)
/// - 1: A required file is missing or the configuration is invalid
/// - 2: The process could not set itself up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdaterExitCode {
    /// The cycle ran to a terminal state
    Completed = 0,
    /// Missing file or bad configuration
    PreconditionFailed = 1,
    /// Runtime or logging setup failed
    RuntimeError = 2,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Update a ddnss.de hostname when the public IP changes
#[derive(Debug, Parser)]
#[command(name = "ddnss-updater", version, about, long_about = None)]
struct Cli {
    /// Path to the INI configuration file
    config: PathBuf,

    /// Resolve and compare, but do not call the provider or write the IP file
    #[arg(long)]
    dry_run: bool,

    /// Level for diagnostics printed to stderr
    #[arg(long, env = "DDNSS_LOG_LEVEL", default_value = "info")]
    log_level: Level,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Preconditions are reported on stdout: the operator log may not exist yet
    let settings = match startup(&cli.config) {
        Ok(settings) => settings,
        Err(diagnostic) => {
            println!("{}", diagnostic);
            return UpdaterExitCode::PreconditionFailed.into();
        }
    };

    let controller = match build_controller(&settings, cli.dry_run) {
        Ok(controller) => controller,
        Err(e) => {
            println!("{}", preflight::diagnostic(&e.to_string()));
            return UpdaterExitCode::PreconditionFailed.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return UpdaterExitCode::RuntimeError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return UpdaterExitCode::RuntimeError.into();
        }
    };

    let outcome = rt.block_on(controller.run());
    info!("Cycle finished: {:?}", outcome);

    UpdaterExitCode::Completed.into()
}

/// Check the files the run depends on and load the configuration
///
/// Returns the diagnostic line to print on failure.
fn startup(config_path: &Path) -> std::result::Result<Settings, String> {
    preflight::require_file(config_path, "ConfigFile").map_err(|e| e.to_string())?;

    let settings = Settings::load(config_path)
        .and_then(|settings| settings.validate().map(|_| settings))
        .map_err(|e| preflight::diagnostic(&e.to_string()))?;

    preflight::check_files(&settings).map_err(|e| e.to_string())?;

    Ok(settings)
}

/// Wire the concrete components into a run controller
fn build_controller(settings: &Settings, dry_run: bool) -> Result<RunController> {
    let network = &settings.network;

    let notifier = SmtpNotifier::from_settings(&settings.mail, network)?;
    let journal = Journal::new(&settings.logging.logfile, Arc::new(notifier));

    let controller = RunController::new(
        Box::new(TcpConnectivityProbe::new(
            network.probe_port,
            network.probe_timeout(),
        )),
        Box::new(HttpAddressResolver::from_settings(network)?),
        Box::new(DdnssProvider::from_settings(&settings.business, network)?),
        Box::new(FileIpStore::new(&settings.logging.ipfile)),
        journal,
        network.provider_host()?,
    )
    .with_dry_run(dry_run);

    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, create_log: bool, create_ip: bool) -> PathBuf {
        let logfile = dir.path().join("ipLog.txt");
        let ipfile = dir.path().join("ipFile.txt");
        if create_log {
            fs::write(&logfile, "").unwrap();
        }
        if create_ip {
            fs::write(&ipfile, "10.0.0.1\n").unwrap();
        }

        let config = dir.path().join("updater.ini");
        fs::write(
            &config,
            format!(
                "[LOGGING]\nlogfile = {}\nipfile = {}\n\n\
                 [BUSINESS]\nauthentication_key = abc123\nhostname = myhost.ddnss.de\nallhost = all\n\n\
                 [MAIL]\nsmtp_port = 587\nsmtp_server = mail.example.net\nuser = u\npassword = p\n\
                 recipient = ops@example.net\nsender = updater@example.net\n",
                logfile.display(),
                ipfile.display()
            ),
        )
        .unwrap();
        config
    }

    #[test]
    fn test_cli_parses_positional_config() {
        let cli = Cli::try_parse_from(["ddnss-updater", "--dry-run", "/etc/ddnss.ini"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/ddnss.ini"));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_requires_config() {
        assert!(Cli::try_parse_from(["ddnss-updater"]).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let err = startup(&dir.path().join("absent.ini")).unwrap_err();
        assert!(err.ends_with("ConfigFile does not exist"));
    }

    #[test]
    fn test_missing_log_file() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, false, true);

        let err = startup(&config).unwrap_err();
        assert!(err.ends_with("LogFile does not exist"));
    }

    #[test]
    fn test_missing_ip_file_writes_no_log_entry() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, true, false);

        let err = startup(&config).unwrap_err();
        assert!(err.starts_with("DEBUG "));
        assert!(err.ends_with("IpFile does not exist"));
        assert_eq!(fs::read_to_string(dir.path().join("ipLog.txt")).unwrap(), "");
    }

    #[test]
    fn test_complete_setup_builds_controller() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, true, true);

        let settings = startup(&config).unwrap();
        assert!(build_controller(&settings, false).is_ok());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(UpdaterExitCode::Completed as u8, 0);
        assert_eq!(UpdaterExitCode::PreconditionFailed as u8, 1);
        assert_eq!(UpdaterExitCode::RuntimeError as u8, 2);
    }
}
