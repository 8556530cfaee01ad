//! Configuration types for the DDNSS updater
//!
//! Settings are read once from an INI file and never mutated afterwards.
//! Every component receives the section it needs by reference.
//!
//! ```ini
//! [LOGGING]
//! logfile = /var/lib/ddnss/ipLog.txt
//! ipfile = /var/lib/ddnss/ipFile.txt
//!
//! [BUSINESS]
//! authentication_key = 0123456789abcdef
//! hostname = myhost.ddnss.de
//! allhost = all
//!
//! [MAIL]
//! smtp_port = 587
//! smtp_server = mail.example.net
//! user = updater@example.net
//! password = secret
//! recipient = ops@example.net
//! sender = updater@example.net
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Main updater configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Log file and IP store locations
    #[serde(alias = "LOGGING")]
    pub logging: LoggingSettings,

    /// Provider credentials and hostnames
    #[serde(alias = "BUSINESS")]
    pub business: BusinessSettings,

    /// Mail relay for operator notifications
    #[serde(alias = "MAIL")]
    pub mail: MailSettings,

    /// Endpoints and timeouts
    #[serde(default, alias = "NETWORK")]
    pub network: NetworkSettings,
}

impl Settings {
    /// Load settings from an INI file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let settings: Settings = config::Config::builder()
            .add_source(VerbatimIniFile::new(path))
            .build()?
            .try_deserialize()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.business.validate()?;
        self.mail.validate()?;
        self.network.validate()?;
        Ok(())
    }
}

/// INI file source that keeps every value exactly as written
///
/// `config`'s own INI format unescapes backslashes, so a key or password
/// containing `\` would change on load. Here escapes and quote stripping
/// are off; only section and key names are normalized to lowercase.
#[derive(Debug, Clone)]
struct VerbatimIniFile {
    path: PathBuf,
}

impl VerbatimIniFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl config::Source for VerbatimIniFile {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(
        &self,
    ) -> std::result::Result<config::Map<String, config::Value>, config::ConfigError> {
        let origin = self.path.display().to_string();
        let options = ini::ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ini::ParseOption::default()
        };

        let ini = ini::Ini::load_from_file_opt(&self.path, options).map_err(|e| {
            config::ConfigError::Message(format!("Failed to read {}: {}", origin, e))
        })?;

        let mut root = config::Map::new();
        for (section, properties) in ini.iter() {
            let mut table = config::Map::new();
            for (key, value) in properties.iter() {
                table.insert(key.to_lowercase(), config::Value::new(Some(&origin), value));
            }

            match section {
                Some(name) => {
                    root.insert(name.to_lowercase(), config::Value::new(Some(&origin), table));
                }
                None => root.extend(table),
            }
        }

        Ok(root)
    }
}

/// `[LOGGING]` section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Operator log file (must exist before the first run)
    pub logfile: PathBuf,

    /// IP store file (must exist before the first run)
    pub ipfile: PathBuf,
}

impl LoggingSettings {
    fn validate(&self) -> Result<()> {
        if self.logfile.as_os_str().is_empty() {
            return Err(Error::config("[LOGGING] logfile cannot be empty"));
        }
        if self.ipfile.as_os_str().is_empty() {
            return Err(Error::config("[LOGGING] ipfile cannot be empty"));
        }
        Ok(())
    }
}

/// `[BUSINESS]` section
#[derive(Clone, Deserialize)]
pub struct BusinessSettings {
    /// Provider update key
    /// ⚠️ NEVER log this value
    pub authentication_key: String,

    /// Primary hostname to update
    pub hostname: String,

    /// Second `host` parameter, passed through verbatim (usually "all")
    pub allhost: String,
}

// Custom Debug implementation that hides the update key
impl fmt::Debug for BusinessSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessSettings")
            .field("authentication_key", &"<REDACTED>")
            .field("hostname", &self.hostname)
            .field("allhost", &self.allhost)
            .finish()
    }
}

impl BusinessSettings {
    fn validate(&self) -> Result<()> {
        if self.authentication_key.is_empty() {
            return Err(Error::config("[BUSINESS] authentication_key cannot be empty"));
        }
        if self.hostname.is_empty() {
            return Err(Error::config("[BUSINESS] hostname cannot be empty"));
        }
        Ok(())
    }
}

/// `[MAIL]` section
#[derive(Clone, Deserialize)]
pub struct MailSettings {
    /// Relay port (STARTTLS, usually 587)
    pub smtp_port: u16,

    /// Relay host
    pub smtp_server: String,

    /// Login name
    pub user: String,

    /// Login password
    /// ⚠️ NEVER log this value
    pub password: String,

    /// Operator address
    pub recipient: String,

    /// From address
    pub sender: String,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("smtp_port", &self.smtp_port)
            .field("smtp_server", &self.smtp_server)
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .field("recipient", &self.recipient)
            .field("sender", &self.sender)
            .finish()
    }
}

impl MailSettings {
    fn validate(&self) -> Result<()> {
        if self.smtp_server.is_empty() {
            return Err(Error::config("[MAIL] smtp_server cannot be empty"));
        }
        if self.smtp_port == 0 {
            return Err(Error::config("[MAIL] smtp_port must be > 0"));
        }
        if !self.sender.contains('@') {
            return Err(Error::config(format!(
                "[MAIL] sender is not a mail address: {}",
                self.sender
            )));
        }
        if !self.recipient.contains('@') {
            return Err(Error::config(format!(
                "[MAIL] recipient is not a mail address: {}",
                self.recipient
            )));
        }
        Ok(())
    }
}

/// `[NETWORK]` section (optional)
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSettings {
    /// Base URL of the provider; `/meineip.php` and `/upd.php` live below it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// TCP port used by the connectivity probe
    #[serde(default = "default_probe_port")]
    pub probe_port: u16,

    /// Connectivity probe timeout (in seconds)
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Timeout for the resolver and update calls (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Timeout for the SMTP session (in seconds)
    #[serde(default = "default_smtp_timeout_secs")]
    pub smtp_timeout_secs: u64,
}

impl NetworkSettings {
    /// Host name of the provider, used as the connectivity probe target
    pub fn provider_host(&self) -> Result<String> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url {}: {}", self.base_url, e)))?;

        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| Error::config(format!("base_url has no host: {}", self.base_url)))
    }

    /// Probe timeout as a `Duration`
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// HTTP timeout as a `Duration`
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// SMTP timeout as a `Duration`
    pub fn smtp_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(Error::config(format!(
                "[NETWORK] base_url must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        self.provider_host()?;

        if self.probe_timeout_secs == 0 || self.http_timeout_secs == 0 || self.smtp_timeout_secs == 0 {
            return Err(Error::config("[NETWORK] timeouts must be > 0"));
        }
        Ok(())
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            probe_port: default_probe_port(),
            probe_timeout_secs: default_probe_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            smtp_timeout_secs: default_smtp_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.ddnss.de".to_string()
}

fn default_probe_port() -> u16 {
    80
}

fn default_probe_timeout_secs() -> u64 {
    2
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_smtp_timeout_secs() -> u64 {
    10
}
