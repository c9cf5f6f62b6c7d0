use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layered configuration: defaults, then an optional TOML file, then
/// `SHIFTBOT_*` environment variables (with provider-native aliases), then
/// programmatic overrides, validated last.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub sheets: SheetsConfig,
    pub whatsapp: WhatsAppConfig,
    pub roster: RosterConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub worksheet: String,
    /// The service-account key JSON, verbatim.
    pub credentials_json: SecretString,
}

#[derive(Clone, Debug)]
pub struct WhatsAppConfig {
    pub account_sid: String,
    pub auth_token: SecretString,
    /// The provider-side sender, e.g. `whatsapp:+14155238886`.
    pub sender_number: String,
}

#[derive(Clone, Debug)]
pub struct RosterConfig {
    pub user_number: String,
    pub admin_number: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub webhook_port: u16,
    pub health_check_port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub spreadsheet_id: Option<String>,
    pub worksheet: Option<String>,
    pub sheets_credentials: Option<String>,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub sender_number: Option<String>,
    pub user_number: Option<String>,
    pub admin_number: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheets: SheetsConfig {
                spreadsheet_id: String::new(),
                worksheet: "Timesheet".to_string(),
                credentials_json: String::new().into(),
            },
            whatsapp: WhatsAppConfig {
                account_sid: String::new(),
                auth_token: String::new().into(),
                sender_number: String::new(),
            },
            roster: RosterConfig { user_number: String::new(), admin_number: String::new() },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                webhook_port: 3000,
                health_check_port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shiftbot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(sheets) = patch.sheets {
            if let Some(spreadsheet_id) = sheets.spreadsheet_id {
                self.sheets.spreadsheet_id = spreadsheet_id;
            }
            if let Some(worksheet) = sheets.worksheet {
                self.sheets.worksheet = worksheet;
            }
            if let Some(credentials_json) = sheets.credentials_json {
                self.sheets.credentials_json = credentials_json.into();
            }
        }

        if let Some(whatsapp) = patch.whatsapp {
            if let Some(account_sid) = whatsapp.account_sid {
                self.whatsapp.account_sid = account_sid;
            }
            if let Some(auth_token) = whatsapp.auth_token {
                self.whatsapp.auth_token = auth_token.into();
            }
            if let Some(sender_number) = whatsapp.sender_number {
                self.whatsapp.sender_number = sender_number;
            }
        }

        if let Some(roster) = patch.roster {
            if let Some(user_number) = roster.user_number {
                self.roster.user_number = user_number;
            }
            if let Some(admin_number) = roster.admin_number {
                self.roster.admin_number = admin_number;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(webhook_port) = server.webhook_port {
                self.server.webhook_port = webhook_port;
            }
            if let Some(health_check_port) = server.health_check_port {
                self.server.health_check_port = health_check_port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHIFTBOT_SHEETS_SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = value;
        }
        if let Some(value) = read_env("SHIFTBOT_SHEETS_WORKSHEET") {
            self.sheets.worksheet = value;
        }
        let credentials =
            read_env("SHIFTBOT_SHEETS_CREDENTIALS").or_else(|| read_env("GOOGLE_CREDENTIALS"));
        if let Some(value) = credentials {
            self.sheets.credentials_json = value.into();
        }

        let account_sid =
            read_env("SHIFTBOT_WHATSAPP_ACCOUNT_SID").or_else(|| read_env("TWILIO_ACCOUNT_SID"));
        if let Some(value) = account_sid {
            self.whatsapp.account_sid = value;
        }
        let auth_token =
            read_env("SHIFTBOT_WHATSAPP_AUTH_TOKEN").or_else(|| read_env("TWILIO_AUTH_TOKEN"));
        if let Some(value) = auth_token {
            self.whatsapp.auth_token = value.into();
        }
        let sender_number = read_env("SHIFTBOT_WHATSAPP_SENDER")
            .or_else(|| read_env("TWILIO_WHATSAPP_NUMBER"));
        if let Some(value) = sender_number {
            self.whatsapp.sender_number = value;
        }

        if let Some(value) = read_env("SHIFTBOT_ROSTER_USER_NUMBER") {
            self.roster.user_number = value;
        }
        if let Some(value) = read_env("SHIFTBOT_ROSTER_ADMIN_NUMBER") {
            self.roster.admin_number = value;
        }

        if let Some(value) = read_env("SHIFTBOT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SHIFTBOT_SERVER_WEBHOOK_PORT") {
            self.server.webhook_port = parse_u16("SHIFTBOT_SERVER_WEBHOOK_PORT", &value)?;
        }
        if let Some(value) = read_env("SHIFTBOT_SERVER_HEALTH_CHECK_PORT") {
            self.server.health_check_port = parse_u16("SHIFTBOT_SERVER_HEALTH_CHECK_PORT", &value)?;
        }
        if let Some(value) = read_env("SHIFTBOT_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SHIFTBOT_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level = read_env("SHIFTBOT_LOGGING_LEVEL").or_else(|| read_env("SHIFTBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHIFTBOT_LOGGING_FORMAT").or_else(|| read_env("SHIFTBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(spreadsheet_id) = overrides.spreadsheet_id {
            self.sheets.spreadsheet_id = spreadsheet_id;
        }
        if let Some(worksheet) = overrides.worksheet {
            self.sheets.worksheet = worksheet;
        }
        if let Some(sheets_credentials) = overrides.sheets_credentials {
            self.sheets.credentials_json = sheets_credentials.into();
        }
        if let Some(account_sid) = overrides.account_sid {
            self.whatsapp.account_sid = account_sid;
        }
        if let Some(auth_token) = overrides.auth_token {
            self.whatsapp.auth_token = auth_token.into();
        }
        if let Some(sender_number) = overrides.sender_number {
            self.whatsapp.sender_number = sender_number;
        }
        if let Some(user_number) = overrides.user_number {
            self.roster.user_number = user_number;
        }
        if let Some(admin_number) = overrides.admin_number {
            self.roster.admin_number = admin_number;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sheets(&self.sheets)?;
        validate_whatsapp(&self.whatsapp)?;
        validate_roster(&self.roster)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shiftbot.toml"), PathBuf::from("config/shiftbot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_sheets(sheets: &SheetsConfig) -> Result<(), ConfigError> {
    if sheets.spreadsheet_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sheets.spreadsheet_id is required (the id from the spreadsheet URL)".to_string(),
        ));
    }
    if sheets.worksheet.trim().is_empty() {
        return Err(ConfigError::Validation("sheets.worksheet must not be empty".to_string()));
    }

    let credentials = sheets.credentials_json.expose_secret();
    if credentials.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sheets.credentials_json is required. Set SHIFTBOT_SHEETS_CREDENTIALS (or \
             GOOGLE_CREDENTIALS) to the service-account key JSON"
                .to_string(),
        ));
    }
    if !credentials.trim_start().starts_with('{') {
        return Err(ConfigError::Validation(
            "sheets.credentials_json must be the key JSON itself, not a file path".to_string(),
        ));
    }

    Ok(())
}

fn validate_whatsapp(whatsapp: &WhatsAppConfig) -> Result<(), ConfigError> {
    if whatsapp.account_sid.trim().is_empty() {
        return Err(ConfigError::Validation(
            "whatsapp.account_sid is required. Get it from the provider console".to_string(),
        ));
    }
    if !whatsapp.account_sid.starts_with("AC") {
        return Err(ConfigError::Validation(
            "whatsapp.account_sid must start with `AC` (hint: the auth token is a separate value)"
                .to_string(),
        ));
    }

    if whatsapp.auth_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation("whatsapp.auth_token is required".to_string()));
    }

    if !whatsapp.sender_number.starts_with("whatsapp:+") {
        return Err(ConfigError::Validation(
            "whatsapp.sender_number must look like `whatsapp:+14155238886`".to_string(),
        ));
    }

    Ok(())
}

fn validate_roster(roster: &RosterConfig) -> Result<(), ConfigError> {
    for (key, number) in
        [("roster.user_number", &roster.user_number), ("roster.admin_number", &roster.admin_number)]
    {
        if !number.starts_with('+') {
            return Err(ConfigError::Validation(format!(
                "{key} must be an E.164 number starting with `+`"
            )));
        }
    }
    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.webhook_port == 0 {
        return Err(ConfigError::Validation(
            "server.webhook_port must be greater than zero".to_string(),
        ));
    }
    if server.health_check_port == 0 {
        return Err(ConfigError::Validation(
            "server.health_check_port must be greater than zero".to_string(),
        ));
    }
    if server.webhook_port == server.health_check_port {
        return Err(ConfigError::Validation(
            "server.webhook_port and server.health_check_port must differ so the health \
             endpoint stays reachable on its own listener"
                .to_string(),
        ));
    }
    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    sheets: Option<SheetsPatch>,
    whatsapp: Option<WhatsAppPatch>,
    roster: Option<RosterPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SheetsPatch {
    spreadsheet_id: Option<String>,
    worksheet: Option<String>,
    credentials_json: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WhatsAppPatch {
    account_sid: Option<String>,
    auth_token: Option<String>,
    sender_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RosterPatch {
    user_number: Option<String>,
    admin_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    webhook_port: Option<u16>,
    health_check_port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    fn valid_overrides() -> ConfigOverrides {
        ConfigOverrides {
            spreadsheet_id: Some("sheet-1".to_string()),
            sheets_credentials: Some("{\"client_email\":\"svc@example\"}".to_string()),
            account_sid: Some("AC0123456789".to_string()),
            auth_token: Some("token-value".to_string()),
            sender_number: Some("whatsapp:+14155238886".to_string()),
            user_number: Some("+447700900001".to_string()),
            admin_number: Some("+447700900002".to_string()),
            ..ConfigOverrides::default()
        }
    }

    #[test]
    fn overrides_on_top_of_defaults_produce_a_valid_config() -> Result<(), String> {
        let config =
            AppConfig::load(LoadOptions { overrides: valid_overrides(), ..LoadOptions::default() })
                .map_err(|err| format!("config load failed: {err}"))?;

        if config.sheets.worksheet != "Timesheet" {
            return Err("default worksheet should survive".to_string());
        }
        if config.logging.format != LogFormat::Compact {
            return Err("default logging format should be compact".to_string());
        }
        Ok(())
    }

    #[test]
    fn file_patch_fills_sections_and_overrides_win() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("shiftbot.toml");
        fs::write(
            &path,
            r#"
[sheets]
spreadsheet_id = "from-file"
worksheet = "PAYE Tracker"

[roster]
user_number = "+447700900001"
admin_number = "+447700900002"

[logging]
level = "warn"
"#,
        )
        .map_err(|err| err.to_string())?;

        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            overrides: ConfigOverrides {
                spreadsheet_id: Some("from-override".to_string()),
                ..valid_overrides()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        if config.sheets.spreadsheet_id != "from-override" {
            return Err("override spreadsheet id should win over the file".to_string());
        }
        if config.sheets.worksheet != "PAYE Tracker" {
            return Err("file worksheet should apply".to_string());
        }
        if config.logging.level != "warn" {
            return Err("file log level should apply".to_string());
        }
        Ok(())
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some("does/not/exist.toml".into()),
            require_file: true,
            overrides: valid_overrides(),
        });

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn account_sid_validation_carries_a_hint() {
        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                account_sid: Some("not-a-sid".to_string()),
                ..valid_overrides()
            },
            ..LoadOptions::default()
        });

        let error = result.err().map(|err| err.to_string()).unwrap_or_default();
        assert!(error.contains("whatsapp.account_sid"));
        assert!(error.contains("AC"));
    }

    #[test]
    fn clashing_ports_are_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("shiftbot.toml");
        fs::write(
            &path,
            r#"
[server]
webhook_port = 9000
health_check_port = 9000
"#,
        )
        .expect("write config");

        let result = AppConfig::load(LoadOptions {
            config_path: Some(path),
            overrides: valid_overrides(),
            ..LoadOptions::default()
        });

        let error = result.err().map(|err| err.to_string()).unwrap_or_default();
        assert!(error.contains("must differ"));
    }

    #[test]
    fn secrets_do_not_leak_through_debug() -> Result<(), String> {
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                auth_token: Some("super-secret-token".to_string()),
                ..valid_overrides()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        let debug = format!("{config:?}");
        if debug.contains("super-secret-token") {
            return Err("debug output should not contain the auth token".to_string());
        }
        if config.whatsapp.auth_token.expose_secret() != "super-secret-token" {
            return Err("expose_secret should still return the token".to_string());
        }
        Ok(())
    }
}
