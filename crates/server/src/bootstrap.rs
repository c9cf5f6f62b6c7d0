use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use shiftbot_core::clock::SystemClock;
use shiftbot_core::config::{AppConfig, ConfigError, LoadOptions};
use shiftbot_core::controller::ConversationController;
use shiftbot_core::domain::roster::Roster;
use shiftbot_core::pending::{InMemoryPendingStore, PendingStore};
use shiftbot_sheets::auth::AuthError;
use shiftbot_sheets::gateway::SheetsGateway;
use shiftbot_whatsapp::client::{ReplySender, WhatsAppClient};

pub struct Application {
    pub config: AppConfig,
    pub controller: Arc<ConversationController<SheetsGateway>>,
    pub reply_sender: Arc<dyn ReplySender>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("sheets gateway initialization failed: {0}")]
    Sheets(#[source] AuthError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let gateway = Arc::new(
        SheetsGateway::new(
            &config.sheets.spreadsheet_id,
            &config.sheets.worksheet,
            config.sheets.credentials_json.clone(),
        )
        .map_err(BootstrapError::Sheets)?,
    );
    info!(
        event_name = "system.bootstrap.sheets_ready",
        correlation_id = "bootstrap",
        worksheet = %config.sheets.worksheet,
        "sheets gateway initialized"
    );

    let roster = Roster::new(&config.roster.user_number, &config.roster.admin_number);
    let pending: Arc<dyn PendingStore> = Arc::new(InMemoryPendingStore::new());
    let controller = Arc::new(ConversationController::new(
        roster,
        pending,
        gateway,
        Arc::new(SystemClock),
    ));

    let reply_sender: Arc<dyn ReplySender> = Arc::new(WhatsAppClient::new(
        &config.whatsapp.account_sid,
        config.whatsapp.auth_token.clone(),
        &config.whatsapp.sender_number,
    ));
    info!(
        event_name = "system.bootstrap.transport_ready",
        correlation_id = "bootstrap",
        "whatsapp transport initialized"
    );

    Ok(Application { config, controller, reply_sender })
}
