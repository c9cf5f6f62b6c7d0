pub mod admin;
pub mod clock;
pub mod config;
pub mod controller;
pub mod domain;
pub mod gateway;
pub mod intent;
pub mod parse;
pub mod pay;
pub mod pending;
pub mod replies;

pub use admin::{parse_admin_command, AdminCommand, ADMIN_PREFIX};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use controller::ConversationController;
pub use domain::roster::{Role, Roster, RosterEntry};
pub use domain::shift::{ShiftCategory, ShiftRecord};
pub use gateway::{GatewayError, SheetStats, StoredEntry, TimesheetGateway};
pub use intent::{Intent, IntentMatcher};
pub use parse::{parse_shift_message, ShiftParseError};
pub use pending::{InMemoryPendingStore, PendingAction, PendingKind, PendingStore};
