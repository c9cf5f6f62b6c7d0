//! Privileged maintenance commands, reachable only for the admin identity.
//! Everything here is read-only against persisted data except `clear`, which
//! touches nothing but the in-memory pending set.

pub const ADMIN_PREFIX: &str = "admin";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminCommand {
    Help,
    Status,
    Stats,
    Test,
    Clear,
    Last,
    Unknown(String),
}

/// Parses the text after the admin prefix. A bare "admin" gets the help
/// listing rather than an unknown-command complaint.
pub fn parse_admin_command(message: &str) -> AdminCommand {
    let rest = message.strip_prefix(ADMIN_PREFIX).unwrap_or(message).trim();
    match rest {
        "" | "help" => AdminCommand::Help,
        "status" => AdminCommand::Status,
        "stats" => AdminCommand::Stats,
        "test" => AdminCommand::Test,
        "clear" => AdminCommand::Clear,
        "last" => AdminCommand::Last,
        other => AdminCommand::Unknown(other.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_admin_command, AdminCommand};

    #[test]
    fn known_subcommands_parse() {
        assert_eq!(parse_admin_command("admin status"), AdminCommand::Status);
        assert_eq!(parse_admin_command("admin stats"), AdminCommand::Stats);
        assert_eq!(parse_admin_command("admin test"), AdminCommand::Test);
        assert_eq!(parse_admin_command("admin clear"), AdminCommand::Clear);
        assert_eq!(parse_admin_command("admin last"), AdminCommand::Last);
    }

    #[test]
    fn bare_prefix_and_help_both_list_commands() {
        assert_eq!(parse_admin_command("admin"), AdminCommand::Help);
        assert_eq!(parse_admin_command("admin help"), AdminCommand::Help);
    }

    #[test]
    fn anything_else_is_reported_back_verbatim() {
        assert_eq!(
            parse_admin_command("admin reboot"),
            AdminCommand::Unknown("reboot".to_owned())
        );
    }
}
