use serde::{Deserialize, Serialize};

/// Static allow-list of channel identities. Exactly one standard user and one
/// admin; everyone else is rejected before any parsing happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    StandardUser,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::StandardUser => "user",
            Self::Admin => "admin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub identity: String,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(user_identity: impl Into<String>, admin_identity: impl Into<String>) -> Self {
        Self {
            entries: vec![
                RosterEntry { identity: admin_identity.into(), role: Role::Admin },
                RosterEntry { identity: user_identity.into(), role: Role::StandardUser },
            ],
        }
    }

    /// Admin wins when the same identity carries both roles.
    pub fn role_of(&self, sender_id: &str) -> Option<Role> {
        self.entries.iter().find(|entry| entry.identity == sender_id).map(|entry| entry.role)
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }
}
