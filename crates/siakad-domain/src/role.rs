//! User role domain type.

use serde::{Deserialize, Serialize};

/// Access level attached to every user.
///
/// Wire format: `"USER"` / `"ADMIN"`, in JSON bodies, token claims, and the
/// database alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Parse the wire name. Returns `None` for unknown values.
    pub fn parse(v: &str) -> Option<Self> {
        match v {
            "USER" => Some(Self::User),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    /// The wire name of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}
