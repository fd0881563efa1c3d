use std::fmt;

use serde::{Deserialize, Serialize};

/// The signed-in user and the bearer credential issued at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub name: String,
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
