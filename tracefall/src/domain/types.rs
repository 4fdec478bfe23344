//! Domain types providing compile-time safety and self-documentation

use serde::Deserialize;
use std::fmt;

/// Process identifier
///
/// Unique key into a trace dataset's process mapping. Kept as a string
/// because the JSON wire format uses string keys; PIDs are opaque labels
/// here, not kernel PIDs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Pid(pub String);

impl Pid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Pid {
    fn from(pid: &str) -> Self {
        Pid(pid.to_string())
    }
}

impl From<String> for Pid {
    fn from(pid: String) -> Self {
        Pid(pid)
    }
}
