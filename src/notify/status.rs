//! Announced status values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The status last communicated to the operator.
///
/// This is not the status last observed: it only changes when a DOWN or UP
/// transition is announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnnouncedStatus {
    #[default]
    Up,
    Down,
}

impl AnnouncedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnouncedStatus::Up => "UP",
            AnnouncedStatus::Down => "DOWN",
        }
    }
}

impl fmt::Display for AnnouncedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnouncedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "UP" => Ok(AnnouncedStatus::Up),
            "DOWN" => Ok(AnnouncedStatus::Down),
            other => Err(format!("unknown announced status: {:?}", other)),
        }
    }
}
