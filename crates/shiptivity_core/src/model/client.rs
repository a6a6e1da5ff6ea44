//! Client record and lane enumeration.
//!
//! # Responsibility
//! - Define the record the reordering engine moves between lanes.
//! - Own the closed set of lane names and their wire spelling.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `priority` is 1-based; 1 is the top of the lane.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned client identifier.
pub type ClientId = i64;

/// One of the three swimlanes a client can sit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lane {
    Backlog,
    InProgress,
    Complete,
}

impl Lane {
    /// All lanes in board order.
    pub const ALL: [Lane; 3] = [Lane::Backlog, Lane::InProgress, Lane::Complete];

    /// Stored and user-facing spelling, e.g. `in-progress`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
        }
    }
}

impl Display for Lane {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneParseError {
    pub value: String,
}

impl Display for LaneParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown lane `{}`; expected backlog|in-progress|complete",
            self.value
        )
    }
}

impl Error for LaneParseError {}

impl FromStr for Lane {
    type Err = LaneParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "backlog" => Ok(Self::Backlog),
            "in-progress" => Ok(Self::InProgress),
            "complete" => Ok(Self::Complete),
            other => Err(LaneParseError {
                value: other.to_string(),
            }),
        }
    }
}

/// Persisted client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub description: Option<String>,
    /// Serialized as `status` to match the stored column name.
    #[serde(rename = "status")]
    pub lane: Lane,
    pub priority: i64,
}

/// Input for adding a client at the bottom of a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub description: Option<String>,
    pub lane: Lane,
}

impl NewClient {
    pub fn new(name: impl Into<String>, lane: Lane) -> Self {
        Self {
            name: name.into(),
            description: None,
            lane,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
