//! Boundary checks for client ids and lane names.
//!
//! # Invariants
//! - Validation never writes.
//! - Priority values are not validated here; the reordering engine clamps them.

use crate::model::client::{ClientId, Lane};
use crate::repo::client_repo::ClientRepository;
use crate::service::client_service::ClientServiceError;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

const INVALID_ID_MESSAGE: &str = "Invalid id provided.";
const INVALID_LANE_MESSAGE: &str = "Invalid status provided.";
const INVALID_LANE_LONG_MESSAGE: &str =
    "Status can only be one of the following: [backlog | in-progress | complete].";

/// Why an id was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidIdReason {
    NotANumber,
    NotFound,
}

/// Rejected client id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidId {
    pub raw: String,
    pub reason: InvalidIdReason,
}

impl InvalidId {
    pub fn message(&self) -> &'static str {
        INVALID_ID_MESSAGE
    }

    pub fn long_message(&self) -> &'static str {
        match self.reason {
            InvalidIdReason::NotANumber => "Id can only be integer.",
            InvalidIdReason::NotFound => "Cannot find client with that id.",
        }
    }
}

impl Display for InvalidId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            InvalidIdReason::NotANumber => write!(f, "client id `{}` is not an integer", self.raw),
            InvalidIdReason::NotFound => write!(f, "client not found: {}", self.raw),
        }
    }
}

impl Error for InvalidId {}

/// Rejected lane name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLane {
    pub value: String,
}

impl InvalidLane {
    pub fn message(&self) -> &'static str {
        INVALID_LANE_MESSAGE
    }

    pub fn long_message(&self) -> &'static str {
        INVALID_LANE_LONG_MESSAGE
    }
}

impl Display for InvalidLane {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid lane `{}`", self.value)
    }
}

impl Error for InvalidLane {}

/// Parses `raw` as a client id and checks that the client exists.
///
/// # Side effects
/// - One point lookup against the store.
pub fn validate_id<R: ClientRepository>(
    repo: &R,
    raw: &str,
) -> Result<ClientId, ClientServiceError> {
    let id = raw
        .trim()
        .parse::<ClientId>()
        .map_err(|_| reject_id(raw, InvalidIdReason::NotANumber))?;

    if repo.get_client(id)?.is_none() {
        return Err(reject_id(raw, InvalidIdReason::NotFound));
    }
    Ok(id)
}

/// Accepts a recognized lane name or absence.
pub fn validate_lane(raw: Option<&str>) -> Result<Option<Lane>, InvalidLane> {
    match raw {
        None => Ok(None),
        Some(value) => value.parse::<Lane>().map(Some).map_err(|err| {
            debug!("event=client_validation module=service status=rejected field=status");
            InvalidLane { value: err.value }
        }),
    }
}

fn reject_id(raw: &str, reason: InvalidIdReason) -> ClientServiceError {
    debug!("event=client_validation module=service status=rejected field=id reason={reason:?}");
    ClientServiceError::InvalidId(InvalidId {
        raw: raw.to_string(),
        reason,
    })
}
