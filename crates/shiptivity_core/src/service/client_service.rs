//! Client use-case service.
//!
//! # Responsibility
//! - Expose list, get, add, reposition and audit entry points.
//! - Run input validation ahead of the reordering engine.
//!
//! # Invariants
//! - Validation failures are reported before any write is attempted.
//! - The service holds no state besides its injected repository.

use crate::model::client::{Client, Lane, NewClient};
use crate::repo::client_repo::{ClientRepository, RepoError};
use crate::service::reorder;
use crate::service::validation::{validate_id, validate_lane, InvalidId, InvalidLane};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from client service operations.
#[derive(Debug)]
pub enum ClientServiceError {
    /// Id is not an integer or no such client exists.
    InvalidId(InvalidId),
    /// Lane name is not recognized.
    InvalidLane(InvalidLane),
    /// Store failure; any in-flight write unit was rolled back.
    Repo(RepoError),
}

impl ClientServiceError {
    /// Short user-facing summary.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidId(err) => err.message(),
            Self::InvalidLane(err) => err.message(),
            Self::Repo(_) => "Storage failure.",
        }
    }

    /// User-facing explanation.
    pub fn long_message(&self) -> String {
        match self {
            Self::InvalidId(err) => err.long_message().to_string(),
            Self::InvalidLane(err) => err.long_message().to_string(),
            Self::Repo(err) => err.to_string(),
        }
    }
}

impl Display for ClientServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(err) => write!(f, "{err}"),
            Self::InvalidLane(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ClientServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidId(err) => Some(err),
            Self::InvalidLane(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ClientServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<InvalidLane> for ClientServiceError {
    fn from(value: InvalidLane) -> Self {
        Self::InvalidLane(value)
    }
}

/// Ranking defect found by [`ClientService::audit_lanes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaneViolation {
    /// Two clients share one priority.
    Duplicate { lane: Lane, priority: i64 },
    /// Priority `expected` is missing; the next present one is `found`.
    Gap {
        lane: Lane,
        expected: i64,
        found: i64,
    },
}

impl Display for LaneViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate { lane, priority } => {
                write!(f, "lane {lane} has duplicate priority {priority}")
            }
            Self::Gap {
                lane,
                expected,
                found,
            } => write!(f, "lane {lane} expected priority {expected}, found {found}"),
        }
    }
}

/// Client use-case facade.
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists clients, optionally filtered by lane name.
    pub fn list_clients(&self, lane: Option<&str>) -> Result<Vec<Client>, ClientServiceError> {
        let lane = validate_lane(lane)?;
        self.repo.list_clients(lane).map_err(Into::into)
    }

    /// Loads one client by raw id text.
    pub fn get_client(&self, raw_id: &str) -> Result<Client, ClientServiceError> {
        let id = validate_id(&self.repo, raw_id)?;
        self.repo
            .get_client(id)?
            .ok_or(RepoError::NotFound(id))
            .map_err(Into::into)
    }

    /// Adds a client at the bottom of its lane.
    pub fn add_client(&self, client: &NewClient) -> Result<Client, ClientServiceError> {
        self.repo.create_client(client).map_err(Into::into)
    }

    /// Changes a client's lane and/or priority.
    ///
    /// # Contract
    /// - Both absent: returns the current record, no writes.
    /// - Same lane, no priority: returns the current record, no writes.
    /// - Priority `<= 0` resolves to 1; above lane size resolves to the last
    ///   slot (in place) or one past it (lane change).
    pub fn reposition(
        &self,
        raw_id: &str,
        lane: Option<&str>,
        priority: Option<i64>,
    ) -> Result<Client, ClientServiceError> {
        let id = validate_id(&self.repo, raw_id)?;
        let lane = validate_lane(lane)?;
        reorder::reposition(&self.repo, id, lane, priority).map_err(Into::into)
    }

    /// Reports duplicate or missing priorities in every lane.
    pub fn audit_lanes(&self) -> Result<Vec<LaneViolation>, ClientServiceError> {
        let mut violations = Vec::new();
        for lane in Lane::ALL {
            let members = self.repo.list_clients(Some(lane))?;
            violations.extend(lane_violations(lane, &members));
        }
        Ok(violations)
    }
}

/// Checks that `members`, sorted by priority, rank exactly `1..=N`.
fn lane_violations(lane: Lane, members: &[Client]) -> Vec<LaneViolation> {
    let mut violations = Vec::new();
    let mut expected = 1;
    let mut previous = None;

    for member in members {
        if previous == Some(member.priority) {
            violations.push(LaneViolation::Duplicate {
                lane,
                priority: member.priority,
            });
            continue;
        }
        if member.priority != expected {
            violations.push(LaneViolation::Gap {
                lane,
                expected,
                found: member.priority,
            });
        }
        expected = member.priority + 1;
        previous = Some(member.priority);
    }

    violations
}
