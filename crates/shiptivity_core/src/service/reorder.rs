//! Lane reordering engine.
//!
//! # Responsibility
//! - Resolve where a client lands when its lane and/or priority change.
//! - Apply compensating shifts in the source and destination lanes plus the
//!   client's own placement as one atomic write unit.
//!
//! # Invariants
//! - Every lane's priorities stay the dense sequence `1..=N`.
//! - Out-of-range priorities are clamped, never rejected.
//! - Requests with neither lane nor priority perform no writes.

use crate::model::client::{Client, ClientId, Lane};
use crate::repo::client_repo::{ClientRepository, RepoError, RepoResult};
use log::{error, info};
use std::time::Instant;

/// Resolved destination of a reposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub lane: Lane,
    pub priority: i64,
}

/// Resolves the target placement for `current`.
///
/// `target_lane_count` is the size of the effective target lane counted
/// before `current` leaves its slot, so it includes `current` when the lane
/// does not change. Returns `None` when the request is a no-op.
pub fn resolve_placement(
    current: &Client,
    requested_lane: Option<Lane>,
    requested_priority: Option<i64>,
    target_lane_count: i64,
) -> Option<Placement> {
    let lane = requested_lane.unwrap_or(current.lane);
    let same_lane = lane == current.lane;

    let priority = match requested_priority {
        // Same lane without a rank is a no-op even when a lane was named.
        None if same_lane => return None,
        None => target_lane_count + 1,
        Some(requested) if requested <= 0 => 1,
        Some(requested) if requested > target_lane_count => {
            if same_lane {
                target_lane_count
            } else {
                target_lane_count + 1
            }
        }
        Some(requested) => requested,
    };

    Some(Placement { lane, priority })
}

/// Moves client `id` to the requested lane and/or priority.
///
/// `id` must already be validated to exist and `requested_lane` must
/// already be a recognized lane. The source-lane decrement, destination-lane
/// increment and the client's own write run inside one transaction, so a
/// storage failure leaves every lane as it was.
///
/// Returns the record reloaded after commit.
pub fn reposition<R: ClientRepository>(
    repo: &R,
    id: ClientId,
    requested_lane: Option<Lane>,
    requested_priority: Option<i64>,
) -> RepoResult<Client> {
    if requested_lane.is_none() && requested_priority.is_none() {
        info!("event=client_reposition module=service status=noop reason=empty_request id={id}");
        return load_required(repo, id);
    }

    let started_at = Instant::now();
    let moved = repo.with_write_tx(|repo| {
        let current = load_required(repo, id)?;
        let lane = requested_lane.unwrap_or(current.lane);
        let target_lane_count = repo.count_in_lane(lane)?;

        let Some(target) =
            resolve_placement(&current, requested_lane, requested_priority, target_lane_count)
        else {
            return Ok(None);
        };

        // The second shift re-reads the lane after the first, so a move
        // within one lane only displaces clients between the two slots.
        repo.shift_lane(current.lane, current.priority, -1, id)?;
        repo.shift_lane(target.lane, target.priority, 1, id)?;
        repo.set_placement(id, target.lane, target.priority)?;

        Ok(Some((current, target)))
    });

    match moved {
        Ok(Some((from, to))) => {
            info!(
                "event=client_reposition module=service status=ok id={id} from_lane={} from_priority={} to_lane={} to_priority={} duration_ms={}",
                from.lane,
                from.priority,
                to.lane,
                to.priority,
                started_at.elapsed().as_millis()
            );
        }
        Ok(None) => {
            info!("event=client_reposition module=service status=noop reason=same_lane_no_priority id={id}");
        }
        Err(err) => {
            error!(
                "event=client_reposition module=service status=error id={id} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }
    }

    load_required(repo, id)
}

fn load_required<R: ClientRepository>(repo: &R, id: ClientId) -> RepoResult<Client> {
    repo.get_client(id)?.ok_or(RepoError::NotFound(id))
}
