//! Occupancy state machine rules.
//!
//! ```text
//!   Free --acquire(current version)--> Occupied
//!   Occupied --release(current version)--> Free
//! ```
//!
//! Event posting is not a transition. These checks run against a snapshot
//! read from the store; they reject early but do not serialize anything.
//! The conditional write in the repository is what actually decides races.

use thiserror::Error;

use crate::entities::Scooter;
use crate::value_objects::{UserId, Version};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyViolation {
    #[error("version {presented} does not match current version {current}")]
    VersionMismatch { presented: Version, current: Version },
    #[error("scooter is already occupied")]
    AlreadyOccupied,
    #[error("scooter is not occupied")]
    NotOccupied,
    #[error("scooter is occupied by another user")]
    OccupiedByAnother,
}

fn ensure_version(scooter: &Scooter, presented: &Version) -> Result<(), OccupancyViolation> {
    if scooter.version != *presented {
        return Err(OccupancyViolation::VersionMismatch {
            presented: *presented,
            current: scooter.version,
        });
    }
    Ok(())
}

/// Version first, then content: a caller holding the current version of an
/// already occupied scooter gets `AlreadyOccupied`, not a version error.
pub fn ensure_can_acquire(scooter: &Scooter, presented: &Version) -> Result<(), OccupancyViolation> {
    ensure_version(scooter, presented)?;
    if scooter.is_occupied() {
        return Err(OccupancyViolation::AlreadyOccupied);
    }
    Ok(())
}

/// Any authenticated user may release an occupied scooter; the releasing
/// user is not compared with the occupant.
pub fn ensure_can_release(scooter: &Scooter, presented: &Version) -> Result<(), OccupancyViolation> {
    ensure_version(scooter, presented)?;
    if !scooter.is_occupied() {
        return Err(OccupancyViolation::NotOccupied);
    }
    Ok(())
}

/// Applies to every event type alike. Event sequencing (start before stop
/// and so on) is not checked.
pub fn ensure_can_post_event(scooter: &Scooter, user_id: &UserId) -> Result<(), OccupancyViolation> {
    if !scooter.is_occupied() {
        return Err(OccupancyViolation::NotOccupied);
    }
    if scooter.user_id.as_ref() != Some(user_id) {
        return Err(OccupancyViolation::OccupiedByAnother);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn acquire_checks_version_before_status() {
        let occupied = Scooter::new_free(Utc::now()).occupied_by(UserId::new(), Utc::now());
        let stale = Version::fresh();

        assert!(matches!(
            ensure_can_acquire(&occupied, &stale),
            Err(OccupancyViolation::VersionMismatch { .. })
        ));
        assert_eq!(
            ensure_can_acquire(&occupied, &occupied.version),
            Err(OccupancyViolation::AlreadyOccupied)
        );
    }

    #[test]
    fn release_requires_occupied_scooter() {
        let free = Scooter::new_free(Utc::now());
        assert_eq!(
            ensure_can_release(&free, &free.version),
            Err(OccupancyViolation::NotOccupied)
        );
    }

    #[test]
    fn release_does_not_compare_releasing_user_with_occupant() {
        let occupied = Scooter::new_free(Utc::now()).occupied_by(UserId::new(), Utc::now());
        assert_eq!(ensure_can_release(&occupied, &occupied.version), Ok(()));
    }

    #[test]
    fn post_event_requires_the_occupant() {
        let occupant = UserId::new();
        let free = Scooter::new_free(Utc::now());
        assert_eq!(
            ensure_can_post_event(&free, &occupant),
            Err(OccupancyViolation::NotOccupied)
        );

        let occupied = free.occupied_by(occupant, Utc::now());
        assert_eq!(ensure_can_post_event(&occupied, &occupant), Ok(()));
        assert_eq!(
            ensure_can_post_event(&occupied, &UserId::new()),
            Err(OccupancyViolation::OccupiedByAnother)
        );
    }
}
