use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    scooters_created: AtomicU64,
    acquisitions: AtomicU64,
    releases: AtomicU64,
    version_conflicts: AtomicU64,
    invalid_transitions: AtomicU64,
    ownership_conflicts: AtomicU64,
    events_appended: AtomicU64,
}

impl Metrics {
    pub fn record_scooter_created(&self) {
        self.scooters_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_acquisition(&self) {
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_version_conflict(&self) {
        self.version_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_transition(&self) {
        self.invalid_transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ownership_conflict(&self) {
        self.ownership_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_appended(&self) {
        self.events_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn version_conflicts(&self) -> u64 {
        self.version_conflicts.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let scooters = self.scooters_created.load(Ordering::Relaxed);
        let acquisitions = self.acquisitions.load(Ordering::Relaxed);
        let releases = self.releases.load(Ordering::Relaxed);
        let conflicts = self.version_conflicts.load(Ordering::Relaxed);
        let invalid = self.invalid_transitions.load(Ordering::Relaxed);
        let ownership = self.ownership_conflicts.load(Ordering::Relaxed);
        let events = self.events_appended.load(Ordering::Relaxed);

        format!(
            "# TYPE scooter_created_total counter\n\
scooter_created_total {}\n\
# TYPE scooter_acquisitions_total counter\n\
scooter_acquisitions_total {}\n\
# TYPE scooter_releases_total counter\n\
scooter_releases_total {}\n\
# TYPE scooter_version_conflicts_total counter\n\
scooter_version_conflicts_total {}\n\
# TYPE scooter_invalid_transitions_total counter\n\
scooter_invalid_transitions_total {}\n\
# TYPE scooter_ownership_conflicts_total counter\n\
scooter_ownership_conflicts_total {}\n\
# TYPE scooter_events_appended_total counter\n\
scooter_events_appended_total {}\n",
            scooters, acquisitions, releases, conflicts, invalid, ownership, events
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_every_counter() {
        let metrics = Metrics::default();
        metrics.record_acquisition();
        metrics.record_version_conflict();
        metrics.record_version_conflict();

        let text = metrics.render_prometheus();
        assert!(text.contains("scooter_acquisitions_total 1\n"));
        assert!(text.contains("scooter_version_conflicts_total 2\n"));
        assert!(text.contains("scooter_events_appended_total 0\n"));
        assert_eq!(metrics.version_conflicts(), 2);
    }
}
