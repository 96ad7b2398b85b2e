//! Entry point consumed by the dashboard
//!
//! Each call to [`NotificationCenter::feed`] reruns the whole pipeline from the
//! given sources; only the read marker survives between passes.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    notification::Notification,
    services::{present, Aggregator, EligibilityFilter, NotificationFeed},
    store::{ReadMarker, ReadMarkerStore},
    types::{EngineConfig, NotificationSources},
};

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Derive the unsorted, eligibility-filtered notifications for `sources` at `now`.
pub fn derive_notifications(
    sources: &NotificationSources,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<Notification> {
    let aggregator = Aggregator::new(
        config.settlement,
        EligibilityFilter::new(config.significant_decimals),
    );
    aggregator.aggregate(sources, now)
}

/// Notification feed plus the persisted read marker
pub struct NotificationCenter<S, C = SystemClock> {
    config: EngineConfig,
    clock: C,
    marker: ReadMarker<S>,
}

impl<S: ReadMarkerStore> NotificationCenter<S, SystemClock> {
    pub fn new(config: EngineConfig, store: S) -> Self {
        Self::with_clock(config, store, SystemClock)
    }
}

impl<S: ReadMarkerStore, C: Clock> NotificationCenter<S, C> {
    pub fn with_clock(config: EngineConfig, store: S, clock: C) -> Self {
        let marker = ReadMarker::open(store, clock.now(), config.first_visit_lookback());

        Self {
            config,
            clock,
            marker,
        }
    }

    /// Sorted notifications for the current sources
    pub fn feed(&self, sources: &NotificationSources) -> NotificationFeed {
        let now = self.clock.now();
        let notifications = derive_notifications(sources, now, &self.config);
        let feed = present(notifications, self.marker.last_read());

        debug!(
            total = feed.len(),
            unread = feed.unread_count(),
            "Derived notification feed"
        );

        feed
    }

    pub fn last_read_timestamp(&self) -> DateTime<Utc> {
        self.marker.last_read()
    }

    /// Mark everything up to now as read
    pub fn update_last_read_timestamp(&mut self) {
        let now = self.clock.now();
        self.marker.mark_read(now);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
