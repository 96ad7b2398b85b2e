//! Read marker persistence
//!
//! The marker is a single Unix-millisecond instant. Stores only get and set it;
//! [`ReadMarker`] owns the first-visit default and absorbs store failures.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::error::{NotificationError, Result};
use crate::types::DEFAULT_FIRST_VISIT_LOOKBACK_SECS;

/// Key-value slot holding the last read instant
pub trait ReadMarkerStore: Send + Sync {
    /// Persisted marker in Unix milliseconds, `None` if never written
    fn load(&self) -> Result<Option<i64>>;

    /// Replace the persisted marker
    fn save(&self, millis: i64) -> Result<()>;
}

impl<T: ReadMarkerStore + ?Sized> ReadMarkerStore for Box<T> {
    fn load(&self) -> Result<Option<i64>> {
        (**self).load()
    }

    fn save(&self, millis: i64) -> Result<()> {
        (**self).save(millis)
    }
}

impl<T: ReadMarkerStore + ?Sized> ReadMarkerStore for &T {
    fn load(&self) -> Result<Option<i64>> {
        (**self).load()
    }

    fn save(&self, millis: i64) -> Result<()> {
        (**self).save(millis)
    }
}

/// Last read instant, initialized on first access
///
/// Every read goes back to the store so that markers sharing one store observe
/// each other's writes. The cached value covers a store that cannot be read.
pub struct ReadMarker<S> {
    store: S,
    last_read: DateTime<Utc>,
}

impl<S: ReadMarkerStore> ReadMarker<S> {
    /// Load the persisted marker, or persist `now - first_visit_lookback` if
    /// nothing usable is stored.
    ///
    /// A lookback reaching before the earliest representable instant falls back
    /// to the 3 day default.
    pub fn open(store: S, now: DateTime<Utc>, first_visit_lookback: Duration) -> Self {
        match load(&store) {
            Ok(Some(last_read)) => return Self { store, last_read },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Discarding unreadable read marker"),
        }

        let last_read = now
            .checked_sub_signed(first_visit_lookback)
            .or_else(|| now.checked_sub_signed(Duration::seconds(DEFAULT_FIRST_VISIT_LOOKBACK_SECS)))
            .unwrap_or(now);
        persist(&store, last_read);
        info!(last_read = %last_read, "Initialized read marker");

        Self { store, last_read }
    }

    /// Current persisted marker, or the last value this marker saw
    pub fn last_read(&self) -> DateTime<Utc> {
        match load(&self.store) {
            Ok(Some(last_read)) => last_read,
            Ok(None) => self.last_read,
            Err(e) => {
                debug!(error = %e, "Using cached read marker");
                self.last_read
            }
        }
    }

    /// Advance the marker to `now`. Monotonicity is not enforced.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        self.last_read = now;
        persist(&self.store, now);
        info!(last_read = %now, "Marked notifications as read");
    }
}

fn load<S: ReadMarkerStore>(store: &S) -> Result<Option<DateTime<Utc>>> {
    store.load()?.map(from_millis).transpose()
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(NotificationError::InvalidTimestamp(millis))
}

fn persist<S: ReadMarkerStore>(store: &S, at: DateTime<Utc>) {
    if let Err(e) = store.save(at.timestamp_millis()) {
        warn!(error = %e, "Failed to persist read marker");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ReadMarkerStore for BrokenStore {
        fn load(&self) -> Result<Option<i64>> {
            Err(NotificationError::StoreIo(std::io::Error::other("unavailable")))
        }

        fn save(&self, _millis: i64) -> Result<()> {
            Err(NotificationError::StoreIo(std::io::Error::other("unavailable")))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 9, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_first_visit_defaults_to_lookback() {
        let store = MemoryStore::default();

        let marker = ReadMarker::open(&store, now(), Duration::days(3));

        let expected = Utc.with_ymd_and_hms(2024, 2, 6, 12, 0, 0).unwrap();
        assert_eq!(marker.last_read(), expected);
        assert_eq!(store.load().unwrap(), Some(expected.timestamp_millis()));
    }

    #[test]
    fn test_existing_marker_is_kept() {
        let stored = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryStore::with_value(stored.timestamp_millis());

        let marker = ReadMarker::open(&store, now(), Duration::days(3));

        assert_eq!(marker.last_read(), stored);
    }

    #[test]
    fn test_mark_read_persists_now() {
        let store = MemoryStore::default();
        let mut marker = ReadMarker::open(&store, now(), Duration::days(3));

        let later = now() + Duration::minutes(5);
        marker.mark_read(later);

        assert_eq!(marker.last_read(), later);
        assert_eq!(store.load().unwrap(), Some(later.timestamp_millis()));
    }

    #[test]
    fn test_out_of_range_marker_is_reinitialized() {
        let store = MemoryStore::with_value(i64::MAX);

        let marker = ReadMarker::open(&store, now(), Duration::days(3));

        assert_eq!(marker.last_read(), now() - Duration::days(3));
    }

    #[test]
    fn test_lookback_before_calendar_start_uses_default() {
        let store = MemoryStore::default();

        let marker = ReadMarker::open(&store, now(), Duration::milliseconds(i64::MAX));

        assert_eq!(marker.last_read(), now() - Duration::days(3));
    }

    #[test]
    fn test_last_read_follows_shared_store() {
        let store = MemoryStore::default();
        let mut writer = ReadMarker::open(&store, now(), Duration::days(3));
        let reader = ReadMarker::open(&store, now(), Duration::days(3));

        let later = now() + Duration::hours(2);
        writer.mark_read(later);

        assert_eq!(reader.last_read(), later);
    }

    #[test]
    fn test_store_failures_are_absorbed() {
        let mut marker = ReadMarker::open(BrokenStore, now(), Duration::days(3));
        assert_eq!(marker.last_read(), now() - Duration::days(3));

        marker.mark_read(now());
        assert_eq!(marker.last_read(), now());
    }
}
