//! Vault Notifications
//!
//! Derives a user's notification feed for theta vault positions from decoded
//! indexer and contract data: option minting, option sales, claimable
//! withdrawals and premium distributions.

pub mod center;
pub mod error;
pub mod math;
pub mod notification;
pub mod services;
pub mod store;
pub mod types;

pub use center::{derive_notifications, Clock, FixedClock, NotificationCenter, SystemClock};
pub use error::{NotificationError, Result};
pub use notification::Notification;
pub use services::{resolve_anchor, resolve_weekly_anchor, NotificationFeed};
pub use store::{JsonFileStore, MemoryStore, ReadMarker, ReadMarkerStore};
pub use types::{
    ActivityRecord, EngineConfig, NotificationSources, PendingWithdrawal, RoundState,
    SettlementSchedule, TransferKind, TransferRecord, VaultAccountSnapshot, VaultKey,
    VaultOption, VaultVersion,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a fmt subscriber filtered by `RUST_LOG`.
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vault_notifications=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
