//! Error types for the notification engine

use thiserror::Error;

use crate::types::VaultOption;

/// Engine error types
///
/// None of these are fatal to a derivation pass: integrity faults drop the
/// offending notification and store failures are absorbed by the read marker.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error(
        "Withdrawal round {withdrawal_round} is ahead of current round {current_round} for {vault}"
    )]
    WithdrawalRoundAhead {
        vault: VaultOption,
        current_round: u32,
        withdrawal_round: u32,
    },

    #[error("Settlement {rounds_elapsed} rounds before the current anchor is out of range for {vault}")]
    SettlementOutOfRange { vault: VaultOption, rounds_elapsed: u32 },

    #[error("Read marker store I/O failed: {0}")]
    StoreIo(#[from] std::io::Error),

    #[error("Read marker store holds malformed data: {0}")]
    StoreFormat(#[from] serde_json::Error),

    #[error("Timestamp out of range: {0}ms")]
    InvalidTimestamp(i64),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, NotificationError>;
