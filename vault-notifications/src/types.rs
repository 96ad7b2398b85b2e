//! Source record types and configuration for the notification engine

use chrono::{DateTime, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::store::{JsonFileStore, MemoryStore, ReadMarkerStore};

/// Vault contract generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultVersion {
    V1,
    V2,
}

impl fmt::Display for VaultVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultVersion::V1 => f.write_str("v1"),
            VaultVersion::V2 => f.write_str("v2"),
        }
    }
}

/// Vault identifier, e.g. `rETH-THETA`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultOption(pub String);

impl VaultOption {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VaultOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VaultOption {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VaultOption {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lookup key shared by every per-vault collaborator output
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VaultKey {
    pub version: VaultVersion,
    pub option: VaultOption,
}

impl VaultKey {
    pub fn new(version: VaultVersion, option: impl Into<VaultOption>) -> Self {
        Self {
            version,
            option: option.into(),
        }
    }
}

/// User position in one vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultAccountSnapshot {
    /// Deposited balance plus accrued yield (raw base units)
    pub total_balance: u128,

    /// Deposits queued for the next round; v1 vaults do not report this
    #[serde(default)]
    pub total_pending_deposit: Option<u128>,

    /// Decimals of the vault asset
    pub decimals: u8,
}

/// Withdrawal initiated by the user and claimable once its round settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWithdrawal {
    pub round: u32,
    pub amount: u128,
}

/// Round counter and pending withdrawal for one vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    /// Starts at 1 and increments once per weekly settlement
    pub current_round: u32,
    pub withdrawal: PendingWithdrawal,
}

impl RoundState {
    /// A withdrawal is ready once its round is no longer the current one.
    pub fn is_withdrawal_ready(&self) -> bool {
        self.withdrawal.amount > 0 && self.withdrawal.round != self.current_round
    }
}

/// Indexed vault activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActivityRecord {
    Minting {
        date: DateTime<Utc>,
        deposit_amount: u128,
        strike_price: u128,
        opened_at: DateTime<Utc>,
    },
    Sale {
        date: DateTime<Utc>,
        sell_amount: u128,
        premium: u128,
        timestamp: DateTime<Utc>,
    },
}

/// User transaction kind as reported by the indexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferKind {
    Deposit,
    Withdraw,
    InstantWithdraw,
    Distribute,
    Transfer,
    Receive,
    #[serde(other)]
    Other,
}

/// User transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    #[serde(rename = "type")]
    pub kind: TransferKind,
    pub timestamp: DateTime<Utc>,
    pub amount: u128,
    pub vault: VaultOption,
}

/// Snapshot of every collaborator output consumed by one derivation pass
#[derive(Debug, Clone, Default)]
pub struct NotificationSources {
    pub accounts: BTreeMap<VaultKey, VaultAccountSnapshot>,
    pub rounds: BTreeMap<VaultKey, RoundState>,
    pub activities: BTreeMap<VaultKey, Vec<ActivityRecord>>,
    pub transfers: Vec<TransferRecord>,
}

impl NotificationSources {
    pub fn with_account(mut self, key: VaultKey, account: VaultAccountSnapshot) -> Self {
        self.accounts.insert(key, account);
        self
    }

    pub fn with_round(mut self, key: VaultKey, round: RoundState) -> Self {
        self.rounds.insert(key, round);
        self
    }

    pub fn with_activity(mut self, key: VaultKey, activity: ActivityRecord) -> Self {
        self.activities.entry(key).or_default().push(activity);
        self
    }

    pub fn with_transfer(mut self, transfer: TransferRecord) -> Self {
        self.transfers.push(transfer);
        self
    }
}

/// Weekly settlement instant used as the zero point for round arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementSchedule {
    pub weekday: Weekday,

    /// Hour of day, UTC; taken modulo 24
    pub hour: u32,
}

impl Default for SettlementSchedule {
    fn default() -> Self {
        Self {
            weekday: Weekday::Fri,
            hour: 11,
        }
    }
}

/// Default first-visit lookback: 3 days
pub const DEFAULT_FIRST_VISIT_LOOKBACK_SECS: i64 = 3 * 24 * 60 * 60;

/// Configuration for the notification engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How far back the read marker starts on first visit
    pub first_visit_lookback_secs: i64,

    /// Weekly settlement used to date withdrawals
    pub settlement: SettlementSchedule,

    /// Overrides the per-asset significant decimals for the dust check
    pub significant_decimals: Option<u8>,

    /// Where the read marker is persisted; in-memory when unset
    pub read_marker_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            first_visit_lookback_secs: DEFAULT_FIRST_VISIT_LOOKBACK_SECS,
            settlement: SettlementSchedule::default(),
            significant_decimals: None,
            read_marker_path: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let first_visit_lookback_secs = std::env::var("NOTIFICATIONS_FIRST_VISIT_LOOKBACK_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs: &i64| *secs >= 0 && Duration::try_seconds(*secs).is_some())
            .unwrap_or(defaults.first_visit_lookback_secs);

        let weekday = std::env::var("NOTIFICATIONS_SETTLEMENT_WEEKDAY")
            .ok()
            .and_then(|s| s.trim().parse::<Weekday>().ok())
            .unwrap_or(defaults.settlement.weekday);

        let hour = std::env::var("NOTIFICATIONS_SETTLEMENT_HOUR_UTC")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|h: &u32| *h < 24)
            .unwrap_or(defaults.settlement.hour);

        let significant_decimals = std::env::var("NOTIFICATIONS_SIGNIFICANT_DECIMALS")
            .ok()
            .and_then(|s| s.parse().ok());

        let read_marker_path = std::env::var("NOTIFICATIONS_READ_MARKER_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            first_visit_lookback_secs,
            settlement: SettlementSchedule { weekday, hour },
            significant_decimals,
            read_marker_path,
        }
    }

    /// First-visit lookback, or the default when the configured seconds are
    /// negative or not a representable duration
    pub fn first_visit_lookback(&self) -> Duration {
        Duration::try_seconds(self.first_visit_lookback_secs)
            .filter(|lookback| *lookback >= Duration::zero())
            .unwrap_or_else(|| Duration::seconds(DEFAULT_FIRST_VISIT_LOOKBACK_SECS))
    }

    /// Build the configured read marker store
    pub fn read_marker_store(&self) -> Box<dyn ReadMarkerStore> {
        match &self.read_marker_path {
            Some(path) => Box::new(JsonFileStore::new(path.clone())),
            None => Box::new(MemoryStore::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdrawal_ready_requires_amount_and_settled_round() {
        let pending = RoundState {
            current_round: 4,
            withdrawal: PendingWithdrawal { round: 4, amount: 5 },
        };
        assert!(!pending.is_withdrawal_ready());

        let empty = RoundState {
            current_round: 4,
            withdrawal: PendingWithdrawal { round: 2, amount: 0 },
        };
        assert!(!empty.is_withdrawal_ready());

        let ready = RoundState {
            current_round: 4,
            withdrawal: PendingWithdrawal { round: 2, amount: 5 },
        };
        assert!(ready.is_withdrawal_ready());
    }

    #[test]
    fn test_activity_record_deserializes_tagged() {
        let json = r#"{
            "type": "minting",
            "date": "2024-02-09T11:00:00Z",
            "depositAmount": 1000,
            "strikePrice": 250000,
            "openedAt": "2024-02-09T11:30:00Z"
        }"#;

        let record: ActivityRecord = serde_json::from_str(json).unwrap();

        assert!(matches!(
            record,
            ActivityRecord::Minting { deposit_amount: 1000, strike_price: 250000, .. }
        ));
    }

    #[test]
    fn test_unknown_transfer_kind_maps_to_other() {
        let json = r#"{
            "type": "migrate",
            "timestamp": "2024-02-09T11:00:00Z",
            "amount": 1,
            "vault": "rETH-THETA"
        }"#;

        let record: TransferRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.kind, TransferKind::Other);
        assert_eq!(record.vault, VaultOption::from("rETH-THETA"));
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.first_visit_lookback_secs, 259_200);
        assert_eq!(config.settlement.weekday, Weekday::Fri);
        assert_eq!(config.settlement.hour, 11);
        assert!(config.read_marker_path.is_none());
    }

    // Environment is process-wide, so every from_env case runs in this one test.
    #[test]
    fn test_from_env_parsing_and_fallbacks() {
        const VARS: [&str; 5] = [
            "NOTIFICATIONS_FIRST_VISIT_LOOKBACK_SECS",
            "NOTIFICATIONS_SETTLEMENT_WEEKDAY",
            "NOTIFICATIONS_SETTLEMENT_HOUR_UTC",
            "NOTIFICATIONS_SIGNIFICANT_DECIMALS",
            "NOTIFICATIONS_READ_MARKER_PATH",
        ];
        let clear = || VARS.iter().for_each(|var| std::env::remove_var(var));

        clear();
        let config = EngineConfig::from_env();
        assert_eq!(config.first_visit_lookback_secs, DEFAULT_FIRST_VISIT_LOOKBACK_SECS);
        assert_eq!(config.settlement, SettlementSchedule::default());
        assert_eq!(config.significant_decimals, None);
        assert!(config.read_marker_path.is_none());

        for alias in ["fri", "friday", "FRI", " Friday "] {
            std::env::set_var("NOTIFICATIONS_SETTLEMENT_WEEKDAY", alias);
            assert_eq!(EngineConfig::from_env().settlement.weekday, Weekday::Fri);
        }
        std::env::set_var("NOTIFICATIONS_SETTLEMENT_WEEKDAY", "wed");
        assert_eq!(EngineConfig::from_env().settlement.weekday, Weekday::Wed);
        std::env::set_var("NOTIFICATIONS_SETTLEMENT_WEEKDAY", "someday");
        assert_eq!(EngineConfig::from_env().settlement.weekday, Weekday::Fri);

        std::env::set_var("NOTIFICATIONS_SETTLEMENT_HOUR_UTC", "23");
        assert_eq!(EngineConfig::from_env().settlement.hour, 23);
        for hour in ["24", "99", "-1", "noon"] {
            std::env::set_var("NOTIFICATIONS_SETTLEMENT_HOUR_UTC", hour);
            assert_eq!(EngineConfig::from_env().settlement.hour, 11);
        }

        std::env::set_var("NOTIFICATIONS_FIRST_VISIT_LOOKBACK_SECS", "3600");
        assert_eq!(EngineConfig::from_env().first_visit_lookback_secs, 3600);
        for secs in ["-5", "three days", "9223372036854776", "9223372036854775807"] {
            std::env::set_var("NOTIFICATIONS_FIRST_VISIT_LOOKBACK_SECS", secs);
            assert_eq!(
                EngineConfig::from_env().first_visit_lookback_secs,
                DEFAULT_FIRST_VISIT_LOOKBACK_SECS
            );
        }

        std::env::set_var("NOTIFICATIONS_SIGNIFICANT_DECIMALS", "4");
        assert_eq!(EngineConfig::from_env().significant_decimals, Some(4));

        std::env::set_var("NOTIFICATIONS_READ_MARKER_PATH", "   ");
        let config = EngineConfig::from_env();
        assert!(config.read_marker_path.is_none());
        assert_eq!(config.read_marker_store().load().unwrap(), None);

        std::env::set_var("NOTIFICATIONS_READ_MARKER_PATH", "/tmp/marker.json");
        assert_eq!(
            EngineConfig::from_env().read_marker_path,
            Some(PathBuf::from("/tmp/marker.json"))
        );

        clear();
    }

    #[test]
    fn test_first_visit_lookback_falls_back_when_unrepresentable() {
        let config = EngineConfig {
            first_visit_lookback_secs: i64::MAX,
            ..EngineConfig::default()
        };
        assert_eq!(config.first_visit_lookback(), Duration::days(3));

        let config = EngineConfig {
            first_visit_lookback_secs: -60,
            ..EngineConfig::default()
        };
        assert_eq!(config.first_visit_lookback(), Duration::days(3));
    }

    #[test]
    fn test_vault_version_display() {
        assert_eq!(VaultVersion::V1.to_string(), "v1");
        assert_eq!(VaultVersion::V2.to_string(), "v2");
    }
}
