//! Notification feed entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{VaultOption, VaultVersion};

/// One entry of the user's notification feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Notification {
    /// Vault minted options for the new round
    OptionMinting {
        date: DateTime<Utc>,
        vault: VaultOption,
        vault_version: VaultVersion,
        deposit_amount: u128,
        strike_price: u128,
        opened_at: DateTime<Utc>,
    },

    /// Vault sold its minted options
    OptionSale {
        date: DateTime<Utc>,
        vault: VaultOption,
        vault_version: VaultVersion,
        sell_amount: u128,
        premium: u128,
        timestamp: DateTime<Utc>,
    },

    /// Initiated withdrawal became claimable at a settlement
    WithdrawalReady {
        date: DateTime<Utc>,
        vault: VaultOption,
        vault_version: VaultVersion,
        amount: u128,
    },

    /// Premium paid out to the user
    DistributePremium {
        date: DateTime<Utc>,
        vault: VaultOption,
        vault_version: VaultVersion,
        amount: u128,
    },
}

impl Notification {
    pub fn date(&self) -> DateTime<Utc> {
        match self {
            Notification::OptionMinting { date, .. }
            | Notification::OptionSale { date, .. }
            | Notification::WithdrawalReady { date, .. }
            | Notification::DistributePremium { date, .. } => *date,
        }
    }

    pub fn vault(&self) -> &VaultOption {
        match self {
            Notification::OptionMinting { vault, .. }
            | Notification::OptionSale { vault, .. }
            | Notification::WithdrawalReady { vault, .. }
            | Notification::DistributePremium { vault, .. } => vault,
        }
    }

    pub fn vault_version(&self) -> VaultVersion {
        match self {
            Notification::OptionMinting { vault_version, .. }
            | Notification::OptionSale { vault_version, .. }
            | Notification::WithdrawalReady { vault_version, .. }
            | Notification::DistributePremium { vault_version, .. } => *vault_version,
        }
    }

    /// Short kind label, matches the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::OptionMinting { .. } => "optionMinting",
            Notification::OptionSale { .. } => "optionSale",
            Notification::WithdrawalReady { .. } => "withdrawalReady",
            Notification::DistributePremium { .. } => "distributePremium",
        }
    }

    /// Unread when the marker is at or before this notification.
    pub fn is_unread(&self, last_read: DateTime<Utc>) -> bool {
        last_read <= self.date()
    }
}
