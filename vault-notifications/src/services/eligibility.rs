//! Position eligibility

use crate::{
    math::{default_significant_decimals, is_practically_zero},
    types::VaultAccountSnapshot,
};

/// Suppresses notifications for vaults the user no longer holds
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityFilter {
    /// Overrides the per-asset significant decimals
    pub significant_decimals: Option<u8>,
}

impl EligibilityFilter {
    pub fn new(significant_decimals: Option<u8>) -> Self {
        Self {
            significant_decimals,
        }
    }

    /// A vault is eligible when an account exists and its balance is not dust.
    pub fn is_eligible(&self, account: Option<&VaultAccountSnapshot>) -> bool {
        let Some(account) = account else {
            return false;
        };

        let significant = self
            .significant_decimals
            .unwrap_or_else(|| default_significant_decimals(account.decimals));

        !is_practically_zero(account.total_balance, account.decimals, significant)
    }
}
