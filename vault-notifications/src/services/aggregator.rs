//! Merges builder outputs across every vault version and vault option

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    notification::Notification,
    services::{
        anchor::resolve_anchor,
        builders::{distribute_premium, from_activity, withdrawal_ready},
        eligibility::EligibilityFilter,
    },
    types::{NotificationSources, SettlementSchedule, VaultKey, VaultVersion},
};

/// Builds the unsorted notification list for one derivation pass
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    pub settlement: SettlementSchedule,
    pub eligibility: EligibilityFilter,
}

impl Aggregator {
    pub fn new(settlement: SettlementSchedule, eligibility: EligibilityFilter) -> Self {
        Self {
            settlement,
            eligibility,
        }
    }

    /// Concatenate eligible notifications of all four kinds; no deduplication
    /// and no ordering guarantee.
    pub fn aggregate(&self, sources: &NotificationSources, now: DateTime<Utc>) -> Vec<Notification> {
        let mut notifications = Vec::new();

        let activity_count = self.collect_activities(sources, &mut notifications);
        let withdrawal_count = self.collect_withdrawals(sources, now, &mut notifications);
        let premium_count = self.collect_premiums(sources, &mut notifications);

        debug!(
            activities = activity_count,
            withdrawals = withdrawal_count,
            premiums = premium_count,
            "Aggregated notifications"
        );

        notifications
    }

    fn is_eligible(&self, sources: &NotificationSources, key: &VaultKey) -> bool {
        self.eligibility.is_eligible(sources.accounts.get(key))
    }

    fn collect_activities(&self, sources: &NotificationSources, out: &mut Vec<Notification>) -> usize {
        let before = out.len();

        for (key, activities) in &sources.activities {
            if !self.is_eligible(sources, key) {
                continue;
            }
            out.extend(activities.iter().map(|activity| from_activity(key, activity)));
        }

        out.len() - before
    }

    fn collect_withdrawals(
        &self,
        sources: &NotificationSources,
        now: DateTime<Utc>,
        out: &mut Vec<Notification>,
    ) -> usize {
        let before = out.len();
        let anchor = resolve_anchor(now, &self.settlement);

        // v1 vaults withdraw instantly
        let v2_rounds = sources
            .rounds
            .iter()
            .filter(|(key, _)| key.version == VaultVersion::V2);

        for (key, state) in v2_rounds {
            if !self.is_eligible(sources, key) {
                continue;
            }

            match withdrawal_ready(key, state, anchor) {
                Ok(Some(notification)) => out.push(notification),
                Ok(None) => {}
                Err(e) => warn!(vault = %key.option, error = %e, "Skipping withdrawal notification"),
            }
        }

        out.len() - before
    }

    fn collect_premiums(&self, sources: &NotificationSources, out: &mut Vec<Notification>) -> usize {
        let before = out.len();

        for transfer in &sources.transfers {
            let key = VaultKey::new(VaultVersion::V2, transfer.vault.clone());
            if !self.is_eligible(sources, &key) {
                continue;
            }
            out.extend(distribute_premium(transfer));
        }

        out.len() - before
    }
}
