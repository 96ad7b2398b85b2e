//! Notification builders, one per notification kind

use chrono::{DateTime, Utc};

use crate::{
    error::{NotificationError, Result},
    notification::Notification,
    services::anchor::settlement_before,
    types::{ActivityRecord, RoundState, TransferKind, TransferRecord, VaultKey, VaultVersion},
};

/// Map an indexed activity to its notification; dates are copied as-is.
pub fn from_activity(key: &VaultKey, activity: &ActivityRecord) -> Notification {
    match activity {
        ActivityRecord::Minting {
            date,
            deposit_amount,
            strike_price,
            opened_at,
        } => Notification::OptionMinting {
            date: *date,
            vault: key.option.clone(),
            vault_version: key.version,
            deposit_amount: *deposit_amount,
            strike_price: *strike_price,
            opened_at: *opened_at,
        },
        ActivityRecord::Sale {
            date,
            sell_amount,
            premium,
            timestamp,
        } => Notification::OptionSale {
            date: *date,
            vault: key.option.clone(),
            vault_version: key.version,
            sell_amount: *sell_amount,
            premium: *premium,
            timestamp: *timestamp,
        },
    }
}

/// Premium distribution to the user. Only `distribute` transfers qualify.
pub fn distribute_premium(transfer: &TransferRecord) -> Option<Notification> {
    if transfer.kind != TransferKind::Distribute {
        return None;
    }

    Some(Notification::DistributePremium {
        date: transfer.timestamp,
        vault: transfer.vault.clone(),
        vault_version: VaultVersion::V2,
        amount: transfer.amount,
    })
}

/// Withdrawal that became claimable at a past settlement.
///
/// No timestamp is recorded upstream, so the date is reconstructed from the
/// round counter: the withdrawal became claimable `current - withdrawal - 1`
/// settlements before `anchor`.
///
/// Returns `Ok(None)` when nothing is claimable and an error when the
/// withdrawal round is ahead of the current round or the reconstructed
/// settlement is not a representable instant.
pub fn withdrawal_ready(
    key: &VaultKey,
    state: &RoundState,
    anchor: DateTime<Utc>,
) -> Result<Option<Notification>> {
    if !state.is_withdrawal_ready() {
        return Ok(None);
    }

    let rounds_elapsed = i64::from(state.current_round) - i64::from(state.withdrawal.round) - 1;
    let rounds_elapsed =
        u32::try_from(rounds_elapsed).map_err(|_| NotificationError::WithdrawalRoundAhead {
            vault: key.option.clone(),
            current_round: state.current_round,
            withdrawal_round: state.withdrawal.round,
        })?;

    let date = settlement_before(anchor, rounds_elapsed).ok_or_else(|| {
        NotificationError::SettlementOutOfRange {
            vault: key.option.clone(),
            rounds_elapsed,
        }
    })?;

    Ok(Some(Notification::WithdrawalReady {
        date,
        vault: key.option.clone(),
        vault_version: VaultVersion::V2,
        amount: state.withdrawal.amount,
    }))
}
