//! Weekly settlement anchor
//!
//! Options expire and settle once a week at a fixed UTC instant. The most recent
//! settlement is the only stable zero point for turning round counters back into
//! calendar instants.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};

use crate::types::SettlementSchedule;

/// Most recent Friday 11:00 UTC at or before `reference`.
pub fn resolve_weekly_anchor(reference: DateTime<Utc>) -> DateTime<Utc> {
    resolve_anchor(reference, &SettlementSchedule::default())
}

/// Most recent settlement of `schedule` at or before `reference`.
///
/// Takes the settlement day of the reference's Monday-to-Sunday week and steps
/// back one week if that instant is still in the future. Hours past 23 wrap
/// within the settlement day.
pub fn resolve_anchor(reference: DateTime<Utc>, schedule: &SettlementSchedule) -> DateTime<Utc> {
    let date = reference.date_naive();
    let offset = i64::from(date.weekday().num_days_from_monday())
        - i64::from(schedule.weekday.num_days_from_monday());

    let settlement_day = date - Duration::days(offset);
    let anchor = Utc.from_utc_datetime(&settlement_day.and_time(NaiveTime::default()))
        + Duration::hours(i64::from(schedule.hour % 24));

    if anchor > reference {
        anchor - Duration::weeks(1)
    } else {
        anchor
    }
}

/// Settlement at which a withdrawal from `rounds_elapsed` rounds ago became claimable.
///
/// `None` when that settlement falls before the earliest representable instant.
pub fn settlement_before(anchor: DateTime<Utc>, rounds_elapsed: u32) -> Option<DateTime<Utc>> {
    anchor.checked_sub_signed(Duration::try_weeks(i64::from(rounds_elapsed))?)
}
