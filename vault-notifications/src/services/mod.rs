//! Derivation pipeline stages

pub mod aggregator;
pub mod anchor;
pub mod builders;
pub mod eligibility;
pub mod presenter;

pub use aggregator::Aggregator;
pub use anchor::{resolve_anchor, resolve_weekly_anchor};
pub use eligibility::EligibilityFilter;
pub use presenter::{present, NotificationFeed};
