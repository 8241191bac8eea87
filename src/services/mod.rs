//! Pure derivations over an entry-history snapshot. Nothing here touches
//! storage or the clock; "today" is always passed in.

pub mod analytics;
pub mod badges;
pub mod calendar;
pub mod search;
pub mod streak;
