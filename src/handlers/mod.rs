pub mod calendar;
pub mod entries;
pub mod health;
pub mod insights;
pub mod navigation;
pub mod profile;
pub mod search;
pub mod signals;
pub mod theme;
