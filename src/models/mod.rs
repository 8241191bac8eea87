pub mod badge;
pub mod mood;
pub mod profile;
pub mod streak;
