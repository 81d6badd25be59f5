pub mod journal;
pub mod streak;
pub mod validation;
