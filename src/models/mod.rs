pub mod period;
pub mod rule;
pub mod time_entry;
pub mod transaction;
