pub mod entries;
#[cfg(test)]
pub mod memory;
pub mod pool;
pub mod users;

pub use entries::{EntryStore, PgEntryStore};
pub use pool::create_pool;
