pub mod artifacts;
pub mod cache;

pub use artifacts::load;
pub use cache::{CacheEntry, Clock, ManualClock, SystemClock, TtlCache};
