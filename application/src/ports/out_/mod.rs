mod common;
mod queue;
mod resolver;

pub use common::{Clock, ManualClock, SystemClock};
pub use queue::{LocalQueueStore, QueueStore, StoreError};
pub use resolver::GroupResolver;
