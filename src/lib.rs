//! Bounded, order-preserving playback queue with remote reconciliation.
//!
//! The core is [`PlaybackQueue`]: an ordered sequence of entries with a
//! bounds-checked cursor, identity-based deduplication, a 40-entry sliding
//! window, and a sync boundary tracking what changed since the last
//! reconciliation checkpoint. [`QueueManager`] wraps one queue behind the
//! event bus so a playback surface and an external reconciler can drive it
//! concurrently from their own threads.

pub mod config;
pub mod config_persistence;
pub mod entry;
pub mod protocol;
pub mod queue;
pub mod queue_manager;

pub use config::Config;
pub use entry::{MediaDescriptor, QueueEntry, Video};
pub use queue::{Cursor, PlaybackQueue, DEFAULT_MAX_SIZE};
pub use queue_manager::QueueManager;
