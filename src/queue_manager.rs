//! Bus-driven owner of the playback queue.
//!
//! This component owns the one playback queue of the session and coordinates
//! the playback surface and the external reconciler via the event bus. Queue
//! commands arrive as [`QueueMessage`] values, reconciliation traffic as
//! [`SyncMessage`] values; state notifications go back out on the same bus.

use log::{debug, info, warn};
use tokio::sync::broadcast::{error::RecvError, Receiver, Sender};

use crate::{
    config::Config,
    entry::Video,
    protocol::{Message, QueueMessage, SyncMessage},
    queue::PlaybackQueue,
};

/// Coordinates queue edits, current-item tracking, and remote reconciliation.
pub struct QueueManager {
    queue: PlaybackQueue<Video>,
    push_changed_on_session_start: bool,
    bus_consumer: Receiver<Message>,
    bus_producer: Sender<Message>,
}

impl QueueManager {
    /// Creates a queue manager bound to bus channels, sized from config.
    pub fn new(
        config: &Config,
        bus_consumer: Receiver<Message>,
        bus_producer: Sender<Message>,
    ) -> Self {
        Self {
            queue: PlaybackQueue::with_max_size(config.queue.max_size),
            push_changed_on_session_start: config.sync.push_changed_on_session_start,
            bus_consumer,
            bus_producer,
        }
    }

    /// Read access for a playback surface that owns the manager directly and
    /// wants to peek (`get_next`/`get_previous`/`get_current`) without bus
    /// round trips.
    pub fn queue(&self) -> &PlaybackQueue<Video> {
        &self.queue
    }

    /// Starts the blocking event loop for queue commands and reconciliation
    /// messages.
    pub fn run(&mut self) {
        loop {
            match self.bus_consumer.blocking_recv() {
                Ok(message) => self.handle_message(message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        "QueueManager: lagged behind the bus, skipped {} messages",
                        skipped
                    );
                }
                Err(RecvError::Closed) => {
                    info!("QueueManager: bus closed, shutting down");
                    break;
                }
            }
        }
    }

    fn handle_message(&mut self, message: Message) {
        match message {
            Message::Queue(QueueMessage::Add(video)) => {
                debug!("QueueManager: add {}", video.id);
                self.apply_structural_edit(|queue| queue.add(&video));
            }
            Message::Queue(QueueMessage::Remove(video)) => {
                debug!("QueueManager: remove {}", video.id);
                self.apply_structural_edit(|queue| queue.remove(&video));
            }
            Message::Queue(QueueMessage::SetCurrent(video)) => {
                debug!("QueueManager: set current {}", video.id);
                self.apply_structural_edit(|queue| queue.set_current(&video));
            }
            Message::Queue(QueueMessage::Clear) => {
                info!("QueueManager: clearing queue");
                self.apply_structural_edit(|queue| queue.clear());
            }
            Message::Queue(QueueMessage::RemoveAllAfterCurrent) => {
                debug!("QueueManager: discarding entries after current");
                self.apply_structural_edit(|queue| queue.remove_all_after_current());
            }
            Message::Sync(SyncMessage::RemoteItemsReceived(videos)) => {
                info!("QueueManager: merging {} remote entries", videos.len());
                self.apply_structural_edit(|queue| queue.add_all(&videos));
            }
            Message::Sync(SyncMessage::NewSessionStarted) => {
                debug!("QueueManager: new session checkpoint");
                self.queue.on_new_session();
                if self.push_changed_on_session_start {
                    self.broadcast_changed_items();
                }
            }
            Message::Sync(SyncMessage::ChangedItemsRequested) => {
                self.broadcast_changed_items();
            }
            Message::Sync(SyncMessage::EntryRefreshed(video)) => {
                if self.queue.contains(&video) {
                    debug!("QueueManager: refreshing stored copy of {}", video.id);
                    self.queue.sync(&video);
                    self.broadcast_queue_changed();
                }
            }
            // Own notifications echoed back by the broadcast bus.
            Message::Queue(QueueMessage::QueueChanged(_))
            | Message::Queue(QueueMessage::CurrentChanged(_))
            | Message::Sync(SyncMessage::ChangedItems(_)) => {}
        }
    }

    /// Applies a structural queue edit and announces whatever actually
    /// changed. Comparing before/after keeps rejected input (empty entries,
    /// absent removals) from producing bus noise.
    fn apply_structural_edit<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut PlaybackQueue<Video>),
    {
        let (previous_ids, previous_current) = self.signature();
        edit(&mut self.queue);
        let (next_ids, next_current) = self.signature();

        if next_ids != previous_ids {
            self.broadcast_queue_changed();
        }
        if next_current != previous_current {
            self.broadcast_current_changed();
        }
    }

    fn signature(&self) -> (Vec<String>, Option<usize>) {
        let ids = self
            .queue
            .get_all()
            .iter()
            .map(|video| video.id.clone())
            .collect();
        (ids, self.queue.get_current_index())
    }

    fn broadcast_queue_changed(&self) {
        let _ = self.bus_producer.send(Message::Queue(
            QueueMessage::QueueChanged(self.queue.get_all().to_vec()),
        ));
    }

    fn broadcast_current_changed(&self) {
        let _ = self.bus_producer.send(Message::Queue(
            QueueMessage::CurrentChanged(self.queue.get_current().cloned()),
        ));
    }

    fn broadcast_changed_items(&self) {
        let changed = self.queue.get_changed_items().to_vec();
        debug!("QueueManager: pushing {} changed entries", changed.len());
        let _ = self
            .bus_producer
            .send(Message::Sync(SyncMessage::ChangedItems(changed)));
    }
}
