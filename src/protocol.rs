//! Event-bus protocol shared by the queue manager and its collaborators.
//!
//! This module defines the message payloads exchanged between the playback
//! surface, the queue manager, and the external reconciler.

use crate::entry::Video;

/// Top-level envelope for all bus traffic.
#[derive(Debug, Clone)]
pub enum Message {
    Queue(QueueMessage),
    Sync(SyncMessage),
}

/// Playback-surface commands and queue notifications.
#[derive(Debug, Clone)]
pub enum QueueMessage {
    /// Append a video to the queue, deduplicating by identity.
    Add(Video),
    /// Remove a video from the queue. The currently playing video is kept.
    Remove(Video),
    /// Make a video current, appending it first when missing.
    SetCurrent(Video),
    /// Drop every entry and reset the cursor.
    Clear,
    /// Discard the queued entries after the current one.
    RemoveAllAfterCurrent,
    /// Queue membership or order changed. Carries the full ordered queue.
    QueueChanged(Vec<Video>),
    /// The current entry changed. `None` means no current item.
    CurrentChanged(Option<Video>),
}

/// Reconciliation traffic between the queue manager and the remote-sync peer.
#[derive(Debug, Clone)]
pub enum SyncMessage {
    /// Remotely-known entries to merge into the queue tail, in remote order.
    RemoteItemsReceived(Vec<Video>),
    /// A new playback session started; checkpoint the sync boundary.
    NewSessionStarted,
    /// The reconciler wants the current changed-items set.
    ChangedItemsRequested,
    /// Entries added locally since the last checkpoint, oldest first.
    ChangedItems(Vec<Video>),
    /// Refresh the stored copy of a video from its origin instance.
    EntryRefreshed(Video),
}
