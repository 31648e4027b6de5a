//! Queue entry capability contract and the shipped media-reference type.
//!
//! The queue stores independent copies of whatever is inserted and only relies
//! on the small capability surface below, so the playback surface can bring
//! its own entry type if `Video` does not fit.

/// Capability contract every queue entry must provide.
///
/// Equality is identity-based: two values are equal iff they refer to the same
/// logical media item, independent of instance. `Clone` is the copy-on-insert
/// operation; the queue never aliases a caller-held instance.
pub trait QueueEntry: Clone + PartialEq {
    /// True for the null/sentinel entry that every mutating queue operation
    /// silently ignores.
    fn is_empty(&self) -> bool;

    /// Copies mutable content fields from `other` in place. Identity and
    /// position are preserved.
    fn sync_from(&mut self, other: &Self);

    /// Clears the heavy payload fields to reclaim memory. Identity and
    /// equality are unaffected.
    fn release_payloads(&mut self);
}

/// Resolved stream payload attached to a video.
///
/// These are the heavy fields: the queue releases them on entries that fall
/// behind the playback cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDescriptor {
    pub stream_url: String,
    pub duration_ms: u64,
    /// Opaque provider metadata blob.
    pub metadata: Vec<u8>,
}

/// A single media reference with stable identity.
#[derive(Debug, Clone, Default)]
pub struct Video {
    /// Stable id of the logical media item. Empty id marks the sentinel.
    pub id: String,
    /// Remote playlist this video belongs to, if any.
    pub playlist_id: Option<String>,
    pub title: String,
    /// Resolved playback payload for this item.
    pub media_item: Option<MediaDescriptor>,
    /// Pre-resolved payload for the item expected to play next.
    pub next_media_item: Option<MediaDescriptor>,
}

impl Video {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// The sentinel value mutating queue operations reject.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl PartialEq for Video {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl QueueEntry for Video {
    fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    fn sync_from(&mut self, other: &Self) {
        self.playlist_id = other.playlist_id.clone();
        self.title = other.title.clone();
        self.media_item = other.media_item.clone();
        self.next_media_item = other.next_media_item.clone();
    }

    fn release_payloads(&mut self) {
        self.media_item = None;
        self.next_media_item = None;
    }
}
