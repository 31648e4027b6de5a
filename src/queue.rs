//! Bounded, order-preserving playback queue with a current-position cursor.
//!
//! The queue deduplicates entries by identity, keeps at most `max_size`
//! entries as a tail-anchored sliding window, tracks a sync boundary for
//! reconciliation against a remote source of truth, and releases heavy
//! payloads on entries that fall behind the cursor. All mutating operations
//! silently ignore invalid input; nothing in this module panics.

use crate::entry::QueueEntry;

/// Default sliding-window capacity.
pub const DEFAULT_MAX_SIZE: usize = 40;

/// Bounds-checked current-position pointer.
///
/// `None` means "no current item". The owning queue re-clamps the cursor
/// after every structural mutation, so it can never point outside the
/// stored entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: Option<usize>,
}

impl Cursor {
    pub fn none() -> Self {
        Self { index: None }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn set(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub fn clear(&mut self) {
        self.index = None;
    }

    /// Moves one position right. With no current item this lands on the
    /// head, matching the original `-1 + 1 = 0` arithmetic.
    fn advance(&mut self) {
        self.index = Some(self.index.map_or(0, |index| index + 1));
    }

    /// Moves one position left, clearing when already at the head.
    fn shift_left(&mut self) {
        self.index = self.index.and_then(|index| index.checked_sub(1));
    }

    /// Moves `count` positions left, clearing when the pointed-at entry was
    /// among those dropped.
    fn shift_left_by(&mut self, count: usize) {
        self.index = self.index.and_then(|index| index.checked_sub(count));
    }

    /// Pulls an out-of-bounds cursor back onto the last entry, or clears it
    /// when the queue is empty.
    fn clamp(&mut self, len: usize) {
        if let Some(index) = self.index {
            if len == 0 {
                self.index = None;
            } else if index >= len {
                self.index = Some(len - 1);
            }
        }
    }
}

/// Ordered sequence of entries with a cursor and a sync boundary.
///
/// Every stored entry is a clone made at the insertion boundary; mutating a
/// caller-held value after insertion never changes queue state.
#[derive(Debug, Clone)]
pub struct PlaybackQueue<E: QueueEntry> {
    entries: Vec<E>,
    cursor: Cursor,
    /// First index considered changed since the last reconciliation
    /// checkpoint. Outside `[0, len)` means no checkpoint: the whole queue
    /// counts as changed. Compensating adjustments may push it negative.
    sync_boundary: isize,
    max_size: usize,
}

impl<E: QueueEntry> Default for PlaybackQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: QueueEntry> PlaybackQueue<E> {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }

    /// Creates a queue with a custom sliding-window capacity.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: Cursor::none(),
            sync_boundary: 0,
            max_size: max_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry, if any.
    pub fn get_current_index(&self) -> Option<usize> {
        self.cursor.index()
    }

    /// Empties the queue and clears the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor.clear();
    }

    /// Merges remotely-known entries: drops any stored entry equal to a
    /// member of `items`, then appends all of `items` in order. The cursor is
    /// not repositioned beyond re-clamping into bounds.
    pub fn add_all(&mut self, items: &[E]) {
        if items.is_empty() {
            return;
        }

        self.entries.retain(|existing| !items.contains(existing));
        self.entries.extend(items.iter().cloned());
        self.cursor.clamp(self.entries.len());
    }

    /// Adds an entry to the end of the queue, deduplicating by identity.
    pub fn add(&mut self, entry: &E) {
        if entry.is_empty() {
            return;
        }

        // Re-adding the playing item replaces it in place so its position
        // is kept, and compensates the sync boundary for the replace.
        if self.get_current().is_some_and(|current| current == entry) {
            self.replace(entry);
            self.sync_boundary -= 1;
            return;
        }

        let was_last_element = self.entries.last().is_some_and(|last| last == entry);

        self.remove(entry);
        self.entries.push(entry.clone());

        // Replacing the tail element? The cursor follows it.
        if was_last_element {
            self.cursor.advance();
        }

        self.trim();
        self.strip_previous();
    }

    /// Removes the entry equal to `entry`, shifting the cursor and sync
    /// boundary left when the removal happened before the cursor. The
    /// currently playing entry is never removed here; replacing it goes
    /// through `add` or `set_current`.
    pub fn remove(&mut self, entry: &E) {
        if entry.is_empty() {
            return;
        }

        if self.get_current().is_some_and(|current| current == entry) {
            return;
        }

        let Some(index) = self.entries.iter().position(|existing| existing == entry) else {
            return;
        };

        self.entries.remove(index);

        if self.cursor.index().is_some_and(|current| index < current) {
            self.cursor.shift_left();
            self.sync_boundary -= 1;
        }

        // Removing the tail neighbor can leave the cursor past the end.
        self.cursor.clamp(self.entries.len());
    }

    pub fn contains(&self, entry: &E) -> bool {
        if entry.is_empty() {
            return false;
        }

        self.entries.contains(entry)
    }

    /// Entry after the current one, if any. A pure lookup: the cursor only
    /// moves through `set_current`.
    pub fn get_next(&self) -> Option<&E> {
        let current = self.cursor.index()?;
        self.entries.get(current + 1)
    }

    /// Entry before the current one, if any. A pure lookup, like `get_next`.
    pub fn get_previous(&self) -> Option<&E> {
        let current = self.cursor.index()?;
        if current == 0 {
            return None;
        }

        self.entries.get(current - 1)
    }

    /// Makes `entry` the current item, appending it first when it is not in
    /// the queue yet.
    pub fn set_current(&mut self, entry: &E) {
        if entry.is_empty() {
            return;
        }

        if let Some(index) = self.entries.iter().position(|existing| existing == entry) {
            self.cursor.set(index);
        } else {
            self.add(entry);
            self.cursor.set(self.entries.len() - 1);
        }
    }

    pub fn get_current(&self) -> Option<&E> {
        self.entries.get(self.cursor.index()?)
    }

    pub fn get_all(&self) -> &[E] {
        &self.entries
    }

    /// Entries changed since the last reconciliation checkpoint — the set a
    /// reconciler must push outward. Without a valid checkpoint the whole
    /// queue is returned.
    pub fn get_changed_items(&self) -> &[E] {
        let len = self.entries.len() as isize;
        if self.sync_boundary < 0 || self.sync_boundary >= len {
            return self.get_all();
        }

        &self.entries[self.sync_boundary as usize..]
    }

    /// Discards every entry after the current one. Used when the playback
    /// surface abandons a "future" branch of the queue.
    pub fn remove_all_after_current(&mut self) {
        let Some(current) = self.cursor.index() else {
            return;
        };

        if current + 1 < self.entries.len() {
            self.entries.truncate(current + 1);
        }
    }

    /// Establishes a reconciliation checkpoint: everything before the entry
    /// after the current one is considered already known to the remote.
    pub fn on_new_session(&mut self) {
        self.sync_boundary = self.cursor.index().map_or(0, |index| index as isize + 1);
    }

    /// Refreshes the stored entry equal to `origin` in place, without
    /// changing its position or identity.
    pub fn sync(&mut self, origin: &E) {
        if origin.is_empty() {
            return;
        }

        for existing in self.entries.iter_mut() {
            if &*existing == origin {
                existing.sync_from(origin);
                break;
            }
        }
    }

    /// Drops the oldest entries once the window capacity is exceeded and
    /// repositions the cursor relative to the new head.
    fn trim(&mut self) {
        if self.entries.len() <= self.max_size {
            return;
        }

        let overflow = self.entries.len() - self.max_size;
        self.entries.drain(..overflow);
        self.cursor.shift_left_by(overflow);
    }

    /// Releases heavy payloads on the entry just behind the cursor, bounding
    /// live payload references to the current and next entries.
    fn strip_previous(&mut self) {
        let Some(current) = self.cursor.index() else {
            return;
        };

        if current == 0 {
            return;
        }

        if let Some(previous) = self.entries.get_mut(current - 1) {
            previous.release_payloads();
        }
    }

    /// Overwrites the stored entry equal to `entry` at its existing index.
    /// Index and cursor are untouched.
    fn replace(&mut self, entry: &E) {
        if let Some(index) = self.entries.iter().position(|existing| existing == entry) {
            self.entries[index] = entry.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{MediaDescriptor, Video};

    fn descriptor(id: &str) -> MediaDescriptor {
        MediaDescriptor {
            stream_url: format!("https://example.test/stream/{id}"),
            duration_ms: 180_000,
            metadata: vec![0; 16],
        }
    }

    fn video(id: &str) -> Video {
        let mut video = Video::new(id, format!("Video {id}"));
        video.media_item = Some(descriptor(id));
        video.next_media_item = Some(descriptor(id));
        video
    }

    fn ids(entries: &[Video]) -> Vec<&str> {
        entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn test_add_to_empty_queue_leaves_cursor_unset() {
        let mut queue = PlaybackQueue::new();
        let first = video("a");

        queue.add(&first);

        assert_eq!(ids(queue.get_all()), ["a"]);
        assert!(queue.get_current().is_none());
        assert_eq!(queue.get_current_index(), None);

        queue.set_current(&first);
        assert_eq!(queue.get_current(), Some(&first));
    }

    #[test]
    fn test_add_keeps_cursor_and_peeks_do_not_navigate() {
        let mut queue = PlaybackQueue::new();
        let first = video("a");
        let second = video("b");
        queue.add(&first);
        queue.set_current(&first);

        queue.add(&second);

        assert_eq!(ids(queue.get_all()), ["a", "b"]);
        assert_eq!(queue.get_current_index(), Some(0));
        assert_eq!(queue.get_next(), Some(&second));
        assert!(queue.get_previous().is_none());
        // Peeking twice must not move the cursor.
        assert_eq!(queue.get_next(), Some(&second));
        assert_eq!(queue.get_current_index(), Some(0));
    }

    #[test]
    fn test_changed_items_after_new_session() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.set_current(&video("a"));

        queue.on_new_session();
        queue.add(&video("c"));

        assert_eq!(ids(queue.get_all()), ["a", "b", "c"]);
        assert_eq!(ids(queue.get_changed_items()), ["b", "c"]);
    }

    #[test]
    fn test_remove_before_cursor_shifts_cursor() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.add(&video("c"));
        queue.set_current(&video("c"));

        queue.remove(&video("a"));

        assert_eq!(ids(queue.get_all()), ["b", "c"]);
        assert_eq!(queue.get_current_index(), Some(1));
        assert_eq!(queue.get_current(), Some(&video("c")));
    }

    #[test]
    fn test_empty_entry_is_ignored_everywhere() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.set_current(&video("a"));
        let snapshot: Vec<Video> = queue.get_all().to_vec();

        queue.add(&Video::empty());
        queue.remove(&Video::empty());
        queue.set_current(&Video::empty());
        queue.sync(&Video::empty());

        assert_eq!(queue.get_all(), snapshot.as_slice());
        assert_eq!(queue.get_current_index(), Some(0));
        assert!(!queue.contains(&Video::empty()));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.set_current(&video("b"));

        queue.remove(&video("a"));
        let after_first: Vec<Video> = queue.get_all().to_vec();
        let cursor_after_first = queue.get_current_index();

        queue.remove(&video("a"));

        assert_eq!(queue.get_all(), after_first.as_slice());
        assert_eq!(queue.get_current_index(), cursor_after_first);
    }

    #[test]
    fn test_remove_current_is_noop() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.set_current(&video("b"));

        queue.remove(&video("b"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.get_current_index(), Some(1));
        assert_eq!(queue.get_current(), Some(&video("b")));
    }

    #[test]
    fn test_insert_stores_independent_copy() {
        let mut queue = PlaybackQueue::new();
        let mut original = video("a");
        queue.add(&original);

        original.title = "Mutated after insert".to_string();
        original.media_item = None;

        let stored = &queue.get_all()[0];
        assert_eq!(stored.title, "Video a");
        assert!(stored.media_item.is_some());
    }

    #[test]
    fn test_sliding_window_keeps_most_recent_forty() {
        let mut queue = PlaybackQueue::new();
        for n in 0..45 {
            queue.add(&video(&format!("v{n:02}")));
        }

        assert_eq!(queue.len(), DEFAULT_MAX_SIZE);
        let expected: Vec<String> = (5..45).map(|n| format!("v{n:02}")).collect();
        let stored: Vec<&str> = ids(queue.get_all());
        assert_eq!(stored, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_trim_repositions_cursor_relative_to_new_head() {
        let mut queue = PlaybackQueue::with_max_size(3);
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.add(&video("c"));
        queue.set_current(&video("c"));

        queue.add(&video("d"));

        assert_eq!(ids(queue.get_all()), ["b", "c", "d"]);
        assert_eq!(queue.get_current_index(), Some(1));
        assert_eq!(queue.get_current(), Some(&video("c")));
    }

    #[test]
    fn test_cursor_stays_in_bounds_across_mutations() {
        let mut queue = PlaybackQueue::with_max_size(4);
        let in_bounds = |queue: &PlaybackQueue<Video>| match queue.get_current_index() {
            Some(index) => index < queue.len(),
            None => true,
        };

        queue.add(&video("a"));
        assert!(in_bounds(&queue));
        queue.set_current(&video("a"));
        assert!(in_bounds(&queue));
        for n in 0..6 {
            queue.add(&video(&format!("w{n}")));
            assert!(in_bounds(&queue));
        }
        queue.remove(&video("w4"));
        assert!(in_bounds(&queue));
        queue.add_all(&[video("w5"), video("x"), video("y")]);
        assert!(in_bounds(&queue));
        queue.remove_all_after_current();
        assert!(in_bounds(&queue));
        queue.clear();
        assert!(in_bounds(&queue));
        assert_eq!(queue.get_current_index(), None);
    }

    #[test]
    fn test_length_capped_after_every_add() {
        let mut queue = PlaybackQueue::new();
        for n in 0..100 {
            queue.add(&video(&format!("v{n}")));
            assert!(queue.len() <= DEFAULT_MAX_SIZE);
        }
    }

    #[test]
    fn test_add_strips_payloads_behind_cursor() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.set_current(&video("b"));

        queue.add(&video("c"));

        // Entry behind the cursor lost its payloads; identity survived.
        let behind = &queue.get_all()[0];
        assert_eq!(behind.id, "a");
        assert!(behind.media_item.is_none());
        assert!(behind.next_media_item.is_none());
        // Current entry keeps its payloads.
        let current = queue.get_current().unwrap();
        assert_eq!(current.id, "b");
        assert!(current.media_item.is_some());
    }

    #[test]
    fn test_re_adding_current_replaces_in_place() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.set_current(&video("a"));
        queue.on_new_session();

        let mut refreshed = video("a");
        refreshed.title = "Refreshed".to_string();
        queue.add(&refreshed);

        // Same position, new content, cursor untouched.
        assert_eq!(ids(queue.get_all()), ["a", "b"]);
        assert_eq!(queue.get_current_index(), Some(0));
        assert_eq!(queue.get_current().unwrap().title, "Refreshed");
        // The boundary compensation widens the changed set by one.
        assert_eq!(ids(queue.get_changed_items()), ["a", "b"]);
    }

    #[test]
    fn test_re_adding_tail_keeps_cursor_on_it() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.set_current(&video("a"));

        // "b" is the tail but not current: it is removed and re-appended,
        // and the cursor compensation keeps positions aligned.
        queue.add(&video("b"));

        assert_eq!(ids(queue.get_all()), ["a", "b"]);
        assert_eq!(queue.get_current_index(), Some(1));
    }

    #[test]
    fn test_add_all_dedupes_and_appends_in_order() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.add(&video("c"));

        queue.add_all(&[video("b"), video("d")]);

        assert_eq!(ids(queue.get_all()), ["a", "c", "b", "d"]);
    }

    #[test]
    fn test_add_all_reclamps_cursor_into_bounds() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.set_current(&video("b"));

        // The current entry moves to the tail during the merge; the cursor is
        // clamped back into bounds rather than repositioned onto it.
        queue.add_all(&[video("a"), video("b")]);

        assert_eq!(ids(queue.get_all()), ["a", "b"]);
        let index = queue.get_current_index().unwrap();
        assert!(index < queue.len());
    }

    #[test]
    fn test_remove_all_after_current_truncates_future_branch() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.add(&video("c"));
        queue.set_current(&video("b"));

        queue.remove_all_after_current();

        assert_eq!(ids(queue.get_all()), ["a", "b"]);
        assert_eq!(queue.get_current(), Some(&video("b")));

        // Without a current item nothing is discarded.
        let mut unset = PlaybackQueue::new();
        unset.add(&video("a"));
        unset.remove_all_after_current();
        assert_eq!(unset.len(), 1);
    }

    #[test]
    fn test_changed_items_without_checkpoint_is_full_queue() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));

        assert_eq!(ids(queue.get_changed_items()), ["a", "b"]);
    }

    #[test]
    fn test_remove_before_checkpoint_shifts_boundary() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));
        queue.add(&video("c"));
        queue.set_current(&video("b"));
        queue.on_new_session();

        assert_eq!(ids(queue.get_changed_items()), ["c"]);

        // Removing ahead of the cursor shifts boundary and cursor together.
        queue.remove(&video("a"));

        assert_eq!(ids(queue.get_all()), ["b", "c"]);
        assert_eq!(queue.get_current_index(), Some(0));
        assert_eq!(ids(queue.get_changed_items()), ["c"]);
    }

    #[test]
    fn test_set_current_appends_missing_entry() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));

        queue.set_current(&video("z"));

        assert_eq!(ids(queue.get_all()), ["a", "z"]);
        assert_eq!(queue.get_current(), Some(&video("z")));
        assert_eq!(queue.get_current_index(), Some(1));
    }

    #[test]
    fn test_sync_refreshes_matching_entry_in_place() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));

        let mut origin = video("b");
        origin.title = "Synced".to_string();
        origin.playlist_id = Some("PL9".to_string());
        queue.sync(&origin);

        assert_eq!(ids(queue.get_all()), ["a", "b"]);
        let stored = &queue.get_all()[1];
        assert_eq!(stored.title, "Synced");
        assert_eq!(stored.playlist_id.as_deref(), Some("PL9"));
        // Unmatched origins change nothing.
        queue.sync(&video("missing"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.set_current(&video("a"));

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.get_current_index(), None);
        assert!(queue.get_current().is_none());
        assert!(queue.get_next().is_none());
        assert!(queue.get_previous().is_none());
    }

    #[test]
    fn test_peeks_at_queue_edges_return_none() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));
        queue.add(&video("b"));

        // No current item: both peeks are empty even with entries stored.
        assert!(queue.get_next().is_none());
        assert!(queue.get_previous().is_none());

        queue.set_current(&video("b"));
        assert!(queue.get_next().is_none());
        assert_eq!(queue.get_previous(), Some(&video("a")));
    }

    #[test]
    fn test_contains_checks_identity() {
        let mut queue = PlaybackQueue::new();
        queue.add(&video("a"));

        let mut renamed = video("a");
        renamed.title = "Other title".to_string();

        assert!(queue.contains(&renamed));
        assert!(!queue.contains(&video("b")));
    }
}
