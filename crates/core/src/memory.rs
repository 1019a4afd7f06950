//! Conversation history storage.

use cogni_model::Entry;

/// A store of conversation entries.
///
/// Implementations must keep entries in the order they were appended, and
/// must never hand out anything that aliases the stored entries: a snapshot
/// is a copy, and changing it has no effect on the store. Entries are never
/// removed individually or changed once appended.
pub trait Memory: Send {
    /// Appends one entry to the end of the history.
    fn append(&mut self, entry: Entry);

    /// Returns a copy of all entries, oldest first.
    fn snapshot(&self) -> Vec<Entry>;

    /// Drops all entries.
    ///
    /// The store doesn't re-seed anything after clearing, that is the
    /// responsibility of the caller.
    fn clear(&mut self);

    /// Returns the number of stored entries.
    fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns `true` if there are no stored entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory history, which is lost when dropped.
#[derive(Clone, Debug, Default)]
pub struct VolatileMemory {
    entries: Vec<Entry>,
}

impl VolatileMemory {
    /// Creates an empty `VolatileMemory`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Memory for VolatileMemory {
    #[inline]
    fn append(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    #[inline]
    fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    #[inline]
    fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
