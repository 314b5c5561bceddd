//! Index-stable cursor storage.
//!
//! Cursors are forked and killed while a tick walks the set. A generational
//! slot map keeps every live handle valid across those insertions and
//! removals, and a stale handle to a killed cursor simply stops resolving.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use super::cursor::Cursor;

new_key_type! {
    /// Stable handle to a live cursor.
    pub struct CursorId;
}

/// Unordered collection of live cursors.
#[derive(Debug, Clone, Default)]
pub struct CursorSet {
    cursors: SlotMap<CursorId, Cursor>,
}

impl CursorSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            cursors: SlotMap::with_key(),
        }
    }

    /// Create a set holding one cursor at the origin.
    pub fn with_origin() -> Self {
        let mut set = Self::new();
        set.insert(Cursor::new());
        set
    }

    /// Number of live cursors.
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// True once every cursor has terminated.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Add a cursor and return its handle.
    pub fn insert(&mut self, cursor: Cursor) -> CursorId {
        self.cursors.insert(cursor)
    }

    /// Remove a cursor, returning it if the handle was live.
    pub fn remove(&mut self, id: CursorId) -> Option<Cursor> {
        self.cursors.remove(id)
    }

    /// Look up a cursor.
    pub fn get(&self, id: CursorId) -> Option<&Cursor> {
        self.cursors.get(id)
    }

    /// Look up a cursor mutably.
    pub fn get_mut(&mut self, id: CursorId) -> Option<&mut Cursor> {
        self.cursors.get_mut(id)
    }

    /// Snapshot of the live handles, in storage order.
    pub fn ids(&self) -> SmallVec<[CursorId; 8]> {
        self.cursors.keys().collect()
    }

    /// Iterate over handles and cursors.
    pub fn iter(&self) -> impl Iterator<Item = (CursorId, &Cursor)> + '_ {
        self.cursors.iter()
    }

    /// Iterate over cursors.
    pub fn values(&self) -> impl Iterator<Item = &Cursor> + '_ {
        self.cursors.values()
    }

    /// Keep only the cursors for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(CursorId, &mut Cursor) -> bool) {
        self.cursors.retain(|id, cursor| keep(id, cursor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_origin() {
        let set = CursorSet::with_origin();
        assert_eq!(set.len(), 1);
        assert_eq!(set.values().next(), Some(&Cursor::new()));
    }

    #[test]
    fn test_stale_handle_after_remove() {
        let mut set = CursorSet::new();
        let a = set.insert(Cursor::new());
        let b = set.insert(Cursor::new());

        assert!(set.remove(a).is_some());
        assert!(set.get(a).is_none());
        assert!(set.remove(a).is_none());
        assert!(set.get(b).is_some());

        // The freed slot is reused under a new generation.
        let c = set.insert(Cursor::new());
        assert_ne!(a, c);
        assert!(set.get(a).is_none());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut set = CursorSet::with_origin();
        let copy = set.clone();

        let id = set.ids()[0];
        if let Some(cursor) = set.get_mut(id) {
            cursor.dp_col = 9;
        }

        assert_eq!(copy.get(id).map(|c| c.dp_col), Some(0));
        assert_eq!(set.get(id).map(|c| c.dp_col), Some(9));
    }

    #[test]
    fn test_retain() {
        let mut set = CursorSet::new();
        for row in 0..5 {
            let mut cursor = Cursor::new();
            cursor.ip_row = row;
            set.insert(cursor);
        }

        set.retain(|_, c| c.ip_row % 2 == 0);
        assert_eq!(set.len(), 3);
        assert!(set.values().all(|c| c.ip_row % 2 == 0));
    }
}
