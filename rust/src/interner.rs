//! Department code interning for the interleaver's hot loop.
//!
//! Every seat decision compares the departments of up to a handful of
//! neighbours, so codes are mapped to small integers once per hall.

use rustc_hash::FxHashMap;

/// Interned department code (u32 for compact storage and fast comparison).
pub type DeptId = u32;

/// Maps department codes to dense integer ids in first-seen order.
#[derive(Debug, Clone)]
pub struct DepartmentInterner<'a> {
    to_int: FxHashMap<&'a str, DeptId>,
}

impl<'a> DepartmentInterner<'a> {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Intern a code, returning its id.
    /// If already interned, returns the existing id.
    pub fn intern(&mut self, code: &'a str) -> DeptId {
        if let Some(&id) = self.to_int.get(code) {
            return id;
        }
        let id = self.to_int.len() as DeptId;
        self.to_int.insert(code, id);
        id
    }

    /// Number of distinct codes seen.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.to_int.len()
    }
}
