//! Copy-on-write record sequences.
//!
//! A `RecordStore` is a handle to an immutable snapshot. Every mutating
//! operation builds a new snapshot and returns a new handle; handles to
//! earlier snapshots keep seeing exactly what they saw before.

use std::sync::Arc;

use crate::models::{Draft, DraftContext};

pub trait Identified {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Front,
    Back,
}

#[derive(Debug)]
pub struct RecordStore<T> {
    items: Arc<[T]>,
}

impl<T> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }
}

impl<T: Clone> From<Vec<T>> for RecordStore<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }
}

impl<T: Clone> RecordStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    pub fn add(&self, item: T, placement: Placement) -> Self {
        let mut next = Vec::with_capacity(self.items.len() + 1);
        match placement {
            Placement::Front => {
                next.push(item);
                next.extend(self.items.iter().cloned());
            }
            Placement::Back => {
                next.extend(self.items.iter().cloned());
                next.push(item);
            }
        }
        Self::from(next)
    }

    /// Build a record from `draft` and add it. A draft missing a required field
    /// yields `None` and the store comes back on the same snapshot.
    pub fn create<D>(&self, draft: D, ctx: &DraftContext<'_>, placement: Placement) -> (Self, bool)
    where
        D: Draft<Record = T>,
    {
        match draft.into_record(ctx) {
            Some(record) => (self.add(record, placement), true),
            None => (self.clone(), false),
        }
    }

    pub fn update<P, F>(&self, mut pred: P, mut patch: F) -> Self
    where
        P: FnMut(&T) -> bool,
        F: FnMut(&mut T),
    {
        let next: Vec<T> = self
            .items
            .iter()
            .map(|item| {
                let mut copy = item.clone();
                if pred(item) {
                    patch(&mut copy);
                }
                copy
            })
            .collect();
        Self::from(next)
    }

    pub fn toggle<P, F>(&self, pred: P, mut field: F) -> Self
    where
        P: FnMut(&T) -> bool,
        F: FnMut(&mut T) -> &mut bool,
    {
        self.update(pred, |item| {
            let flag = field(item);
            *flag = !*flag;
        })
    }

    pub fn map_all<F>(&self, patch: F) -> Self
    where
        F: FnMut(&mut T),
    {
        self.update(|_| true, patch)
    }
}

impl<T: Clone + Identified> RecordStore<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn update_by_id<F>(&self, id: &str, patch: F) -> Self
    where
        F: FnMut(&mut T),
    {
        self.update(|item| item.id() == id, patch)
    }

    pub fn toggle_by_id<F>(&self, id: &str, field: F) -> Self
    where
        F: FnMut(&mut T) -> &mut bool,
    {
        self.toggle(|item| item.id() == id, field)
    }
}

impl<'a, T> IntoIterator for &'a RecordStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        flag: bool,
        n: i32,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, n: i32) -> Row {
        Row {
            id: id.to_string(),
            flag: false,
            n,
        }
    }

    #[test]
    fn add_respects_placement() {
        let s = RecordStore::from(vec![row("a", 1)]);
        let front = s.add(row("b", 2), Placement::Front);
        let back = s.add(row("c", 3), Placement::Back);
        let ids = |s: &RecordStore<Row>| s.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&front), vec!["b", "a"]);
        assert_eq!(ids(&back), vec!["a", "c"]);
        assert_eq!(ids(&s), vec!["a"]);
    }

    #[test]
    fn update_patches_all_matches_and_leaves_old_snapshot() {
        let s = RecordStore::from(vec![row("a", 1), row("b", 2), row("c", 3)]);
        let before: Vec<Row> = s.snapshot().to_vec();
        let next = s.update(|r| r.n >= 2, |r| r.n *= 10);
        assert!(!next.same_snapshot(&s));
        assert_eq!(next.iter().map(|r| r.n).collect::<Vec<_>>(), vec![1, 20, 30]);
        assert_eq!(s.snapshot(), before.as_slice());
    }

    #[test]
    fn toggle_flips_twice_back_to_start() {
        let s = RecordStore::from(vec![row("a", 1), row("b", 2)]);
        let once = s.toggle_by_id("b", |r| &mut r.flag);
        assert_eq!(once.get("b").map(|r| r.flag), Some(true));
        assert_eq!(once.get("a").map(|r| r.flag), Some(false));
        let twice = once.toggle_by_id("b", |r| &mut r.flag);
        assert_eq!(twice.snapshot(), s.snapshot());
    }

    #[test]
    fn update_with_no_match_still_yields_a_fresh_snapshot() {
        let s = RecordStore::from(vec![row("a", 1)]);
        let next = s.update_by_id("missing", |r| r.n = 99);
        assert!(!next.same_snapshot(&s));
        assert_eq!(next.snapshot(), s.snapshot());
    }

    #[test]
    fn map_all_touches_every_row() {
        let s = RecordStore::from(vec![row("a", 1), row("b", 2)]);
        let all = s.map_all(|r| r.flag = true);
        assert!(all.iter().all(|r| r.flag));
        assert!(s.iter().all(|r| !r.flag));
    }

    #[test]
    fn empty_store_is_empty() {
        let s: RecordStore<Row> = RecordStore::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert!(!s.contains("a"));
    }
}
