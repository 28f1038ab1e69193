use std::ops::{BitAnd, BitOr};

use smallvec::SmallVec;

use crate::term::TermIdx;
use crate::DEFAULT_NUM_ALL_PARENTS;

type Group = SmallVec<[TermIdx; DEFAULT_NUM_ALL_PARENTS]>;

/// A set of [`TermIdx`] representing a group of terms
///
/// Each term can occur only once in the group and the group is always sorted.
///
/// This group is used e.g. for the parents and children of a term and
/// for the items of a single transaction
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct TermGroup {
    ids: Group,
}

impl TermGroup {
    /// Constructs a new, empty [`TermGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Group::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`TermIdx`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`TermIdx`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`TermIdx`] to the group
    ///
    /// Returns whether the `TermIdx` was newly inserted. That is:
    ///
    /// - If the group did not previously contain this `TermIdx`, true is returned.
    /// - If the group already contained this `TermIdx`, false is returned.
    ///
    pub fn insert<I: Into<TermIdx>>(&mut self, id: I) -> bool {
        let id = id.into();
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Adds all [`TermIdx`]s of `other` to the group
    ///
    /// Returns the number of newly inserted ids
    pub fn extend_from(&mut self, other: &TermGroup) -> usize {
        if other.is_empty() {
            return 0;
        }
        let before = self.len();
        let merged = &*self | other;
        *self = merged;
        self.len() - before
    }

    /// Returns `true` if the group contains the [`TermIdx`]
    pub fn contains(&self, id: &TermIdx) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns `true` if every [`TermIdx`] of `self` is also in `other`
    pub fn is_subset(&self, other: &TermGroup) -> bool {
        self.len() <= other.len() && self.ids.iter().all(|id| other.contains(id))
    }

    /// Returns an Iterator of the [`TermIdx`]s inside the group
    pub fn iter(&self) -> TermIdxs {
        TermIdxs::new(self.ids.iter())
    }

    /// Returns the [`TermIdx`]s as a sorted slice
    pub fn as_slice(&self) -> &[TermIdx] {
        &self.ids
    }
}

impl FromIterator<TermIdx> for TermGroup {
    fn from_iter<T: IntoIterator<Item = TermIdx>>(iter: T) -> Self {
        let mut ids: Group = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = TermIdx;

    type IntoIter = TermIdxs<'a>;

    fn into_iter(self) -> TermIdxs<'a> {
        TermIdxs::new(self.ids.iter())
    }
}

/// An iterator over [`TermIdx`]s
pub struct TermIdxs<'a> {
    inner: std::slice::Iter<'a, TermIdx>,
}

impl<'a> TermIdxs<'a> {
    fn new(inner: std::slice::Iter<'a, TermIdx>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for TermIdxs<'a> {
    type Item = TermIdx;
    fn next(&mut self) -> Option<TermIdx> {
        self.inner.next().copied()
    }
}

impl ExactSizeIterator for TermIdxs<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl BitOr for &TermGroup {
    type Output = TermGroup;

    fn bitor(self, rhs: &TermGroup) -> TermGroup {
        let mut group = TermGroup::with_capacity(self.len() + rhs.len());
        let (lhs, rhs) = (&self.ids, &rhs.ids);
        let (mut i, mut j) = (0, 0);

        // both sides are sorted, so a single merge pass keeps the order
        while i < lhs.len() && j < rhs.len() {
            match lhs[i].cmp(&rhs[j]) {
                std::cmp::Ordering::Less => {
                    group.ids.push(lhs[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    group.ids.push(rhs[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    group.ids.push(lhs[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        group.ids.extend_from_slice(&lhs[i..]);
        group.ids.extend_from_slice(&rhs[j..]);
        group
    }
}

impl BitAnd for &TermGroup {
    type Output = TermGroup;

    fn bitand(self, rhs: &TermGroup) -> TermGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut group = TermGroup::with_capacity(small.len());

        for id in &small.ids {
            if large.contains(id) {
                group.ids.push(*id);
            }
        }
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(ids: &[u32]) -> TermGroup {
        ids.iter().map(|id| TermIdx::from(*id)).collect()
    }

    #[test]
    fn test_termgroup_iter() {
        let mut group = TermGroup::new();
        group.insert(1u32);
        group.insert(2u32);
        group.insert(3u32);
        assert!(!group.insert(2u32));

        let mut ids = Vec::new();
        for id in &group {
            ids.push(id)
        }
        assert_eq!(ids.len(), 3);

        for id in &group {
            ids.push(id)
        }
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut group = TermGroup::new();
        group.insert(5u32);
        group.insert(1u32);
        group.insert(3u32);
        assert_eq!(group, self::group(&[1, 3, 5]));
    }

    #[test]
    fn test_bitor_set1() {
        let result = &group(&[1, 2, 3]) | &group(&[2, 4]);
        assert_eq!(result, group(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_bitor_set2() {
        let result = &group(&[1, 2, 3]) | &group(&[1, 2, 4, 5]);
        assert_eq!(result, group(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_bitor_empty() {
        let result = &group(&[]) | &group(&[7, 9]);
        assert_eq!(result, group(&[7, 9]));
    }

    #[test]
    fn test_bitand() {
        let result = &group(&[1, 2, 3]) & &group(&[2, 4, 5, 1]);
        assert_eq!(result, group(&[1, 2]));
    }

    #[test]
    fn test_extend_from() {
        let mut g = group(&[1, 3]);
        assert_eq!(g.extend_from(&group(&[2, 3, 4])), 2);
        assert_eq!(g, group(&[1, 2, 3, 4]));
        assert_eq!(g.extend_from(&group(&[1, 4])), 0);
    }

    #[test]
    fn test_subset() {
        assert!(group(&[1, 3]).is_subset(&group(&[1, 2, 3])));
        assert!(!group(&[1, 5]).is_subset(&group(&[1, 2, 3])));
        assert!(group(&[]).is_subset(&group(&[])));
    }
}
