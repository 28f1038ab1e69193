//! Utility structs and methods
use std::cmp::Ordering::{Equal, Less};

/// Iterator of all one-way pairwise combinations of the inner slice
///
/// # Examples
/// ```
/// use ontomine::utils::Combinations;
///
/// let items = [1, 2, 3];
/// let mut c = Combinations::new(&items);
///
/// assert_eq!(c.next(), Some((&1, &2)));
/// assert_eq!(c.next(), Some((&1, &3)));
/// assert_eq!(c.next(), Some((&2, &3)));
/// assert!(c.next().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    inner: &'a [T],
    idx1: usize,
    idx2: usize,
    last_row: usize,
}

impl<'a, T> Combinations<'a, T> {
    /// Creates a new Combinations iterator
    pub fn new(inner: &'a [T]) -> Self {
        Self {
            inner,
            idx1: 0,
            idx2: 1,
            last_row: inner.len(),
        }
    }

    /// Creates an iterator of only the combinations of the item at `row`
    /// with all items after it
    ///
    /// Iterating all rows separately yields the same pairs as [`Combinations::new`],
    /// which allows splitting the combinations across threads.
    ///
    /// ```
    /// use ontomine::utils::Combinations;
    ///
    /// let items = [1, 2, 3];
    /// let pairs: Vec<(&i32, &i32)> = Combinations::row(&items, 1).collect();
    /// assert_eq!(pairs, vec![(&2, &3)]);
    /// ```
    pub fn row(inner: &'a [T], row: usize) -> Self {
        Self {
            inner,
            idx1: row,
            idx2: row + 1,
            last_row: (row + 1).min(inner.len()),
        }
    }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = (&'a T, &'a T);
    fn next(&mut self) -> Option<Self::Item> {
        match (
            self.idx1 < self.last_row,
            self.idx2.cmp(&self.inner.len()),
        ) {
            (true, Less) => {
                self.idx2 += 1;
                Some((&self.inner[self.idx1], &self.inner[self.idx2 - 1]))
            }
            (true, Equal) => {
                self.idx1 += 1;
                self.idx2 = self.idx1 + 1;
                self.next()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combinations() {
        let a = vec![1, 2, 3, 4];
        let mut c = Combinations::new(&a);
        assert_eq!(c.next(), Some((&1, &2)));
        assert_eq!(c.next(), Some((&1, &3)));
        assert_eq!(c.next(), Some((&1, &4)));
        assert_eq!(c.next(), Some((&2, &3)));
        assert_eq!(c.next(), Some((&2, &4)));
        assert_eq!(c.next(), Some((&3, &4)));
        assert_eq!(c.next(), None);
    }

    #[test]
    fn combinations_empty() {
        let a: Vec<usize> = vec![];
        let mut c = Combinations::new(&a);
        assert_eq!(c.next(), None);
    }

    #[test]
    fn combinations_single() {
        let a = vec![1];
        let mut c = Combinations::new(&a);
        assert_eq!(c.next(), None);
    }

    #[test]
    fn combinations_two() {
        let a = vec![1, 2];
        let mut c = Combinations::new(&a);
        assert_eq!(c.next(), Some((&1, &2)));
        assert_eq!(c.next(), None);
    }

    #[test]
    fn rows_cover_all_combinations() {
        let a = vec![1, 2, 3, 4, 5];
        let all: Vec<(&i32, &i32)> = Combinations::new(&a).collect();
        let by_row: Vec<(&i32, &i32)> = (0..a.len())
            .flat_map(|row| Combinations::row(&a, row))
            .collect();
        assert_eq!(all, by_row);
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn last_row() {
        let a = vec![1, 2, 3, 4];
        assert_eq!(Combinations::row(&a, 3).next(), None);
        assert_eq!(Combinations::row(&a, 7).next(), None);
        let mut c = Combinations::row(&a, 2);
        assert_eq!(c.next(), Some((&3, &4)));
        assert_eq!(c.next(), None);
    }
}
