//! Enumeration of subsets, used to recombine modular factors.
//!
//! ```rust
//! use polyfactor::combinatorics::CombinationIterator;
//!
//! let mut c = CombinationIterator::new(4, 3);
//! let mut combinations = vec![];
//! while let Some(a) = c.next() {
//!     combinations.push(a.to_vec());
//! }
//!
//! let ans = vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
//!
//! assert_eq!(combinations, ans);
//! ```

/// An iterator over all `k`-element subsets of `0..n` in lexicographic order.
/// The subsets are lent out, so that no allocation is needed per step.
pub struct CombinationIterator {
    n: usize,
    indices: Vec<usize>,
    init: bool,
}

impl CombinationIterator {
    pub fn new(n: usize, k: usize) -> CombinationIterator {
        CombinationIterator {
            indices: (0..k).collect(),
            n,
            init: false,
        }
    }

    /// Advance to the next subset.
    pub fn next(&mut self) -> Option<&[usize]> {
        if self.indices.is_empty() || self.indices.len() > self.n {
            return None;
        }

        if !self.init {
            self.init = true;
            return Some(&self.indices);
        }

        let k = self.indices.len();
        let i = self
            .indices
            .iter()
            .enumerate()
            .rposition(|(i, v)| *v < self.n - k + i)?;

        let a = self.indices[i] + 1;
        for (p, vv) in self.indices[i..].iter_mut().enumerate() {
            *vv = a + p;
        }

        Some(&self.indices)
    }

    /// Advance to the next subset that contains none of the indices in `excluded`.
    pub fn next_excluding(&mut self, excluded: &[bool]) -> Option<&[usize]> {
        loop {
            let c = self.next()?;
            if c.iter().all(|i| !excluded[*i]) {
                return Some(&self.indices);
            }
        }
    }
}
