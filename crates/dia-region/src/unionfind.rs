//! Disjoint-set forest used by the labeler
//!
//! Labels are allocated sequentially from 1; slot 0 is reserved for
//! background and never handed out. Union is weighted by set size and
//! `find` does not compress paths, so `find` takes `&self`.

use crate::error::{RegionError, RegionResult};

/// Union-find over provisional labels with a hard capacity
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    size: Vec<u32>,
    count: usize,
    max_labels: u32,
}

impl UnionFind {
    /// Create an empty structure that will hand out at most `max_labels` labels
    pub fn new(max_labels: u32) -> Self {
        Self {
            parent: vec![0],
            size: vec![0],
            count: 0,
            max_labels,
        }
    }

    /// Allocate the next label as a new singleton set
    ///
    /// # Errors
    ///
    /// [`RegionError::CapacityExceeded`] once `max_labels` labels exist.
    pub fn increment(&mut self) -> RegionResult<u32> {
        let label = self.parent.len() as u32;
        if label > self.max_labels {
            return Err(RegionError::CapacityExceeded {
                max_labels: self.max_labels,
            });
        }
        self.parent.push(label);
        self.size.push(1);
        self.count += 1;
        Ok(label)
    }

    /// Number of labels allocated so far
    pub fn allocated(&self) -> u32 {
        (self.parent.len() - 1) as u32
    }

    /// Number of disjoint sets
    pub fn count(&self) -> usize {
        self.count
    }

    /// Canonical representative of the set containing `p`
    ///
    /// # Panics
    ///
    /// Panics if `p` was never allocated.
    pub fn find(&self, mut p: u32) -> u32 {
        while self.parent[p as usize] != p {
            p = self.parent[p as usize];
        }
        p
    }

    /// Whether `p` and `q` are in the same set
    pub fn connected(&self, p: u32, q: u32) -> bool {
        self.find(p) == self.find(q)
    }

    /// Merge the sets containing `p` and `q`
    ///
    /// The smaller tree is hung under the larger one. Returns `false` if
    /// they were already in the same set.
    pub fn union(&mut self, p: u32, q: u32) -> bool {
        let i = self.find(p);
        let j = self.find(q);
        if i == j {
            return false;
        }

        let (small, large) = if self.size[i as usize] < self.size[j as usize] {
            (i, j)
        } else {
            (j, i)
        };
        self.parent[small as usize] = large;
        self.size[large as usize] += self.size[small as usize];
        self.count -= 1;
        true
    }
}
