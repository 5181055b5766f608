use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

use refika_core::model::{MatchingPair, PairId};

/// One batch of pairs shown together, with each column shuffled on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    index: usize,
    pairs: Vec<MatchingPair>,
    left_order: Vec<PairId>,
    right_order: Vec<PairId>,
}

impl Round {
    /// Takes up to `set_size` pairs off the front of `pool`.
    ///
    /// Returns `None` when the pool is empty.
    pub(crate) fn draw<R: Rng + ?Sized>(
        index: usize,
        pool: &mut VecDeque<MatchingPair>,
        set_size: usize,
        rng: &mut R,
    ) -> Option<Self> {
        let take = set_size.min(pool.len());
        if take == 0 {
            return None;
        }
        let pairs: Vec<MatchingPair> = pool.drain(..take).collect();

        let mut left_order: Vec<PairId> = pairs.iter().map(MatchingPair::id).collect();
        let mut right_order = left_order.clone();
        left_order.shuffle(rng);
        right_order.shuffle(rng);

        Some(Self {
            index,
            pairs,
            left_order,
            right_order,
        })
    }

    /// Zero-based position of this round within the session.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn pairs(&self) -> &[MatchingPair] {
        &self.pairs
    }

    #[must_use]
    pub fn contains(&self, id: PairId) -> bool {
        self.pairs.iter().any(|pair| pair.id() == id)
    }

    #[must_use]
    pub fn pair(&self, id: PairId) -> Option<&MatchingPair> {
        self.pairs.iter().find(|pair| pair.id() == id)
    }

    #[must_use]
    pub fn left_order(&self) -> &[PairId] {
        &self.left_order
    }

    #[must_use]
    pub fn right_order(&self) -> &[PairId] {
        &self.right_order
    }

    /// Left column in display order, each fragment tagged with its pair id.
    pub fn left_column(&self) -> impl Iterator<Item = (PairId, &str)> + '_ {
        self.left_order
            .iter()
            .filter_map(|id| self.pair(*id).map(|pair| (*id, pair.left_text())))
    }

    /// Right column in display order, each fragment tagged with its pair id.
    pub fn right_column(&self) -> impl Iterator<Item = (PairId, &str)> + '_ {
        self.right_order
            .iter()
            .filter_map(|id| self.pair(*id).map(|pair| (*id, pair.right_text())))
    }
}
