use std::collections::HashSet;

use rand::Rng;
use tracing::warn;
use trivia_common::QuizItem;

/// One loaded batch and the items not yet handed out. An item leaves
/// `unseen` the moment it is drawn, so no id is delivered twice.
#[derive(Debug, Clone)]
pub struct BatchPool {
    items: Vec<QuizItem>,
    unseen: Vec<usize>,
}

impl BatchPool {
    /// Items with an id already present in the batch are dropped.
    pub fn new(items: Vec<QuizItem>) -> Self {
        let mut ids = HashSet::new();
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if ids.insert(item.id.clone()) {
                kept.push(item);
            } else {
                warn!(id = item.id.as_str(), "Dropping quiz item with duplicate id");
            }
        }

        let unseen = (0..kept.len()).collect();
        Self { items: kept, unseen }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.unseen.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.unseen.is_empty()
    }

    /// Uniformly random unseen item, or `None` once every item was drawn.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<QuizItem> {
        if self.unseen.is_empty() {
            return None;
        }
        let pick = rng.random_range(0..self.unseen.len());
        let index = self.unseen.swap_remove(pick);
        Some(self.items[index].clone())
    }
}
