//! Bounded FIFO of player intents.
//!
//! The input collaborator pushes intents whenever they arrive; the session
//! drains the whole queue once per tick, in arrival order. Storage is a fixed
//! `ArrayVec`, so queueing never allocates; a full queue drops the newest intent.

use arrayvec::ArrayVec;
use log::warn;

use crate::types::{Intent, INPUT_QUEUE_CAPACITY};

pub type IntentBatch = ArrayVec<Intent, INPUT_QUEUE_CAPACITY>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputQueue {
    pending: IntentBatch,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an intent. Returns false if the queue was full and it was dropped.
    pub fn push(&mut self, intent: Intent) -> bool {
        match self.pending.try_push(intent) {
            Ok(()) => true,
            Err(_) => {
                warn!("input queue full, dropping {}", intent.as_str());
                false
            }
        }
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> IntentBatch {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_arrival_order() {
        let mut queue = InputQueue::new();
        queue.push(Intent::MoveLeft);
        queue.push(Intent::RotateCw);
        queue.push(Intent::HardDrop);

        let batch = queue.drain();
        assert_eq!(
            batch.as_slice(),
            &[Intent::MoveLeft, Intent::RotateCw, Intent::HardDrop]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn overflow_drops_newest() {
        let mut queue = InputQueue::new();
        for _ in 0..INPUT_QUEUE_CAPACITY {
            assert!(queue.push(Intent::MoveRight));
        }
        assert!(!queue.push(Intent::HardDrop));
        assert_eq!(queue.len(), INPUT_QUEUE_CAPACITY);
        assert!(queue.drain().iter().all(|&i| i == Intent::MoveRight));
    }
}
