//! Deferred work: the post-mutation pass.
//!
//! Chain renumbering must observe the document *after* the triggering
//! mutation, so actions write a task into a single-slot queue which the
//! dispatcher drains once the current mutation has committed, before the
//! next event is accepted. This is a deliberate stand-in for a general
//! async mechanism: one slot, drained at one well-defined point.

use vellum_model::BlockPath;

use crate::chain::ListChain;

/// Work scheduled to run after the current mutation commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Renumber the given chains within the region's block sequence.
    CommitListChains {
        region: BlockPath,
        chains: Vec<ListChain>,
    },
}

/// Single-slot task queue. Scheduling while a task is pending replaces
/// it; one event produces at most one deferred pass.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    slot: Option<DeferredTask>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: DeferredTask) {
        if self.slot.is_some() {
            tracing::trace!(target: "vellum::dispatch", "replacing pending deferred task");
        }
        self.slot = Some(task);
    }

    pub fn take(&mut self) -> Option<DeferredTask> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(region: BlockPath) -> DeferredTask {
        DeferredTask::CommitListChains {
            region,
            chains: Vec::new(),
        }
    }

    #[test]
    fn test_scheduling_twice_keeps_one() {
        let mut queue = DeferredQueue::new();
        queue.schedule(make_task(vec![0]));
        queue.schedule(make_task(vec![1]));
        assert_eq!(queue.take(), Some(make_task(vec![1])));
        assert_eq!(queue.take(), None);
        assert!(queue.is_empty());
    }
}
