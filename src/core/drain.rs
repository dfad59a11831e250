//! Drain: emit ready objects in dependency order, detect stalls.

use alloc::vec::Vec;

use super::graph::{DependencyGraph, GraphError, SuccessorNode, NULL_NODE};
use super::queue::ReadyQueue;
use super::relation::ObjectId;

/// How a drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every object was emitted: the yielded sequence is a valid total
    /// order over all N objects.
    Complete,
    /// The queue ran dry early: `remaining` objects sit on at least one
    /// dependency cycle and can never become ready.
    Cyclic {
        /// Objects never emitted.
        remaining: u32,
    },
}

impl Completion {
    #[inline(always)]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Completion::Complete)
    }
}

/// Iterator yielding object ids in topological order.
///
/// Consumes the graph: predecessor counts are spent as objects are
/// emitted. The seed scan runs from N down to 1, so objects that start
/// with no predecessors come out highest-id-first; afterwards objects are
/// yielded in the order they become ready. The tie-break is fixed, making
/// the full output deterministic for a given input.
///
/// Exhaustion alone does not mean success; ask [`Drain::completion`] once
/// `next` has returned `None`.
pub struct Drain {
    graph: DependencyGraph,
    queue: ReadyQueue,
    remaining: u32,
}

impl Drain {
    /// Seed the ready queue with every object that has no predecessors.
    pub fn new(graph: DependencyGraph) -> Result<Self, GraphError> {
        let count = graph.object_count();
        let mut queue = ReadyQueue::new(count)?;
        for id in (1..=count).rev() {
            if graph.slots[id as usize].remaining == 0 {
                queue.push(id);
            }
        }
        Ok(Self {
            graph,
            queue,
            remaining: count,
        })
    }

    /// Objects not yet emitted.
    #[inline(always)]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The verdict. Meaningful once the iterator is exhausted.
    #[inline]
    pub fn completion(&self) -> Completion {
        debug_assert!(self.queue.is_empty(), "drain not exhausted");
        if self.remaining == 0 {
            Completion::Complete
        } else {
            Completion::Cyclic {
                remaining: self.remaining,
            }
        }
    }

    /// Run the drain to exhaustion, collecting the emitted order.
    pub fn collect_with_completion(mut self) -> Result<(Vec<ObjectId>, Completion), GraphError> {
        let mut order = Vec::new();
        order.try_reserve_exact(self.remaining as usize)?;
        for id in &mut self {
            order.push(id);
        }
        Ok((order, self.completion()))
    }
}

impl Iterator for Drain {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        let front = self.queue.pop()?;
        self.remaining -= 1;

        // Retire front's outgoing edges; successors whose count reaches
        // zero join the queue tail.
        let mut node = self.graph.slots[front as usize].head;
        while node != NULL_NODE {
            let SuccessorNode { target, next } = self.graph.pool[node as usize];
            let slot = &mut self.graph.slots[target as usize];
            slot.remaining -= 1;
            if slot.remaining == 0 {
                self.queue.push(target);
            }
            node = next;
        }

        Some(front)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}
