//! Dependency graph: per-object in-degree counts plus an arena of
//! successor-list nodes. Index 0 is reserved in both tables.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use super::relation::{ObjectId, NULL_OBJECT};

/// Index into the successor arena. 0 terminates a list.
pub type NodeIndex = u32;

/// Reserved arena index: end of a successor list.
pub const NULL_NODE: NodeIndex = 0;

/// Per-object bookkeeping. One slot per id, slot 0 unused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSlot {
    /// Incoming edges not yet retired by emission.
    pub remaining: u32,
    /// Head of the successor list, or [`NULL_NODE`].
    pub head: NodeIndex,
}

/// One successor-list node. Lists are prepend-ordered, so walking a list
/// visits successors in reverse recording order.
#[derive(Debug, Clone, Copy)]
pub struct SuccessorNode {
    pub target: ObjectId,
    pub next: NodeIndex,
}

/// Why the graph refused a relation or could not grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GraphError {
    /// Relation names id 0 or an id above the object count.
    ObjectOutOfRange = 1,
    /// Object table or arena growth could not be satisfied.
    OutOfMemory = 2,
}

impl From<TryReserveError> for GraphError {
    #[inline(always)]
    fn from(_: TryReserveError) -> Self {
        GraphError::OutOfMemory
    }
}

/// The relation graph under construction.
///
/// Built incrementally, one relation at a time. Counts are consumed later
/// by the drain; successor lists are never mutated once recorded.
pub struct DependencyGraph {
    pub(crate) slots: Vec<ObjectSlot>,
    pub(crate) pool: Vec<SuccessorNode>,
}

impl DependencyGraph {
    /// Empty graph over objects `1..=object_count`.
    ///
    /// The arena is seeded with room for two relations per object and
    /// doubles on demand; all allocation is fallible.
    pub fn new(object_count: u32) -> Result<Self, GraphError> {
        let slot_len = (object_count as usize)
            .checked_add(1)
            .ok_or(GraphError::OutOfMemory)?;
        let mut slots = Vec::new();
        slots.try_reserve_exact(slot_len)?;
        slots.resize(slot_len, ObjectSlot::default());

        let seed = (object_count as usize).saturating_mul(2).saturating_add(1);
        let mut pool = Vec::new();
        pool.try_reserve(seed)?;
        pool.push(SuccessorNode {
            target: NULL_OBJECT,
            next: NULL_NODE,
        });

        Ok(Self { slots, pool })
    }

    #[inline(always)]
    pub fn object_count(&self) -> u32 {
        (self.slots.len() - 1) as u32
    }

    /// Relations recorded so far.
    #[inline(always)]
    pub fn relation_count(&self) -> u32 {
        (self.pool.len() - 1) as u32
    }

    /// Record the relation (j, k): j must precede k.
    ///
    /// Duplicates are kept (multigraph semantics) and self-loops are
    /// accepted here; both are resolved by the drain, a self-loop as an
    /// unbreakable cycle.
    pub fn record(&mut self, pred: ObjectId, succ: ObjectId) -> Result<(), GraphError> {
        let p = self.check(pred)?;
        let s = self.check(succ)?;

        self.slots[s].remaining += 1;

        let node = self.alloc(SuccessorNode {
            target: succ,
            next: self.slots[p].head,
        })?;
        self.slots[p].head = node;
        Ok(())
    }

    /// Not-yet-retired incoming edges of `id`, or `None` for ids outside
    /// `1..=N`.
    #[inline]
    pub fn remaining_predecessors(&self, id: ObjectId) -> Option<u32> {
        self.check(id).ok().map(|idx| self.slots[idx].remaining)
    }

    /// Walk the recorded successors of `id`, most recently recorded first.
    /// Ids outside `1..=N` yield an empty walk.
    pub fn successors(&self, id: ObjectId) -> Successors<'_> {
        let head = match self.check(id) {
            Ok(idx) => self.slots[idx].head,
            Err(_) => NULL_NODE,
        };
        Successors {
            pool: &self.pool,
            node: head,
        }
    }

    #[inline(always)]
    fn check(&self, id: ObjectId) -> Result<usize, GraphError> {
        let idx = id as usize;
        if id == NULL_OBJECT || idx >= self.slots.len() {
            return Err(GraphError::ObjectOutOfRange);
        }
        Ok(idx)
    }

    /// Arena append. Doubles capacity when full; index 0 stays reserved.
    fn alloc(&mut self, node: SuccessorNode) -> Result<NodeIndex, GraphError> {
        if self.pool.len() == self.pool.capacity() {
            let grow = self.pool.len();
            self.pool.try_reserve(grow)?;
        }
        let index =
            NodeIndex::try_from(self.pool.len()).map_err(|_| GraphError::OutOfMemory)?;
        self.pool.push(node);
        Ok(index)
    }
}

/// Iterator over one object's successor list.
pub struct Successors<'a> {
    pool: &'a [SuccessorNode],
    node: NodeIndex,
}

impl Iterator for Successors<'_> {
    type Item = ObjectId;

    #[inline]
    fn next(&mut self) -> Option<ObjectId> {
        if self.node == NULL_NODE {
            return None;
        }
        let SuccessorNode { target, next } = self.pool[self.node as usize];
        self.node = next;
        Some(target)
    }
}
