//! The engine. Relation records, the dependency graph, the ready queue,
//! and the drain that turns them into one linear order.

pub mod drain;
pub mod graph;
pub mod queue;
pub mod relation;

pub use drain::{Completion, Drain};
pub use graph::{DependencyGraph, GraphError, NodeIndex, SuccessorNode, Successors, NULL_NODE};
pub use queue::ReadyQueue;
pub use relation::{ObjectId, RawRelation, NULL_OBJECT, RELATION_SIZE};
