#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod core;

#[cfg(feature = "std")]
pub mod stream;

/// Prelude for convenient imports of primary API types.
pub mod prelude {
    pub use crate::core::drain::{Completion, Drain};
    pub use crate::core::graph::{DependencyGraph, GraphError};
    pub use crate::core::relation::{ObjectId, RawRelation, NULL_OBJECT};

    #[cfg(feature = "std")]
    pub use crate::stream::{run, OrderWriter, RelationReader, StreamError};
}

// Re-export primary types at crate root for convenience.
pub use crate::core::drain::{Completion, Drain};
pub use crate::core::graph::{DependencyGraph, GraphError};
pub use crate::core::relation::{ObjectId, RawRelation, NULL_OBJECT};

#[cfg(feature = "std")]
pub use crate::stream::{run, StreamError};
