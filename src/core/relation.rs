//! Relation records: the fixed-width wire unit of the precedence stream.
//! Layout: [pred:u32le][succ:u32le], 8 bytes, no padding.

use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Object identifier. Real objects are `1..=N`; 0 is reserved.
pub type ObjectId = u32;

/// The reserved id. Never names a real object; doubles as the list and
/// queue sentinel throughout the engine.
pub const NULL_OBJECT: ObjectId = 0;

/// Bytes per relation record on the wire.
pub const RELATION_SIZE: usize = 8;

/// One wire record: an ordered (predecessor, successor) pair.
///
/// Two records are structural rather than edges: the stream header
/// `(0, N)` and the terminator `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct RawRelation {
    pub pred: U32<LittleEndian>,
    pub succ: U32<LittleEndian>,
}

const _: () = {
    assert!(core::mem::size_of::<RawRelation>() == RELATION_SIZE);
    assert!(core::mem::align_of::<RawRelation>() == 1);
};

impl RawRelation {
    #[inline(always)]
    pub fn new(pred: ObjectId, succ: ObjectId) -> Self {
        Self {
            pred: U32::new(pred),
            succ: U32::new(succ),
        }
    }

    /// Terminator: both fields zero.
    #[inline(always)]
    pub fn is_terminator(&self) -> bool {
        self.pred.get() == NULL_OBJECT && self.succ.get() == NULL_OBJECT
    }

    /// Interpret this record as the stream header `(0, N)`.
    ///
    /// Yields the object count N, or `None` when the predecessor field is
    /// nonzero and the record cannot be a header.
    #[inline]
    pub fn as_header(&self) -> Option<u32> {
        if self.pred.get() == NULL_OBJECT {
            Some(self.succ.get())
        } else {
            None
        }
    }
}
