//! Animation references: the per-field header + static values every exported field carries.

use serde::{Deserialize, Serialize};

use crate::ids::{AnimId, IdAllocator};

/// Header `flags` of a reference that has at least one track.
pub const HEADER_FLAG_HAS_TRACK: u16 = 1;

/// Header `anim_flags` of a reference that has at least one track.
pub const ANIM_FLAGS_FOR_ANIMATED_PROPERTY: u16 = 6;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimRefHeader {
    /// 0 = constant, 1 = has track.
    pub flags: u16,
    pub anim_flags: u16,
    pub anim_id: AnimId,
}

impl AnimRefHeader {
    /// Header for a field that has no track (yet).
    pub fn constant(anim_id: AnimId) -> Self {
        Self {
            flags: 0,
            anim_flags: 0,
            anim_id,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.flags & HEADER_FLAG_HAS_TRACK != 0
    }
}

/// Reference from an exported field to its animation identity, with its static value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimRef<T> {
    pub header: AnimRefHeader,
    pub init_value: T,
    pub null_value: T,
}

impl<T: Clone> AnimRef<T> {
    /// Constant reference with a fresh identity; init and null both equal `value`.
    pub fn null(ids: &mut IdAllocator, value: T) -> Self {
        Self {
            header: AnimRefHeader::constant(ids.alloc_anim()),
            init_value: value.clone(),
            null_value: value,
        }
    }
}

impl<T> AnimRef<T> {
    /// Constant reference whose null value differs from its init value.
    pub fn with_null_value(ids: &mut IdAllocator, init_value: T, null_value: T) -> Self {
        Self {
            header: AnimRefHeader::constant(ids.alloc_anim()),
            init_value,
            null_value,
        }
    }

    /// Constant reference under a fixed, format-defined id.
    pub fn fixed(anim_id: AnimId, init_value: T, null_value: T) -> Self {
        Self {
            header: AnimRefHeader::constant(anim_id),
            init_value,
            null_value,
        }
    }

    #[inline]
    pub fn anim_id(&self) -> AnimId {
        self.header.anim_id
    }

    /// Upgrade the header once a track was registered for this reference.
    pub fn mark_animated(&mut self) {
        self.header.flags = HEADER_FLAG_HAS_TRACK;
        self.header.anim_flags = ANIM_FLAGS_FOR_ANIMATED_PROPERTY;
    }
}
