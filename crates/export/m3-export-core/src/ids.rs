//! Animation identities and the allocator that hands them out during one export run.

use serde::{Deserialize, Serialize};

/// Identity binding a field's baseline reference to the tracks registered for it.
/// Zero is reserved as "unset" (the default) and never produced by [`IdAllocator`].
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub struct AnimId(pub u32);

/// Sentinel id shared by the synthetic clip-end event of every clip.
pub const ANIM_END_EVENT_ID: AnimId = AnimId(0x65bd_3215);

/// Id the format uses for the bounding animation of a mesh section.
pub const BOUNDINGS_ANIM_ID: AnimId = AnimId(0x001f_9bd2);

/// Monotonic allocator for AnimId.
/// Scoped to one export; a fresh exporter starts counting at 1 again.
#[derive(Default, Debug)]
pub struct IdAllocator {
    last: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next identity. Increments first so 0 is never handed out.
    #[inline]
    pub fn alloc_anim(&mut self) -> AnimId {
        self.last += 1;
        AnimId(self.last)
    }

    /// Number of identities allocated so far.
    #[inline]
    pub fn allocated(&self) -> u32 {
        self.last
    }
}
