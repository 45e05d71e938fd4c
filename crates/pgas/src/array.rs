use std::sync::Arc;

use crate::error::RuntimeError;
use crate::ids::LocalityId;
use crate::pin::{PinCell, PinGuard};

/// A fixed-length, block-cyclically distributed array: slot `i` is
/// logically owned by locality `(i / block_size) % localities`, but
/// physically all slots live in this process, as with every other
/// part of this simulation (see `spec.md` §6.1). Backs `CountArray`
/// and `IndexArray`.
pub struct GlobalArray<T> {
    block_size: u64,
    localities: u32,
    slots: Box<[Arc<PinCell<T>>]>,
}

impl<T> GlobalArray<T> {
    pub fn from_fn(len: u64, block_size: u64, localities: u32, mut f: impl FnMut(u64) -> T) -> Self {
        let slots = (0..len)
            .map(|i| Arc::new(PinCell::new(f(i))))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            block_size,
            localities,
            slots,
        }
    }

    pub fn len(&self) -> u64 {
        self.slots.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The locality that owns slot `index` under block-cyclic partitioning.
    pub fn owning_locality(&self, index: u64) -> LocalityId {
        LocalityId::new(((index / self.block_size) % self.localities as u64) as u32)
    }

    pub fn pin(&self, index: u64) -> Result<PinGuard<T>, RuntimeError> {
        PinCell::try_pin(&self.slots[index as usize])
    }

    /// Direct, unpinned access, used by the driver's reset and by tests
    /// that inspect final state after quiescence, when no concurrent
    /// writer can be pinning the slot anymore.
    pub fn get(&self, index: u64) -> &T {
        self.slots[index as usize].get()
    }
}
