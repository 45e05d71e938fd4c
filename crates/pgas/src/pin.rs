use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::RuntimeError;

/// Wraps a record with the pin/unpin contract of the PGAS runtime
/// surface: at most one caller may hold a local pointer to the record
/// at a time, a second concurrent attempt observes [`RuntimeError::Busy`]
/// rather than blocking.
#[derive(Debug)]
pub struct PinCell<T> {
    pinned: AtomicBool,
    value: T,
}

impl<T> PinCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            pinned: AtomicBool::new(false),
            value,
        }
    }

    /// Acquires a local pointer to `self`, or reports that it is busy.
    pub fn try_pin(self_arc: &Arc<Self>) -> Result<PinGuard<T>, RuntimeError> {
        match self_arc
            .pinned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(PinGuard {
                cell: Arc::clone(self_arc),
            }),
            Err(_) => {
                log::trace!("pin contention: record already pinned, caller should retry");
                Err(RuntimeError::Busy)
            }
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

/// A local pointer obtained from [`PinCell::try_pin`]. Unpins on drop.
pub struct PinGuard<T> {
    cell: Arc<PinCell<T>>,
}

impl<T> Deref for PinGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.cell.value
    }
}

impl<T> Drop for PinGuard<T> {
    fn drop(&mut self) {
        self.cell.pinned.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_pin_is_busy_until_first_drops() {
        let cell = Arc::new(PinCell::new(42));

        let guard = PinCell::try_pin(&cell).unwrap();
        assert!(matches!(PinCell::try_pin(&cell), Err(RuntimeError::Busy)));

        drop(guard);
        assert!(PinCell::try_pin(&cell).is_ok());
    }

    #[test]
    fn pin_derefs_to_the_value() {
        let cell = Arc::new(PinCell::new(String::from("vertex")));
        let guard = PinCell::try_pin(&cell).unwrap();
        assert_eq!(&*guard, "vertex");
    }
}
