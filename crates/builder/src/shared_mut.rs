/// A raw pointer that can be shared across threads when the caller has
/// already established that concurrent writers only ever touch
/// disjoint indices. Grounded on `crates/builder/src/graph/csr.rs`'s
/// identically-named helper, used there for exactly the same
/// fetch-add-a-cursor-then-write pattern.
pub(crate) struct SharedMut<T>(*mut T);

unsafe impl<T> Send for SharedMut<T> {}
unsafe impl<T> Sync for SharedMut<T> {}

impl<T> SharedMut<T> {
    pub(crate) fn new(ptr: *mut T) -> Self {
        Self(ptr)
    }

    delegate::delegate! {
        to self.0 {
            pub(crate) unsafe fn add(&self, count: usize) -> *mut T;
        }
    }
}
