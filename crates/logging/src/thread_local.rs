//! crates/logging/src/thread_local.rs
//! Per-thread state: the render scratch buffer and the bridge reentrancy flag.

use std::cell::RefCell;

/// Scratch buffers larger than this are released after use.
const SCRATCH_RETAIN_LIMIT: usize = 64 * 1024;

thread_local! {
    static SCRATCH: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Runs `f` with a cleared, reusable string buffer.
///
/// Nested calls (a formatter or sink that logs while rendering) get a fresh
/// buffer instead of the shared one.
pub(crate) fn with_scratch<R>(f: impl FnOnce(&mut String) -> R) -> R {
    SCRATCH.with(|cell| match cell.try_borrow_mut() {
        Ok(mut buffer) => {
            buffer.clear();
            let result = f(&mut buffer);
            if buffer.capacity() > SCRATCH_RETAIN_LIMIT {
                buffer.clear();
                buffer.shrink_to(SCRATCH_RETAIN_LIMIT / 16);
            }
            result
        }
        Err(_) => f(&mut String::new()),
    })
}

#[cfg(feature = "tracing-bridge")]
pub(crate) use bridge::BridgeGuard;

#[cfg(feature = "tracing-bridge")]
mod bridge {
    use std::cell::Cell;

    thread_local! {
        static BRIDGING: Cell<bool> = const { Cell::new(false) };
    }

    /// Marks the current thread as forwarding a `tracing` event.
    ///
    /// While the guard lives, further events raised on this thread (for
    /// example by a failing destination) are not forwarded again.
    pub(crate) struct BridgeGuard(());

    impl BridgeGuard {
        pub(crate) fn enter() -> Option<Self> {
            BRIDGING.with(|flag| {
                if flag.replace(true) {
                    None
                } else {
                    Some(Self(()))
                }
            })
        }
    }

    impl Drop for BridgeGuard {
        fn drop(&mut self) {
            BRIDGING.with(|flag| flag.set(false));
        }
    }
}
