//! Per-object reentrant advisory lock.
//!
//! Owner thread id plus depth counter behind a condition variable. The
//! owning thread may re-acquire (depth increments); any other thread
//! blocks until the depth returns to zero. Releasing a lock the calling
//! thread does not own is a no-op.
//!
//! The lock is advisory: the store itself never takes it, and it must not
//! be held across calls that can block indefinitely.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

#[derive(Debug, Default)]
struct LockState {
    owner: Option<ThreadId>,
    depth: u32,
}

#[derive(Debug, Default)]
pub(crate) struct ObjectLock {
    state: Mutex<LockState>,
    released: Condvar,
}

impl ObjectLock {
    pub(crate) fn new() -> Self {
        ObjectLock::default()
    }

    fn state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Acquires the lock for the calling thread, blocking while another
    /// thread owns it.
    pub(crate) fn acquire(&self) {
        let me = thread::current().id();
        let mut state = self.state();
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.depth = 1;
                    return;
                }
                Some(owner) if owner == me => {
                    state.depth += 1;
                    return;
                }
                Some(_) => {
                    state = self
                        .released
                        .wait(state)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
            }
        }
    }

    /// Releases one acquisition by the calling thread. No-op if the
    /// calling thread is not the owner.
    pub(crate) fn release(&self) {
        let me = thread::current().id();
        let mut state = self.state();
        if state.owner != Some(me) {
            return;
        }
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.released.notify_all();
        }
    }

    #[cfg(test)]
    pub(crate) fn held(&self) -> bool {
        self.state().owner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_reentrant_acquire_release() {
        let lock = ObjectLock::new();
        lock.acquire();
        lock.acquire();
        lock.release();
        assert!(lock.held());
        lock.release();
        assert!(!lock.held());
    }

    #[test]
    fn test_foreign_release_is_noop() {
        let lock = Arc::new(ObjectLock::new());
        lock.acquire();

        let other = Arc::clone(&lock);
        thread::spawn(move || other.release()).join().unwrap();
        assert!(lock.held());
        lock.release();
        assert!(!lock.held());
    }

    #[test]
    fn test_other_thread_blocks_until_fully_released() {
        let lock = Arc::new(ObjectLock::new());
        lock.acquire();
        lock.acquire();

        let (tx, rx) = mpsc::channel();
        let contender = Arc::clone(&lock);
        let handle = thread::spawn(move || {
            contender.acquire();
            tx.send(()).unwrap();
            contender.release();
        });

        // Still held twice: the contender must not get through.
        lock.release();
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        lock.release();
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
        handle.join().unwrap();
    }
}
