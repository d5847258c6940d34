//! Module `lock`
//!
//! Mutual exclusion over a control connection that spans several commands.
//! Unlike a `MutexGuard`, acquire and release are separate calls, so a
//! `ControlChannel` implementation can expose them directly.
//!
//! The lock remembers the thread holding it. Single command round trips from
//! any other thread wait in [`ControlLock::turn`] until it is released, so a
//! locked command sequence is never interleaved with foreign commands.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use crate::control::ControlChannel;

/// Non-reentrant lock. A thread that acquires it twice deadlocks.
#[derive(Debug, Default)]
pub struct ControlLock {
    owner: Mutex<Option<ThreadId>>,
    released: Condvar,
}

impl ControlLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the lock is free, then takes it for the calling thread.
    pub fn acquire(&self) {
        let mut owner = self.state();
        while owner.is_some() {
            owner = self.wait(owner);
        }
        *owner = Some(thread::current().id());
    }

    /// Releases the lock if the calling thread holds it.
    pub fn release(&self) {
        let mut owner = self.state();
        if *owner == Some(thread::current().id()) {
            *owner = None;
        }
        drop(owner);
        self.released.notify_all();
    }

    /// Waits until the lock is free or held by the calling thread.
    ///
    /// The returned guard keeps other threads from acquiring the lock while
    /// the caller runs one command round trip.
    pub fn turn(&self) -> MutexGuard<'_, Option<ThreadId>> {
        let me = thread::current().id();
        let mut owner = self.state();
        while (*owner).is_some_and(|id| id != me) {
            owner = self.wait(owner);
        }
        owner
    }

    pub fn is_locked(&self) -> bool {
        self.state().is_some()
    }

    fn state(&self) -> MutexGuard<'_, Option<ThreadId>> {
        self.owner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wait<'a>(
        &self,
        guard: MutexGuard<'a, Option<ThreadId>>,
    ) -> MutexGuard<'a, Option<ThreadId>> {
        self.released
            .wait(guard)
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Holds a channel's control lock until dropped.
///
/// Every exit path, including `?` and panics, releases exactly once.
pub struct ControlLockGuard<'a, C: ControlChannel + ?Sized> {
    channel: &'a C,
}

impl<'a, C: ControlChannel + ?Sized> ControlLockGuard<'a, C> {
    pub fn acquire(channel: &'a C) -> Self {
        channel.lock_control_connection();
        Self { channel }
    }
}

impl<C: ControlChannel + ?Sized> Drop for ControlLockGuard<'_, C> {
    fn drop(&mut self) {
        self.channel.unlock_control_connection();
    }
}
