//! Tri-state cycle flag shared between the frame loop and the worker.

use std::sync::atomic::{AtomicU8, Ordering};

/// Where the streaming cycle currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CycleStatus {
    /// The terrain state is with the frame loop; a new cycle may start.
    Idle = 0,
    /// The worker owns the terrain state and is running a cycle.
    Updating = 1,
    /// The cycle is done and its result waits to be attached.
    Finished = 2,
}

impl CycleStatus {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Updating),
            2 => Some(Self::Finished),
            _ => None,
        }
    }
}

/// Atomic cell holding a [`CycleStatus`].
#[derive(Debug)]
pub(crate) struct StatusCell(AtomicU8);

impl StatusCell {
    pub(crate) fn new(status: CycleStatus) -> Self {
        Self(AtomicU8::new(status as u8))
    }

    pub(crate) fn load(&self) -> CycleStatus {
        // Only valid discriminants are ever stored.
        CycleStatus::from_u8(self.0.load(Ordering::Acquire)).unwrap_or(CycleStatus::Idle)
    }

    pub(crate) fn store(&self, status: CycleStatus) {
        self.0.store(status as u8, Ordering::Release);
    }

    /// Stores `status`, returning the previous value.
    pub(crate) fn swap(&self, status: CycleStatus) -> CycleStatus {
        CycleStatus::from_u8(self.0.swap(status as u8, Ordering::AcqRel)).unwrap_or(CycleStatus::Idle)
    }
}
