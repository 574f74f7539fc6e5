// SPDX-License-Identifier: GPL-3.0
// std_host.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::thread;
use std::time::Instant;

use super::HostContext;

/// This struct provides host services over the Rust standard library.
pub struct StdHost {

    // This anchors the millisecond counter.
    epoch: Instant,
}

/// Implementation functions for the std host itself.
impl StdHost {

    /// Creates a new std host object with the correct initial state.
    pub fn new() -> Self {
        StdHost {

            // Anchor the counter at creation time.
            epoch: Instant::now(),
        }
    }
}

/// Implementation functions to be called from anything that understands what
/// a HostContext object is.
impl HostContext for StdHost {

    /// Milliseconds elapsed since this host object was created.
    fn timer_millis(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Cooperatively gives up the rest of this thread's timeslice.
    fn thread_pass(&self) {
        thread::yield_now();
    }
}
