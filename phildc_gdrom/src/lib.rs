// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// Crate-wide lines to disable specific lints:

// Given the code has been carefully ported from C by hand as a re-learning
// experience, to keep semantics as close as possible, there will be no
// derived Default implementations unless needed.
#![allow(clippy::new_without_default)]

// We use upper-case acronyms for some enums, in order to match the original
// C source more closely.
#![allow(clippy::upper_case_acronyms)]

/// This module contains the firmware system-call boundary of the GD-ROM drive,
/// including the wire-contract types shared with it.
pub mod firmware;

/// This module contains the host-services boundary (millisecond timer and
/// cooperative yield) that the driver polls through.
pub mod host;

/// This module contains the GD-ROM drive driver itself.
pub mod drive;

/// This module contains the table-of-contents model and the data track locator.
pub mod toc;
