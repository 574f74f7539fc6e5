// SPDX-License-Identifier: GPL-3.0
// drive.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use thiserror::Error;

/// This module contains the default GD-ROM drive driver implementation. There
/// may be others in future.
pub mod gd_drive;

/// This enum is the only error vocabulary the driver exposes above the command
/// execution engine; every raw firmware outcome and sub-code is folded into
/// it. Integer codes match the original firmware return values and are listed
/// explicitly. `NoDisc` and `DiscChanged` are recoverable disc-state
/// conditions which callers are expected to retry or re-initialise on;
/// `Timeout` means the command was actively aborted before returning.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
#[repr(i32)]
pub enum DriveError {

    #[error("no disc in drive")]
    NoDisc = 1,

    #[error("disc changed, but not reinitialised yet")]
    DiscChanged = 2,

    #[error("system error")]
    SystemError = 3,

    #[error("command aborted")]
    Aborted = 4,

    #[error("system inactive")]
    NotActive = 5,

    #[error("aborted due to timeout")]
    Timeout = 6,
}

/// Every driver operation reports its outcome as a plain value of this type;
/// no panics or unwinding on any driver path.
pub type CdCmdResult = Result<(), DriveError>;

/// This enum represents the ways the status query can fail. It is kept apart
/// from `DriveError` deliberately: the query can be issued from restricted
/// contexts where failing fast matters more than precise classification.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum StatusError {

    #[error("hardware access gate unavailable")]
    Unavailable,

    #[error("drive status could not be read")]
    CheckFailed,
}

/// This enum selects how sectors are read from the disc, via PIO or DMA.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum CdReadMode {
    Pio,
    Dma,
}

/// This enum selects how CDDA playback positions are interpreted: by track
/// number (PLAY) or by sector number (PLAY2).
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum CddaMode {
    Tracks,
    Sectors,
}
