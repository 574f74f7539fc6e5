// SPDX-License-Identifier: GPL-3.0
// gd_drive.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// This module contains the low-level primitives for accessing the CD-ROM (I
// refer to it as a CD-ROM and not a GD-ROM, because this code will not access
// the GD area, by design). Commands are submitted to the firmware and then
// polled to a terminal outcome under a single exclusive gate over the shared
// bus, so the filesystem layer and CDDA playback code can call in from
// multiple threads.
//
// All of this could be made non-blocking by tracking the handle returned from
// each submission and checking it manually instead of polling to completion;
// that would allow data reads while CDDA is playing without hiccups.

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use log::error;
use phildc_utility::min;

use super::{CdCmdResult, CdReadMode, CddaMode, DriveError, StatusError};
use crate::firmware::{
    CdArea, CdCheckDriveParams, CdCmdChk, CdCmdChkStatus, CdCmdCode, CdCmdParams, CdDiscType,
    CdReadSecPart, CdSecModeParams, CdSubType, CdTrackType, CmdHandle, GdromSyscalls,
};
use crate::host::HostContext;
use crate::toc::Toc;

/// Max times to retry submitting a command.
const CMD_RETRY_MAX: usize = 10;

/// Timeout in milliseconds applied to each INIT command during re-init.
const INIT_TIMEOUT_MILLIS: u64 = 10_000;

/// This struct is the driver for the GD-ROM drive. It owns the hardware
/// access gate: the firmware is only reachable through the mutex, so holding
/// the guard is what it means to hold the bus.
pub struct GdromDrive<F, H> {

    // The gate. One exclusive holder at a time serialises all bus traffic.
    gate: Mutex<F>,

    // Host scheduling services used by the polling loops.
    host: H,
}

/// Implementation functions for the GD-ROM drive driver itself.
impl<F: GdromSyscalls, H: HostContext> GdromDrive<F, H> {

    /// Creates a new driver object wrapping the given firmware and host.
    pub fn new(firmware: F, host: H) -> Self {
        GdromDrive {

            // Place the firmware behind the gate.
            gate: Mutex::new(firmware),

            // Store the host services.
            host,
        }
    }

    /// Initialise the drive for reading CDs: reset and restart the firmware,
    /// then run a full re-init. Board-specific drive reactivation (the BIOS
    /// verification scan on real hardware) happens inside the firmware's
    /// `reset` implementation.
    pub fn init(&self) -> CdCmdResult {

        {
            let mut firmware = self.lock_gate();
            firmware.reset();
            firmware.init();
        }

        self.reinit()
    }

    /// Shortcut to `reinit_ex`. Typically this is the only thing changed.
    pub fn set_sector_size(&self, size: i32) -> CdCmdResult {
        self.reinit_ex(None, None, Some(size))
    }

    /// Execute a command with no timeout, polling until a terminal outcome.
    /// Used for short, always-terminating commands.
    pub fn exec_cmd(&self, cmd: CdCmdCode, params: &mut CdCmdParams<'_>) -> CdCmdResult {
        self.exec_cmd_timed(cmd, params, 0)
    }

    /// Execute a command, polling the firmware to a terminal outcome with the
    /// given timeout in milliseconds (0 = poll forever). The gate is held
    /// from before submission until the result is determined, including on
    /// the early timeout return; timing out actively aborts the in-flight
    /// command so the hardware is not left mid-command.
    pub fn exec_cmd_timed(
        &self,
        cmd: CdCmdCode,
        params: &mut CdCmdParams<'_>,
        timeout: u64
    ) -> CdCmdResult {

        let mut status = CdCmdChkStatus::new();
        let mut firmware = self.lock_gate();

        // Submit the command.
        let mut id: CmdHandle = 0;
        for _ in 0..CMD_RETRY_MAX {
            id = firmware.send_command(cmd, params);
            if id != 0 {
                break;
            }
            firmware.exec_server();
            self.host.thread_pass();
        }

        if id <= 0 {
            return Err(DriveError::SystemError);
        }

        // Wait for the command to finish.
        let begin = if timeout != 0 { self.host.timer_millis() } else { 0 };

        let outcome = loop {
            firmware.exec_server();
            let n = firmware.check_command(id, &mut status);

            if n != CdCmdChk::Processing && n != CdCmdChk::Busy {
                break n;
            }

            if timeout != 0 && (self.host.timer_millis() - begin) >= timeout {
                firmware.abort_command(id);
                firmware.exec_server();
                error!("exec_cmd_timed: timeout exceeded");
                return Err(DriveError::Timeout);
            }

            self.host.thread_pass();
        };

        match outcome {
            CdCmdChk::Completed | CdCmdChk::Streaming => Ok(()),
            CdCmdChk::NotFound => Err(DriveError::NotActive),
            _ => match status.err1 {
                2 => Err(DriveError::NoDisc),
                6 => Err(DriveError::DiscChanged),
                _ => Err(DriveError::SystemError),
            },
        }
    }

    /// Return the status of the drive and the type of the inserted disc. We
    /// might be called in an interrupt to check for cache flushing, so this
    /// never waits for the gate: if a command is in progress the query fails
    /// straight away with `Unavailable` rather than blocking.
    pub fn get_status(&self) -> Result<CdCheckDriveParams, StatusError> {

        let mut firmware = match self.gate.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(StatusError::Unavailable),
        };

        let mut params = CdCheckDriveParams::new();

        let rv = loop {
            let rv = firmware.check_drive(&mut params);
            if rv != CdCmdChk::Busy as i32 {
                break rv;
            }
            self.host.thread_pass();
        };

        drop(firmware);

        if rv >= 0 {
            Ok(params)
        } else {
            Err(StatusError::CheckFailed)
        }
    }

    /// Resolve the sector datatype parameters and apply them through the
    /// firmware sector mode primitive. Each parameter may be `None` to
    /// request its default: with a raw 2352-byte size the defaults resolve to
    /// the whole sector of any track type, otherwise to the data area of the
    /// track type the inserted disc calls for, at 2048 bytes.
    pub fn change_datatype(
        &self,
        sector_part: Option<CdReadSecPart>,
        track_type: Option<CdTrackType>,
        sector_size: Option<i32>
    ) -> CdCmdResult {

        let mut firmware = self.lock_gate();

        let resolved_part;
        let resolved_type;
        let resolved_size;

        // Check if we are using default params.
        if sector_size == Some(2352) {
            resolved_type = track_type.unwrap_or(CdTrackType::Any);
            resolved_part = sector_part.unwrap_or(CdReadSecPart::WholeSector);
            resolved_size = 2352;
        } else {
            resolved_type = match track_type {
                Some(track_type) => track_type,
                None => {

                    // If not overriding track_type, check what the drive
                    // thinks we should use.
                    let mut check_params = CdCheckDriveParams::new();
                    firmware.check_drive(&mut check_params);

                    if check_params.disc_type == CdDiscType::CdromXa {
                        CdTrackType::Mode2Form1
                    } else {
                        CdTrackType::Mode1
                    }
                },
            };

            resolved_part = sector_part.unwrap_or(CdReadSecPart::DataArea);
            resolved_size = sector_size.unwrap_or(2048);
        }

        let mut params = CdSecModeParams {
            rw: 0,
            sector_part: resolved_part,
            track_type: resolved_type,
            sector_size: resolved_size,
        };

        if firmware.sector_mode(&mut params) == 0 {
            Ok(())
        } else {
            Err(DriveError::SystemError)
        }
    }

    /// Re-init the drive to its default settings, e.g. after a disc change.
    pub fn reinit(&self) -> CdCmdResult {
        self.reinit_ex(None, None, None)
    }

    /// Re-init the drive, then pass the requested sector datatype parameters
    /// on to `change_datatype`. A disc that was just swapped keeps reporting
    /// `DiscChanged` until it settles, so the INIT command is repeated without
    /// an upper bound until some other result comes back.
    pub fn reinit_ex(
        &self,
        sector_part: Option<CdReadSecPart>,
        track_type: Option<CdTrackType>,
        sector_size: Option<i32>
    ) -> CdCmdResult {

        let r = loop {
            let r = self.exec_cmd_timed(CdCmdCode::Init, &mut CdCmdParams::None, INIT_TIMEOUT_MILLIS);
            if r != Err(DriveError::DiscChanged) {
                break r;
            }
        };

        if let Err(DriveError::NoDisc | DriveError::SystemError | DriveError::Timeout) = r {
            return r;
        }

        self.change_datatype(sector_part, track_type, sector_size)
    }

    /// Read the table of contents from the given disc area into the supplied
    /// buffer.
    pub fn read_toc(&self, toc_buffer: &mut Toc, area: CdArea) -> CdCmdResult {

        let mut params = CdCmdParams::Toc {
            area,
            buffer: toc_buffer,
        };

        self.exec_cmd(CdCmdCode::GetToc2, &mut params)
    }

    /// Read one or more sectors in PIO mode, respecting the sector size set
    /// with `change_datatype`.
    pub fn read_sectors(&self, buffer: &mut [u8], sector: u32, cnt: usize) -> CdCmdResult {
        self.read_sectors_ex(buffer, sector, cnt, CdReadMode::Pio)
    }

    /// Enhanced sector reading: choose the mode to read in. The buffer must
    /// have space for `cnt` sectors at the configured size, and for DMA the
    /// transfer length must be a multiple of 32 bytes.
    pub fn read_sectors_ex(
        &self,
        buffer: &mut [u8],
        sector: u32,
        cnt: usize,
        mode: CdReadMode
    ) -> CdCmdResult {

        let mut params = CdCmdParams::Read {
            start_sec: sector,
            num_sec: cnt,
            buffer,
            is_test: false,
        };

        // The DMA mode blocks the thread it is called in by the way the
        // firmware commands are executed. It does however allow for other
        // threads to run.
        match mode {
            CdReadMode::Dma => self.exec_cmd(CdCmdCode::DmaRead, &mut params),
            CdReadMode::Pio => self.exec_cmd(CdCmdCode::PioRead, &mut params),
        }
    }

    /// Read a piece of or all of the subcode data of the last sector read.
    /// If the subcode from every sector is needed, sectors cannot be read
    /// more than one at a time.
    pub fn get_subcode(&self, buffer: &mut [u8], which: CdSubType) -> CdCmdResult {

        let buflen = buffer.len();
        let mut params = CdCmdParams::GetScd {
            which,
            buflen,
            buffer,
        };

        self.exec_cmd(CdCmdCode::GetScd, &mut params)
    }

    /// Play CDDA, from `start` to `end` as tracks or sectors depending on the
    /// mode. The repeat count saturates at 15 (which means infinite).
    pub fn cdda_play(&self, start: u32, end: u32, repeat: u32, mode: CddaMode) -> CdCmdResult {

        // Limit to 0-15.
        let repeat = min(repeat, 15);

        let mut params = CdCmdParams::Play {
            start,
            end,
            repeat,
        };

        match mode {
            CddaMode::Tracks => self.exec_cmd(CdCmdCode::Play, &mut params),
            CddaMode::Sectors => self.exec_cmd(CdCmdCode::Play2, &mut params),
        }
    }

    /// Pause CDDA audio playback.
    pub fn cdda_pause(&self) -> CdCmdResult {
        self.exec_cmd(CdCmdCode::Pause, &mut CdCmdParams::None)
    }

    /// Resume CDDA audio playback after a pause.
    pub fn cdda_resume(&self) -> CdCmdResult {
        self.exec_cmd(CdCmdCode::Release, &mut CdCmdParams::None)
    }

    /// Spin down the disc until it is next accessed.
    pub fn spin_down(&self) -> CdCmdResult {
        self.exec_cmd(CdCmdCode::Stop, &mut CdCmdParams::None)
    }

    /// Acquire the hardware access gate directly, blocking until it is free.
    /// This exists for work on the shared bus outside the command engine -
    /// another device hanging off the same bus, or poking a simulated
    /// firmware - and holds off all commands until the guard is dropped.
    pub fn lock_bus(&self) -> MutexGuard<'_, F> {
        self.lock_gate()
    }

    /// Locks the gate, recovering the guard if a peer panicked while holding
    /// it - a poisoned lock must not wedge the bus for good.
    fn lock_gate(&self) -> MutexGuard<'_, F> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
