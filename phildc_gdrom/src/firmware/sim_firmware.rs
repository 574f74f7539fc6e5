// SPDX-License-Identifier: GPL-3.0
// sim_firmware.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

/// This module contains an implementation of the disc format itself, specific
/// to the primary SimFirmware implementation below.
mod sim_disc;

use log::debug;
use phildc_utility::min;

use sim_disc::SimDisc;

use crate::toc::Toc;

use super::{
    CdArea, CdAtaStatus, CdCheckDriveParams, CdCmdChk, CdCmdChkStatus, CdCmdCode, CdCmdParams,
    CdDiscType, CdReadSecPart, CdSecModeParams, CdStat, CdSubAudio, CdTrackType, CmdHandle,
    GdromSyscalls,
};

/// Number of processing steps a queued command takes before it goes terminal.
const CMD_PROCESS_STEPS: u32 = 2;

/// Number of INIT commands a freshly inserted disc fails with a disc-change
/// error before it settles.
const DISC_SETTLE_INITS: u32 = 2;

/// Size in bytes of a TOC transfer (102 packed descriptors).
const TOC_TRANSFER_BYTES: usize = 408;

/// Firmware error sub-code reported when no disc is inserted.
const ERR_NO_DISC: i32 = 2;

/// Firmware error sub-code reported while an inserted disc settles.
const ERR_DISC_CHANGED: i32 = 6;

/// Firmware error sub-code reported for requests the drive cannot serve.
const ERR_INVALID_REQUEST: i32 = 1;

/// This struct holds the terminal outcome scripted for the one in-flight
/// command, reported once its processing steps are used up.
struct InFlightCmd {

    // Identity of the command.
    handle: CmdHandle,

    // Steps of `exec_server` still needed before the outcome is reportable.
    steps_left: u32,

    // The terminal outcome, plus the detail block that goes with it.
    outcome: CdCmdChk,
    err1: i32,
    err2: i32,
    size: usize,
}

/// This struct is an in-memory firmware implementation, modelling the same
/// observable contract as the console's system-call vector: one command in
/// flight at a time, a processing-step countdown driven by `exec_server`, and
/// terminal outcomes that invalidate the handle once reported. The data phase
/// of each command runs at submission, while the caller's parameter block is
/// borrowed.
pub struct SimFirmware {

    // The inserted disc, if any.
    disc: Option<SimDisc>,

    // The single in-flight command.
    in_flight: Option<InFlightCmd>,

    // Monotonic handle source.
    next_handle: CmdHandle,

    // Sector mode storage, set and read back via `sector_mode`.
    sec_mode: CdSecModeParams,

    // Current drive status.
    drive_status: CdStat,

    // INIT commands left to fail while an inserted disc settles.
    settle_count: u32,

    // Whether `init` has run since the last `reset`.
    initialised: bool,
}

/// Implementation functions for the simulated firmware itself.
impl SimFirmware {

    /// Creates a new simulated firmware object with an empty drive.
    pub fn new() -> Self {
        SimFirmware {

            // No disc inserted yet.
            disc: None,

            // No command in flight, handles start from 1.
            in_flight: None,
            next_handle: 1,

            // Sector mode defaults match the drive's own power-on values.
            sec_mode: CdSecModeParams {
                rw: 0,
                sector_part: CdReadSecPart::DataArea,
                track_type: CdTrackType::Mode1,
                sector_size: 2048,
            },

            // Empty drive status.
            drive_status: CdStat::NoDisc,

            // Nothing to settle, firmware ready.
            settle_count: 0,
            initialised: true,
        }
    }

    /// Inserts a standard bootable CD-R layout (audio track 1, data track 2)
    /// backed by the given bytes. The disc then has to settle: the next few
    /// INIT commands report a disc change, the way real media does after a
    /// swap.
    pub fn insert_standard_cdr(&mut self, data: Vec<u8>) {
        self.disc = Some(SimDisc::standard_cdr(data));
        self.settle_count = DISC_SETTLE_INITS;
        self.drive_status = CdStat::Standby;
    }

    /// Removes the inserted disc.
    pub fn eject_disc(&mut self) {
        self.disc = None;
        self.settle_count = 0;
        self.drive_status = CdStat::NoDisc;
    }

    /// Runs the data phase of the INIT command.
    fn do_init(&mut self) -> (CdCmdChk, i32, usize) {

        if self.disc.is_none() {
            return (CdCmdChk::Failed, ERR_NO_DISC, 0);
        }

        if self.settle_count > 0 {
            self.settle_count -= 1;
            return (CdCmdChk::Failed, ERR_DISC_CHANGED, 0);
        }

        self.drive_status = CdStat::Paused;
        (CdCmdChk::Completed, 0, 0)
    }

    /// Runs the data phase of the GETTOC2 command. Only the low-density area
    /// is reachable here.
    fn do_read_toc(&mut self, area: CdArea, buffer: &mut Toc) -> (CdCmdChk, i32, usize) {

        let Some(disc) = self.disc.as_ref() else {
            return (CdCmdChk::Failed, ERR_NO_DISC, 0);
        };

        if area == CdArea::High {
            return (CdCmdChk::Failed, ERR_INVALID_REQUEST, 0);
        }

        disc.fill_toc(buffer);
        (CdCmdChk::Completed, 0, TOC_TRANSFER_BYTES)
    }

    /// Runs the data phase of the PIOREAD/DMAREAD commands, serving sectors
    /// at the negotiated size.
    fn do_read(&mut self, start_sec: u32, num_sec: usize, buffer: &mut [u8]) -> (CdCmdChk, i32, usize) {

        let Some(disc) = self.disc.as_ref() else {
            return (CdCmdChk::Failed, ERR_NO_DISC, 0);
        };

        let sector_size = self.sec_mode.sector_size as usize;
        let mut transferred = 0;

        for (i, chunk) in buffer.chunks_mut(sector_size).take(num_sec).enumerate() {
            disc.read_sector(start_sec + i as u32, chunk);
            transferred += chunk.len();
        }

        self.drive_status = CdStat::Paused;
        (CdCmdChk::Completed, 0, transferred)
    }

    /// Runs the data phase of the GETSCD command. Byte 1 of the response
    /// carries the CDDA audio status.
    fn do_get_subcode(&mut self, buflen: usize, buffer: &mut [u8]) -> (CdCmdChk, i32, usize) {

        if self.disc.is_none() {
            return (CdCmdChk::Failed, ERR_NO_DISC, 0);
        }

        buffer.fill(0);

        let audio_status = match self.drive_status {
            CdStat::Playing => CdSubAudio::Playing,
            CdStat::Paused => CdSubAudio::Paused,
            _ => CdSubAudio::NoInfo,
        };

        if buffer.len() >= 2 {
            buffer[1] = audio_status as u8;
        }

        (CdCmdChk::Completed, 0, min(buflen, buffer.len()))
    }

    /// Runs the data phase of the PLAY/PLAY2 commands.
    fn do_play(&mut self, start: u32, end: u32, repeat: u32) -> (CdCmdChk, i32, usize) {

        if self.disc.is_none() {
            return (CdCmdChk::Failed, ERR_NO_DISC, 0);
        }

        debug!("do_play: {start}-{end}, repeat {repeat}");

        self.drive_status = CdStat::Playing;
        (CdCmdChk::Completed, 0, 0)
    }
}

/// Implementation functions to be called from anything that understands what
/// a GdromSyscalls object is.
impl GdromSyscalls for SimFirmware {

    /// Queues a command, running its data phase up front while the caller's
    /// parameter block is borrowed; the outcome is then scripted across the
    /// following processing steps. A second submission while one command is
    /// in flight reports the transient zero handle.
    fn send_command(&mut self, cmd: CdCmdCode, params: &mut CdCmdParams<'_>) -> CmdHandle {

        if !self.initialised {
            return -1;
        }

        if self.in_flight.is_some() {
            return 0;
        }

        let handle = self.next_handle;
        self.next_handle += 1;

        debug!("send_command: {:?} queued as handle {}", cmd, handle);

        let (outcome, err1, size) = match (cmd, params) {
            (CdCmdCode::Init, _) => self.do_init(),
            (CdCmdCode::GetToc2, CdCmdParams::Toc { area, buffer }) => {
                self.do_read_toc(*area, buffer)
            },
            (
                CdCmdCode::PioRead | CdCmdCode::DmaRead,
                CdCmdParams::Read { start_sec, num_sec, buffer, .. },
            ) => self.do_read(*start_sec, *num_sec, buffer),
            (CdCmdCode::GetScd, CdCmdParams::GetScd { buflen, buffer, .. }) => {
                self.do_get_subcode(*buflen, buffer)
            },
            (
                CdCmdCode::Play | CdCmdCode::Play2,
                CdCmdParams::Play { start, end, repeat },
            ) => self.do_play(*start, *end, *repeat),
            (CdCmdCode::Pause, _) => {
                self.drive_status = CdStat::Paused;
                (CdCmdChk::Completed, 0, 0)
            },
            (CdCmdCode::Release, _) => {
                self.drive_status = CdStat::Playing;
                (CdCmdChk::Completed, 0, 0)
            },
            (CdCmdCode::Stop, _) => {
                self.drive_status = CdStat::Standby;
                (CdCmdChk::Completed, 0, 0)
            },
            _ => {
                debug!("send_command: no model for {:?}, completing as a no-op", cmd);
                (CdCmdChk::Completed, 0, 0)
            },
        };

        self.in_flight = Some(InFlightCmd {
            handle,
            steps_left: CMD_PROCESS_STEPS,
            outcome,
            err1,
            err2: 0,
            size,
        });

        handle
    }

    /// Burns one processing step off the in-flight command.
    fn exec_server(&mut self) {
        if let Some(in_flight) = self.in_flight.as_mut() {
            if in_flight.steps_left > 0 {
                in_flight.steps_left -= 1;
            }
        }
    }

    /// Reports the in-flight command's progress. Once the terminal outcome
    /// has been handed out, the handle stops resolving.
    fn check_command(&mut self, hnd: CmdHandle, status: &mut CdCmdChkStatus) -> CdCmdChk {

        if let Some(in_flight) = self.in_flight.take() {

            if in_flight.handle != hnd {
                self.in_flight = Some(in_flight);
                return CdCmdChk::NotFound;
            }

            if in_flight.steps_left > 0 {
                self.in_flight = Some(in_flight);
                return CdCmdChk::Processing;
            }

            status.err1 = in_flight.err1;
            status.err2 = in_flight.err2;
            status.size = in_flight.size;
            status.ata = CdAtaStatus::Internal;

            return in_flight.outcome;
        }

        CdCmdChk::NotFound
    }

    /// Drops the in-flight command if the handle matches it.
    fn abort_command(&mut self, hnd: CmdHandle) -> i32 {
        match self.in_flight {
            Some(ref in_flight) if in_flight.handle == hnd => {
                debug!("abort_command: dropping handle {}", hnd);
                self.in_flight = None;
                0
            },
            _ => -1,
        }
    }

    /// Reports the drive status and disc type.
    fn check_drive(&mut self, params: &mut CdCheckDriveParams) -> i32 {

        if !self.initialised {
            return -1;
        }

        params.status = self.drive_status;
        params.disc_type = match self.disc.as_ref() {
            Some(disc) => disc.disc_type(),
            None => CdDiscType::Cdda,
        };

        0
    }

    /// Stores or reads back the sector mode configuration.
    fn sector_mode(&mut self, params: &mut CdSecModeParams) -> i32 {

        if params.rw == 0 {
            self.sec_mode = *params;
        } else {
            params.sector_part = self.sec_mode.sector_part;
            params.track_type = self.sec_mode.track_type;
            params.sector_size = self.sec_mode.sector_size;
        }

        0
    }

    /// Drops all firmware state, leaving the drive unusable until `init`.
    fn reset(&mut self) {
        self.in_flight = None;
        self.initialised = false;
        self.drive_status = CdStat::Busy;
    }

    /// Brings the firmware back up after a reset.
    fn init(&mut self) {
        self.initialised = true;
        self.drive_status = match self.disc {
            Some(_) => CdStat::Standby,
            None => CdStat::NoDisc,
        };
    }
}
