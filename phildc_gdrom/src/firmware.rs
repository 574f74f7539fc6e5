// SPDX-License-Identifier: GPL-3.0
// firmware.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use crate::toc::Toc;

/// This module contains the default simulated firmware implementation. There
/// may be others in future (a real system-call-vector backed one, for example).
pub mod sim_firmware;

/// Handle for a requested command. It is returned by `send_command` and is
/// passed to the other primitives to specify which command to act on. Zero or
/// a negative value is never a valid handle.
pub type CmdHandle = i32;

/// This enum represents the command codes understood by the GD-ROM firmware.
/// Integer codes are part of the wire contract and are listed explicitly.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdCmdCode {
    CheckLicense = 2,
    ReqSpiCmd = 4,
    PioRead = 16,
    DmaRead = 17,
    GetToc = 18,
    GetToc2 = 19,
    Play = 20,
    Play2 = 21,
    Pause = 22,
    Release = 23,
    Init = 24,
    DmaAbort = 25,
    OpenTray = 26,
    Seek = 27,
    DmaReadStream = 28,
    Nop = 29,
    ReqMode = 30,
    SetMode = 31,
    ScanCd = 32,
    Stop = 33,
    GetScd = 34,
    GetSes = 35,
    ReqStat = 36,
    PioReadStream = 37,
    DmaReadStreamEx = 38,
    PioReadStreamEx = 39,
    GetVers = 40,
}

/// This enum represents the possible results of checking on a submitted
/// command. `Processing` and `Busy` are the only non-terminal values.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdCmdChk {
    Failed = -1,
    NotFound = 0,
    Processing = 1,
    Completed = 2,
    Streaming = 3,
    Busy = 4,
}

/// This enum represents the ATA statuses reported in the fourth field of
/// `CdCmdChkStatus`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdAtaStatus {
    Internal = 0x00,
    Irq = 0x01,
    Drq0 = 0x02,
    Drq1 = 0x03,
    Busy = 0x04,
}

/// This struct is filled in by `check_command`, and supplements its return
/// value with more detail on why a command failed or has not yet finished.
#[derive(Copy, Clone, Debug)]
pub struct CdCmdChkStatus {

    // Firmware error sub-codes.
    pub err1: i32,
    pub err2: i32,

    // Transferred size in bytes.
    pub size: usize,

    // ATA status of the bus.
    pub ata: CdAtaStatus,
}

/// Implementation functions for the check status block itself.
impl CdCmdChkStatus {

    /// Creates a new check status block with the correct (zeroed) initial state.
    pub fn new() -> Self {
        CdCmdChkStatus {
            err1: 0,
            err2: 0,
            size: 0,
            ata: CdAtaStatus::Internal,
        }
    }
}

/// This enum represents the status of the drive itself, as reported in the
/// first field of `CdCheckDriveParams`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdStat {
    ReadFail = -1,
    Busy = 0,
    Paused = 1,
    Standby = 2,
    Playing = 3,
    Seeking = 4,
    Scanning = 5,
    Open = 6,
    NoDisc = 7,
    Retry = 8,
    Error = 9,
    Fatal = 12,
}

/// This enum represents the disc types the drive can identify, as reported in
/// the second field of `CdCheckDriveParams`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdDiscType {
    Cdda = 0x00,
    Cdrom = 0x10,
    CdromXa = 0x20,
    Cdi = 0x30,
    Gdrom = 0x80,
    Fail = 0xF0,
}

/// This struct is filled in by the `check_drive` primitive.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CdCheckDriveParams {
    pub status: CdStat,
    pub disc_type: CdDiscType,
}

/// Implementation functions for the check drive block itself.
impl CdCheckDriveParams {

    /// Creates a new check drive block with the correct initial state.
    pub fn new() -> Self {
        CdCheckDriveParams {
            status: CdStat::Busy,
            disc_type: CdDiscType::Cdda,
        }
    }
}

/// This enum represents the disc area a TOC read applies to.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdArea {
    Low = 0,
    High = 1,
}

/// This enum represents the types of data which can be requested from the
/// sector subcode via the GETSCD command.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdSubType {
    QAll = 0,
    QChannel = 1,
    MediaCatalog = 2,
    TrackIsrc = 3,
    Reserved = 4,
}

/// This enum represents the CDDA playback statuses reported in the second
/// byte of a GETSCD response buffer.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdSubAudio {
    Invalid = 0x00,
    Playing = 0x11,
    Paused = 0x12,
    Ended = 0x13,
    Error = 0x14,
    NoInfo = 0x15,
}

/// This enum represents how much of each sector the drive should return.
/// The values are the raw wire codes sent with the sector mode block.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdReadSecPart {
    WholeSector = 0x1000,
    DataArea = 0x2000,
}

/// This enum represents the track type a sector is read as (if applicable).
/// The values are the raw wire codes sent with the sector mode block.
#[derive(Copy, Clone, PartialEq, Debug)]
#[repr(i32)]
pub enum CdTrackType {
    Any = 0x0000,
    Cdda = 0x0200,
    Mode1 = 0x0400,
    Mode2 = 0x0600,
    Mode2Form1 = 0x0800,
    Mode2Form2 = 0x0A00,
    Mode2NonXa = 0x0C00,
    Unknown = 0x0E00,
}

/// This struct is the parameter block sent to the `sector_mode` primitive.
#[derive(Copy, Clone, Debug)]
pub struct CdSecModeParams {

    // 0 = set, 1 = get.
    pub rw: u32,

    // Get data area or full sector.
    pub sector_part: CdReadSecPart,

    // CD-XA mode 1/2.
    pub track_type: CdTrackType,

    // Sector size in bytes.
    pub sector_size: i32,
}

/// This enum carries the command-specific parameter block handed to
/// `send_command`. The command execution engine treats it as opaque; only the
/// firmware interprets the variant contents. Buffer borrows are live for the
/// duration of the `send_command` call, during which the firmware must capture
/// everything it needs for the data phase.
pub enum CdCmdParams<'a> {

    /// No parameter block (INIT, PAUSE, RELEASE, STOP).
    None,

    /// Parameter block for the GETTOC2 command.
    Toc {
        area: CdArea,
        buffer: &'a mut Toc,
    },

    /// Parameter block for the PIOREAD and DMAREAD commands.
    Read {
        start_sec: u32,
        num_sec: usize,
        buffer: &'a mut [u8],
        is_test: bool,
    },

    /// Parameter block for the GETSCD command.
    GetScd {
        which: CdSubType,
        buflen: usize,
        buffer: &'a mut [u8],
    },

    /// Parameter block for the PLAY and PLAY2 commands.
    Play {
        start: u32,
        end: u32,
        repeat: u32,
    },
}

/// This trait provides an implementation-opaque way of calling the GD-ROM
/// firmware primitives from elsewhere in the system. The real console exposes
/// these through a system-call vector; the simulated implementation models the
/// same observable contract in memory. All of them must be driven under the
/// hardware access gate, as the underlying bus is a single shared resource.
pub trait GdromSyscalls {

    /// Implementations must attempt to queue the given command, returning a
    /// positive handle on success, zero if the command could not be queued
    /// just now (the caller may retry), or a negative value on failure.
    fn send_command(&mut self, cmd: CdCmdCode, params: &mut CdCmdParams<'_>) -> CmdHandle;

    /// Implementations must advance internal command processing by one step.
    /// This must be called repeatedly for queued commands to make progress.
    fn exec_server(&mut self);

    /// Implementations must report the outcome of the command identified by
    /// the given handle, filling in the supplied status block with error
    /// sub-codes and transfer details where relevant. Once a terminal outcome
    /// has been reported, the handle is no longer valid.
    fn check_command(&mut self, hnd: CmdHandle, status: &mut CdCmdChkStatus) -> CdCmdChk;

    /// Implementations must abort the in-flight command identified by the
    /// given handle, returning zero on success and a negative value otherwise.
    fn abort_command(&mut self, hnd: CmdHandle) -> i32;

    /// Implementations must report the current drive status and disc type in
    /// the supplied block. A return value equal to `CdCmdChk::Busy as i32`
    /// means the answer is not ready yet and the caller should poll again; a
    /// negative return value means the status could not be read at all.
    fn check_drive(&mut self, params: &mut CdCheckDriveParams) -> i32;

    /// Implementations must set (rw = 0) or get (rw = 1) the sector mode
    /// configuration from the supplied block, returning zero on success.
    fn sector_mode(&mut self, params: &mut CdSecModeParams) -> i32;

    /// Implementations must reset the firmware state. Board-specific drive
    /// reactivation (the BIOS verification scan on real hardware) also
    /// belongs behind this call.
    fn reset(&mut self);

    /// Implementations must initialise the firmware, after which commands may
    /// be queued.
    fn init(&mut self);
}
