// SPDX-License-Identifier: GPL-3.0
// main.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

// This file is the core of the basic client - it exists merely as a CLI-based
// program to drive the GD-ROM driver stack over the simulated firmware: bring
// the drive up, walk the TOC, read from the data track and poke the CDDA
// transport. In due course a real system-call backed firmware can slot in
// underneath unchanged.

use clap::Parser;
use log::{error, info};
use phildc_gdrom::drive::gd_drive::GdromDrive;
use phildc_gdrom::drive::CddaMode;
use phildc_gdrom::firmware::sim_firmware::SimFirmware;
use phildc_gdrom::firmware::{CdArea, CdSubType};
use phildc_gdrom::host::std_host::StdHost;
use phildc_gdrom::toc::Toc;
use phildc_utility::TocEntryFields;

#[derive(Parser)]
#[command(
    version,
    about = "A basic barebones CLI for the PhilDC GD-ROM driver",
    long_about = None
)]
struct PhilDcArgs {
    #[arg(
        long = "image",
        help = "An optional raw 2048-byte-sector image backing the data track",
        id = "Image file"
    )]
    image: Option<OsString>,

    #[arg(
        long = "sectors",
        help = "How many data sectors to read and dump",
        default_value_t = 2,
        id = "Sector count"
    )]
    sectors: usize,
}

fn main() -> ExitCode {
    colog::init();

    let phildc_args = PhilDcArgs::parse();

    // Back the simulated data track with the supplied image, or with a
    // recognisable fill pattern when none is given.
    let data = match &phildc_args.image {
        Some(path) => match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("could not read the image file: {e}");
                return ExitCode::FAILURE;
            },
        },
        None => (0..4 * 2048_u32).map(|i| (i % 251) as u8).collect(),
    };

    let mut firmware = SimFirmware::new();
    firmware.insert_standard_cdr(data);

    let drive = GdromDrive::new(firmware, StdHost::new());

    // Bring the drive up; this rides out the disc settling internally.
    if let Err(e) = drive.init() {
        error!("drive init failed: {e}");
        return ExitCode::FAILURE;
    }

    match drive.get_status() {
        Ok(status) => info!(
            "drive status: {:?}, disc type: {:?}",
            status.status, status.disc_type
        ),
        Err(e) => {
            error!("status query failed: {e}");
            return ExitCode::FAILURE;
        },
    }

    // Walk the TOC.
    let mut toc = Toc::new();
    if let Err(e) = drive.read_toc(&mut toc, CdArea::Low) {
        error!("TOC read failed: {e}");
        return ExitCode::FAILURE;
    }

    let first = toc.first.toc_track();
    let last = toc.last.toc_track();

    for number in first..=last {
        let entry = toc.entry[(number - 1) as usize];
        info!(
            "track {}: fad {}, ctrl {}, adr {}",
            number,
            entry.toc_lba(),
            entry.toc_ctrl(),
            entry.toc_adr()
        );
    }

    let data_fad = toc.locate_data_track();
    if data_fad == 0 {
        error!("no data track on this disc");
        return ExitCode::FAILURE;
    }

    info!("data track starts at fad {data_fad}");

    // Read from the start of the data track at the default 2048-byte size and
    // dump the head of each sector.
    let mut buffer = vec![0_u8; phildc_args.sectors * 2048];
    if let Err(e) = drive.read_sectors(&mut buffer, data_fad, phildc_args.sectors) {
        error!("sector read failed: {e}");
        return ExitCode::FAILURE;
    }

    for (i, sector) in buffer.chunks(2048).enumerate() {
        let head: Vec<String> = sector[..16].iter().map(|byte| format!("{byte:02x}")).collect();
        info!("sector {}: {} ...", data_fad as usize + i, head.join(" "));
    }

    // Poke the CDDA transport and show the subcode audio status reacting.
    let mut subcode = [0_u8; 16];

    if let Err(e) = drive.cdda_play(1, 1, 0, CddaMode::Tracks) {
        error!("CDDA play failed: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = drive.get_subcode(&mut subcode, CdSubType::QChannel) {
        error!("subcode read failed: {e}");
        return ExitCode::FAILURE;
    }

    info!("audio status byte while playing: 0x{:02x}", subcode[1]);

    if let Err(e) = drive.cdda_pause() {
        error!("CDDA pause failed: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = drive.spin_down() {
        error!("spin down failed: {e}");
        return ExitCode::FAILURE;
    }

    info!("drive spun down, all done");

    ExitCode::SUCCESS
}
