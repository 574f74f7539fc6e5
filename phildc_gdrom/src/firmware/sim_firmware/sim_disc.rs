// SPDX-License-Identifier: GPL-3.0
// sim_disc.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use phildc_utility::min;

use crate::firmware::CdDiscType;
use crate::toc::Toc;

/// Bytes of user data per sector served from the data track.
const DATA_SECTOR_BYTES: usize = 2048;

/// FAD of the first audio track on a standard layout (two second pregap).
const AUDIO_TRACK_FAD: u32 = 150;

/// Sector count reserved for the audio track on a standard layout.
const AUDIO_TRACK_SECTORS: u32 = 11_252;

/// FAD of the data track on a standard bootable CD-R layout.
const DATA_TRACK_FAD: u32 = 11_702;

/// This struct models a disc in the simulated drive, and abstracts the track
/// layout away from the firmware itself. It can synthesize its own TOC in the
/// packed wire format and serve sector data out of a backing byte store.
pub struct SimDisc {

    // The type the drive reports for this disc.
    disc_type: CdDiscType,

    // This allows us to keep a list of tracks on the disc.
    track_list: Vec<SimTrack>,

    // FAD of the leadout area, directly after the final track.
    leadout_fad: u32,

    // Backing bytes for the data track.
    data: Vec<u8>,
}

/// This struct models a track on the disc.
pub struct SimTrack {

    // Track properties.
    number: u32,
    ctrl: u32,
    adr: u32,
    start_fad: u32,
    sector_count: u32,
}

/// Implementation functions for SimDisc.
impl SimDisc {

    /// Creates a disc with the standard layout of a bootable CD-R: one audio
    /// track followed by one data track in XA form, with the supplied bytes
    /// backing the data track.
    pub fn standard_cdr(data: Vec<u8>) -> Self {

        let data_sectors = data.len().div_ceil(DATA_SECTOR_BYTES).max(1) as u32;

        SimDisc {

            // Standard CD-Rs for the console report as CD-ROM XA.
            disc_type: CdDiscType::CdromXa,

            // One audio track, then the data track marked with CTRL 4.
            track_list: vec![
                SimTrack {
                    number: 1,
                    ctrl: 0,
                    adr: 1,
                    start_fad: AUDIO_TRACK_FAD,
                    sector_count: AUDIO_TRACK_SECTORS,
                },
                SimTrack {
                    number: 2,
                    ctrl: 4,
                    adr: 1,
                    start_fad: DATA_TRACK_FAD,
                    sector_count: data_sectors,
                },
            ],

            // Leadout sits directly after the data track.
            leadout_fad: DATA_TRACK_FAD + data_sectors,

            // Store the data track bytes.
            data,
        }
    }

    /// Returns the type the drive reports for this disc.
    pub fn disc_type(&self) -> CdDiscType {
        self.disc_type
    }

    /// Synthesizes the TOC for this disc into the supplied buffer, in the
    /// packed wire format. Unused entries are filled with all-ones, the way
    /// the firmware reports them.
    pub fn fill_toc(&self, toc: &mut Toc) {

        // Mark every descriptor slot unused first.
        toc.entry = [0xFFFFFFFF; 99];

        for track in &self.track_list {
            toc.entry[(track.number - 1) as usize] =
                pack_entry(track.ctrl, track.adr, track.start_fad);
        }

        // Summary descriptors carry the track number where entries carry the
        // address.
        let first = &self.track_list[0];
        let last = &self.track_list[self.track_list.len() - 1];

        toc.first = pack_summary(first.ctrl, first.adr, first.number);
        toc.last = pack_summary(last.ctrl, last.adr, last.number);
        toc.leadout_sector = pack_entry(last.ctrl, last.adr, self.leadout_fad);
    }

    /// Serves one sector at the given FAD into the supplied chunk. Data track
    /// sectors come from the backing store with the user data at the front of
    /// the chunk and any remainder zeroed; audio and out-of-range sectors
    /// read as silence.
    pub fn read_sector(&self, fad: u32, chunk: &mut [u8]) {

        chunk.fill(0);

        let data_track = self
            .track_list
            .iter()
            .find(|track| track.ctrl == 4 && track.contains(fad));

        if let Some(track) = data_track {
            let offset = (fad - track.start_fad) as usize * DATA_SECTOR_BYTES;

            if offset < self.data.len() {
                let wanted = min(chunk.len(), DATA_SECTOR_BYTES);
                let have = min(wanted, self.data.len() - offset);
                chunk[..have].copy_from_slice(&self.data[offset..offset + have]);
            }
        }
    }
}

/// Implementation functions for SimTrack.
impl SimTrack {

    /// Whether the given FAD falls within this track.
    fn contains(&self, fad: u32) -> bool {
        fad >= self.start_fad && fad < self.start_fad + self.sector_count
    }
}

/// Packs a raw TOC entry out of its fields.
fn pack_entry(ctrl: u32, adr: u32, fad: u32) -> u32 {
    (ctrl << 28) | (adr << 24) | (fad & 0x00FFFFFF)
}

/// Packs a summary (first/last) descriptor for the given track number.
fn pack_summary(ctrl: u32, adr: u32, track: u32) -> u32 {
    (ctrl << 28) | (adr << 24) | (track << 16)
}
