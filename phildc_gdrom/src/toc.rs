// SPDX-License-Identifier: GPL-3.0
// toc.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use phildc_utility::TocEntryFields;

/// The number of raw track descriptors a TOC holds.
const TOC_TRACK_COUNT: usize = 99;

/// This struct models the table of contents returned by the GETTOC2 command.
/// Everything in it is in the packed 32-bit wire format, with addresses as
/// FAD rather than LBA/LSN; fields are decoded through the accessor trait in
/// `phildc_utility` rather than with inline masks. It is populated wholesale
/// by a single read and is an immutable snapshot from then on.
pub struct Toc {

    // TOC space for 99 tracks.
    pub entry: [u32; TOC_TRACK_COUNT],

    // Point A0 information (first track).
    pub first: u32,

    // Point A1 information (last track).
    pub last: u32,

    // Point A2 information (leadout).
    pub leadout_sector: u32,
}

/// Implementation functions for the TOC itself.
impl Toc {

    /// Creates a new zeroed TOC buffer, ready to be filled by a TOC read.
    pub fn new() -> Self {
        Toc {

            // Zero out the track descriptors.
            entry: [0; TOC_TRACK_COUNT],

            // Zero out the summary descriptors.
            first: 0,
            last: 0,
            leadout_sector: 0,
        }
    }

    /// This function searches the TOC for the last track with a CTRL value of
    /// 4, and returns its FAD address. Bootable discs put their data track at
    /// the highest track number, so the scan runs from the last track down to
    /// the first. Returns 0 if the summary descriptors are out of range or no
    /// data track exists - that is a "not found" sentinel, not a fault.
    pub fn locate_data_track(&self) -> u32 {

        let first = self.first.toc_track();
        let last = self.last.toc_track();

        if first < 1 || last > 99 || first > last {
            return 0;
        }

        // Find the last track which has a CTRL of 4.
        for i in (first..=last).rev() {
            if self.entry[(i - 1) as usize].toc_ctrl() == 4 {
                return self.entry[(i - 1) as usize].toc_lba();
            }
        }

        0
    }
}

#[cfg(test)]
mod tests;
