// SPDX-License-Identifier: GPL-3.0
// tests.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::Toc;

// Tests for the TOC model and the data track locator.

/// Packs a raw TOC entry out of its fields, the way the firmware lays it out.
fn pack_entry(ctrl: u32, adr: u32, fad: u32) -> u32 {
    (ctrl << 28) | (adr << 24) | (fad & 0x00FFFFFF)
}

/// Packs a summary (first/last) descriptor for the given track number.
fn pack_summary(ctrl: u32, adr: u32, track: u32) -> u32 {
    (ctrl << 28) | (adr << 24) | (track << 16)
}

#[test]
fn locate_data_track_should_prefer_the_highest_numbered_data_track() {

    let mut toc = Toc::new();

    // Given tracks 1 to 3, where tracks 2 and 3 both carry CTRL == 4,
    toc.first = pack_summary(0, 1, 1);
    toc.last = pack_summary(4, 1, 3);
    toc.entry[0] = pack_entry(0, 1, 150);
    toc.entry[1] = pack_entry(4, 1, 5000);
    toc.entry[2] = pack_entry(4, 1, 9000);

    // the locator should return track 3's address.
    assert_eq!(toc.locate_data_track(), 9000);
}

#[test]
fn locate_data_track_should_skip_audio_tracks_above_the_data_track() {

    let mut toc = Toc::new();

    // Given an audio track above the only data track,
    toc.first = pack_summary(0, 1, 1);
    toc.last = pack_summary(0, 1, 3);
    toc.entry[0] = pack_entry(0, 1, 150);
    toc.entry[1] = pack_entry(4, 1, 5000);
    toc.entry[2] = pack_entry(0, 1, 9000);

    // the locator should return the data track's address.
    assert_eq!(toc.locate_data_track(), 5000);
}

#[test]
fn locate_data_track_should_return_zero_when_no_data_track_exists() {

    let mut toc = Toc::new();

    // Given only audio tracks,
    toc.first = pack_summary(0, 1, 1);
    toc.last = pack_summary(0, 1, 2);
    toc.entry[0] = pack_entry(0, 1, 150);
    toc.entry[1] = pack_entry(0, 1, 5000);

    // the locator should report nothing found.
    assert_eq!(toc.locate_data_track(), 0);
}

#[test]
fn locate_data_track_should_return_zero_when_first_track_is_below_one() {

    let mut toc = Toc::new();

    // Given a first track of 0, the TOC is malformed for this purpose,
    toc.first = pack_summary(0, 1, 0);
    toc.last = pack_summary(0, 1, 2);
    toc.entry[0] = pack_entry(4, 1, 150);
    toc.entry[1] = pack_entry(4, 1, 5000);

    // so the locator should report nothing found regardless of the entries.
    assert_eq!(toc.locate_data_track(), 0);
}

#[test]
fn locate_data_track_should_return_zero_when_last_track_is_above_99() {

    let mut toc = Toc::new();

    // Given a last track of 100,
    toc.first = pack_summary(0, 1, 1);
    toc.last = pack_summary(0, 1, 100);
    toc.entry[0] = pack_entry(4, 1, 150);

    // the locator should report nothing found regardless of the entries.
    assert_eq!(toc.locate_data_track(), 0);
}

#[test]
fn locate_data_track_should_return_zero_when_first_exceeds_last() {

    let mut toc = Toc::new();

    // Given first > last,
    toc.first = pack_summary(0, 1, 3);
    toc.last = pack_summary(0, 1, 2);
    toc.entry[0] = pack_entry(4, 1, 150);
    toc.entry[1] = pack_entry(4, 1, 5000);
    toc.entry[2] = pack_entry(4, 1, 9000);

    // the locator should report nothing found regardless of the entries.
    assert_eq!(toc.locate_data_track(), 0);
}

#[test]
fn locate_data_track_should_handle_a_single_track_disc() {

    let mut toc = Toc::new();

    // Given a lone data track,
    toc.first = pack_summary(4, 1, 1);
    toc.last = pack_summary(4, 1, 1);
    toc.entry[0] = pack_entry(4, 1, 150);

    // the locator should return its address.
    assert_eq!(toc.locate_data_track(), 150);
}
