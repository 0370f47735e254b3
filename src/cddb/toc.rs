// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Disc fingerprinting.
//!
//! The disc-ID tool prints a single line for the disc in the drive, for
//! example:
//!
//! ```text
//! a70d520d 13 150 17810 40193 58124 74930 92012 115019 135982 150866 169655 183316 196229 230599 3412
//! ```
//!
//! The tokens are the fingerprint, the number of tracks, one starting frame
//! offset per track and finally the length of the whole disc in seconds (not
//! frames).

use serde::Serialize;

use crate::cddb::{CddbError, FRAMES_PER_SECOND};

/// Text the disc-ID tool prints when the drive is empty.
pub(crate) const NO_MEDIUM_MARKER: &str = "No medium found";

/// A Red Book audio CD holds at most 99 tracks.
pub(crate) const MAX_TRACKS: u32 = 99;

/// The table of contents of a physical disc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DiscTableOfContents {
    /// Hex identifier as reported by the disc-ID tool.
    pub(crate) fingerprint: String,
    /// Starting frame of each track, strictly increasing.
    pub(crate) frame_offsets: Vec<u32>,
    /// Length of the whole disc in seconds.
    pub(crate) total_length_seconds: u32,
    /// The trimmed tool output, forwarded verbatim in query requests.
    #[serde(skip)]
    pub(crate) raw: String,
}

impl DiscTableOfContents {
    pub(crate) fn track_count(&self) -> usize {
        self.frame_offsets.len()
    }

    /// The frame one past the end of the last track.
    pub(crate) fn lead_out_frame(&self) -> u32 {
        self.total_length_seconds.saturating_mul(FRAMES_PER_SECOND)
    }

    /// Computes the length of every track in whole seconds.
    ///
    /// Each duration is the distance to the next track start (or to the
    /// lead-out for the last track), divided by the frame rate and rounded
    /// half away from zero. Frame distances are integers and the frame rate
    /// is odd, so an exact `.5` never actually occurs.
    pub(crate) fn track_durations(&self) -> Vec<u32> {
        let lead_out = self.lead_out_frame();

        self.frame_offsets
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = self.frame_offsets.get(i + 1).copied().unwrap_or(lead_out);
                frames_to_seconds(end - start)
            })
            .collect()
    }
}

fn frames_to_seconds(frames: u32) -> u32 {
    (f64::from(frames) / f64::from(FRAMES_PER_SECOND)).round() as u32
}

/// Parses the output of the disc-ID tool.
///
/// # Errors
///
/// * [`CddbError::NoDisc`] if the text contains the "No medium found"
///   marker, whatever else surrounds it.
/// * [`CddbError::MalformedToc`] if any token is missing or not a number, if
///   there are surplus tokens, if the track count is zero, if the offsets do
///   not strictly increase or if the disc length does not extend past the
///   last track start.
pub(crate) fn compute_fingerprint(toc_text: &str) -> Result<DiscTableOfContents, CddbError> {
    if toc_text.contains(NO_MEDIUM_MARKER) {
        return Err(CddbError::NoDisc);
    }

    let mut tokens = toc_text.split_whitespace();

    let fingerprint = tokens
        .next()
        .ok_or_else(|| malformed("missing disc fingerprint"))?;
    if !fingerprint.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed(format!("fingerprint '{}' is not hexadecimal", fingerprint)));
    }

    let track_count = next_number(&mut tokens, "track count")?;
    if track_count == 0 {
        return Err(malformed("disc has no tracks"));
    }
    if track_count > MAX_TRACKS {
        return Err(malformed(format!(
            "track count {} exceeds the maximum of {}",
            track_count, MAX_TRACKS
        )));
    }

    let mut frame_offsets = Vec::with_capacity(track_count as usize);
    for i in 0..track_count {
        let offset = next_number(&mut tokens, &format!("offset of track {}", i + 1))?;
        if frame_offsets.last().is_some_and(|&previous| offset <= previous) {
            return Err(malformed(format!("offset of track {} does not increase", i + 1)));
        }
        frame_offsets.push(offset);
    }

    let total_length_seconds = next_number(&mut tokens, "disc length")?;

    if let Some(extra) = tokens.next() {
        return Err(malformed(format!("unexpected trailing token '{}'", extra)));
    }

    let toc = DiscTableOfContents {
        fingerprint: fingerprint.to_string(),
        frame_offsets,
        total_length_seconds,
        raw: toc_text.trim().to_string(),
    };

    let last_offset = toc.frame_offsets.last().copied().unwrap_or_default();
    if toc.lead_out_frame() <= last_offset {
        return Err(malformed(format!(
            "disc length of {}s ends before the last track starts",
            total_length_seconds
        )));
    }

    log::debug!(
        "Disc {} has {} tracks, {}s in total",
        toc.fingerprint,
        toc.track_count(),
        toc.total_length_seconds
    );

    Ok(toc)
}

fn next_number<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<u32, CddbError> {
    let token = tokens
        .next()
        .ok_or_else(|| malformed(format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| malformed(format!("{} '{}' is not a number", what, token)))
}

fn malformed(message: impl Into<String>) -> CddbError {
    CddbError::MalformedToc(message.into())
}
