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

//! Read response decoding.
//!
//! A read response is an xmcd database entry: a block of `#` comment lines
//! followed by `KEY=VALUE` lines, for example:
//!
//! ```text
//! 210 data a70d5289 CD database entry follows (until terminating `.')
//! # xmcd
//! #
//! DISCID=a70d520d
//! DTITLE=Xavier Rudd / Storm Boy
//! DYEAR=2018
//! DGENRE=Pop-Folk
//! TTITLE0=Walk Away
//! TTITLE1=Keep It Simple
//! EXTD=
//! EXTT0=
//! EXTT1=
//! PLAYORDER=
//! .
//! ```
//!
//! Servers routinely leave optional keys out, so a missing key is never an
//! error. It simply resolves to an empty string or zero.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use crate::{
    cddb::{DiscTableOfContents, compile_pattern, lines::split_response_lines},
    model::{AlbumMetadata, TrackMetadata},
};

/// A `KEY=VALUE` line. Keys are upper case letters and digits.
pub(crate) const KEY_VALUE_PATTERN: &str = r"^([A-Z0-9]+)=(.*)";

/// A status line that echoes the category, e.g. `210 rock 0b0c0d0e ...`.
pub(crate) const CATEGORY_ECHO_PATTERN: &str = r"^[0-9]+ ([a-z]+) .*";

/// A combined `DTITLE` value holding both artist and title.
pub(crate) const ARTIST_TITLE_PATTERN: &str = r"^([^/]+) / (.*)$";

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| compile_pattern(KEY_VALUE_PATTERN));
static CATEGORY_ECHO: LazyLock<Regex> = LazyLock::new(|| compile_pattern(CATEGORY_ECHO_PATTERN));
static ARTIST_TITLE: LazyLock<Regex> = LazyLock::new(|| compile_pattern(ARTIST_TITLE_PATTERN));

const CATEGORY_KEY: &str = "CATEGORY";

/// Decodes a read response into album metadata with `track_count` tracks.
///
/// Track durations are left at zero. They come from the disc itself, see
/// [`parse_read_for_disc`].
///
/// When a key appears more than once the last value wins.
pub(crate) fn parse_read(read_text: &str, track_count: usize) -> AlbumMetadata {
    let entry = collect_entries(read_text);
    let value = |key: &str| entry.get(key).copied().unwrap_or_default().to_string();

    let year = entry
        .get("DYEAR")
        .and_then(|year| year.trim().parse().ok())
        .unwrap_or(0);

    let (artist, title) = split_artist_title(entry.get("DTITLE").copied().unwrap_or_default());
    log::debug!("Artist is '{}' and title is '{}'", artist, title);

    let tracks = (0..track_count)
        .map(|i| TrackMetadata {
            title: value(&format!("TTITLE{}", i)),
            extra_info: value(&format!("EXTT{}", i)),
            duration_seconds: 0,
        })
        .collect();

    AlbumMetadata {
        artist,
        title,
        category: value(CATEGORY_KEY),
        genre: value("DGENRE"),
        extra_info: value("EXTD"),
        year,
        tracks,
    }
}

/// Decodes a read response for the disc described by `toc`, filling in the
/// track durations measured from the disc.
pub(crate) fn parse_read_for_disc(read_text: &str, toc: &DiscTableOfContents) -> AlbumMetadata {
    let mut album = parse_read(read_text, toc.track_count());
    for (track, duration) in album.tracks.iter_mut().zip(toc.track_durations()) {
        track.duration_seconds = duration;
    }
    album
}

fn collect_entries(read_text: &str) -> HashMap<&str, &str> {
    let mut entry = HashMap::new();

    for line in split_response_lines(read_text) {
        if let Some(captures) = KEY_VALUE.captures(line) {
            if let (Some(key), Some(value)) = (captures.get(1), captures.get(2)) {
                entry.insert(key.as_str(), value.as_str());
            }
        } else if let Some(category) = CATEGORY_ECHO.captures(line).and_then(|c| c.get(1)) {
            entry.insert(CATEGORY_KEY, category.as_str());
        } else {
            log::trace!("Ignoring line: {}", line);
        }
    }

    entry
}

/// Splits `Artist / Title`. A self-titled album may have no title part, in
/// which case both halves are the whole value.
fn split_artist_title(dtitle: &str) -> (String, String) {
    match ARTIST_TITLE.captures(dtitle) {
        Some(captures) => (
            captures[1].trim().to_string(),
            captures[2].to_string(),
        ),
        None => (dtitle.to_string(), dtitle.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cddb::compute_fingerprint;

    const STORM_BOY: &str = "210 data a70d5289 CD database entry follows (until terminating `.')
# xmcd
#
# Track frame offsets:
#        150
#        17810
#
# Disc length: 3412 seconds
#
DISCID=a70d520d
DTITLE=Xavier Rudd / Storm Boy
DYEAR=2018
DGENRE=Pop-Folk
TTITLE0=Walk Away
TTITLE1=Keep It Simple
EXTD=
EXTT0=
EXTT1=Single edit
PLAYORDER=
.
";

    #[test]
    fn decodes_album_entry() {
        let album = parse_read(STORM_BOY, 2);

        assert_eq!(album.artist, "Xavier Rudd");
        assert_eq!(album.title, "Storm Boy");
        assert_eq!(album.category, "data");
        assert_eq!(album.genre, "Pop-Folk");
        assert_eq!(album.year, 2018);
        assert_eq!(album.extra_info, "");
        assert_eq!(album.tracks.len(), 2);
        assert_eq!(album.tracks[0].title, "Walk Away");
        assert_eq!(album.tracks[0].extra_info, "");
        assert_eq!(album.tracks[1].title, "Keep It Simple");
        assert_eq!(album.tracks[1].extra_info, "Single edit");
    }

    #[test]
    fn attaches_disc_durations() {
        let toc = compute_fingerprint("a70d520d 2 150 17810 3412").unwrap();
        let album = parse_read_for_disc(STORM_BOY, &toc);

        assert_eq!(album.tracks[0].duration_seconds, 235);
        assert_eq!(album.tracks[1].duration_seconds, 3175);
        assert_eq!(album.tracks[1].title, "Keep It Simple");
    }

    #[test]
    fn track_list_follows_requested_count() {
        let album = parse_read(STORM_BOY, 4);
        assert_eq!(album.tracks.len(), 4);
        assert_eq!(album.tracks[2], TrackMetadata::default());
        assert_eq!(album.tracks[3].title, "");

        let album = parse_read(STORM_BOY, 1);
        assert_eq!(album.tracks.len(), 1);
    }

    #[test]
    fn self_titled_album() {
        let album = parse_read("DTITLE=Radiohead\n.\n", 0);
        assert_eq!(album.artist, "Radiohead");
        assert_eq!(album.title, "Radiohead");
    }

    #[test]
    fn artist_is_trimmed() {
        let album = parse_read("DTITLE=  The Band   / Music From Big Pink\n", 0);
        assert_eq!(album.artist, "The Band");
        assert_eq!(album.title, "Music From Big Pink");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let album = parse_read("# nothing useful here\n.\n", 1);
        assert_eq!(album.artist, "");
        assert_eq!(album.title, "");
        assert_eq!(album.category, "");
        assert_eq!(album.genre, "");
        assert_eq!(album.year, 0);
        assert_eq!(album.tracks, vec![TrackMetadata::default()]);
    }

    #[test]
    fn unparsable_year_is_zero() {
        assert_eq!(parse_read("DYEAR=\n", 0).year, 0);
        assert_eq!(parse_read("DYEAR=circa 1970\n", 0).year, 0);
        assert_eq!(parse_read("DYEAR= 1999 \n", 0).year, 1999);
    }

    #[test]
    fn last_duplicate_key_wins() {
        let album = parse_read("DGENRE=Rock\nDGENRE=Jazz\n", 0);
        assert_eq!(album.genre, "Jazz");
    }

    #[test]
    fn content_after_terminator_is_ignored() {
        let album = parse_read("DGENRE=Rock\n.\nDGENRE=Jazz\n", 0);
        assert_eq!(album.genre, "Rock");
    }

    #[test]
    fn unknown_category_is_passed_through() {
        let album = parse_read("210 electronica 0b0c0d0e entry follows\n.\n", 0);
        assert_eq!(album.category, "electronica");
    }

    #[test]
    fn values_keep_equals_signs() {
        let album = parse_read("TTITLE0=E=mc2\n", 1);
        assert_eq!(album.tracks[0].title, "E=mc2");
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_read(STORM_BOY, 2), parse_read(STORM_BOY, 2));
    }
}
