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

//! Plain text rendering.
//!
//! Listings are written to any [`Write`] so the same code serves the
//! terminal and the tests.

use std::io::{self, Write};

use crate::{
    cddb::DiscTableOfContents,
    model::AlbumMetadata,
    session::DiscImport,
    util::format::{format_time, readable_length},
};

pub(crate) trait Render {
    fn render(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// An album together with the disc length reported by the TOC.
pub(crate) struct AlbumListing<'a> {
    pub(crate) album: &'a AlbumMetadata,
    pub(crate) disc_length: u32,
}

impl Render for DiscTableOfContents {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Disc ID: {}", self.fingerprint)?;
        writeln!(out, "Tracks:  {}", self.track_count())?;
        writeln!(
            out,
            "Length:  {}",
            readable_length(self.total_length_seconds.into())
        )?;

        for (i, duration) in self.track_durations().iter().enumerate() {
            writeln!(out, "{:>3}. {}", i + 1, format_time((*duration).into()))?;
        }

        Ok(())
    }
}

impl Render for AlbumListing<'_> {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        let album = self.album;

        writeln!(out, "Artist:   {}", album.artist)?;
        writeln!(out, "Title:    {}", album.title)?;

        if album.known_category().is_some() {
            writeln!(out, "Category: {}", album.category)?;
        } else {
            writeln!(out, "Category: {} (non-standard)", album.category)?;
        }

        if !album.genre.is_empty() {
            writeln!(out, "Genre:    {}", album.genre)?;
        }

        if album.year == 0 {
            writeln!(out, "Year:     unknown")?;
        } else {
            writeln!(out, "Year:     {}", album.year)?;
        }

        let release = if album.is_compilation() {
            format!("{} (compilation)", album.release_type().name())
        } else {
            album.release_type().name().to_string()
        };
        writeln!(out, "Release:  {}", release)?;
        writeln!(out, "Length:   {}", readable_length(self.disc_length.into()))?;

        if !album.extra_info.is_empty() {
            writeln!(out, "Notes:    {}", album.extra_info)?;
        }

        writeln!(out)?;
        for (i, track) in album.tracks.iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {}  {}",
                i + 1,
                format_time(track.duration_seconds.into()),
                track.title
            )?;
            if !track.extra_info.is_empty() {
                writeln!(out, "              {}", track.extra_info)?;
            }
        }

        // Rounding can make the tracks add up to a little more than the disc
        let total = album.total_length();
        if total != self.disc_length {
            log::debug!(
                "Track lengths add up to {}s, the disc reports {}s",
                total,
                self.disc_length
            );
        }

        Ok(())
    }
}

impl Render for DiscImport {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        let kind = if self.inexact { "inexact" } else { "exact" };
        writeln!(out, "Disc ID:  {} ({} match)", self.disc_id, kind)?;
        writeln!(out, "Match:    {}", self.selection.description())?;

        AlbumListing {
            album: &self.album,
            disc_length: self.toc.total_length_seconds,
        }
        .render(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cddb::{MatchLine, compute_fingerprint, parse_read_for_disc},
        model::TrackMetadata,
    };

    fn rendered(item: &dyn Render) -> String {
        let mut out = Vec::new();
        item.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_toc() {
        let toc = compute_fingerprint("a70d520d 2 150 17810 3412").unwrap();

        assert_eq!(
            rendered(&toc),
            "Disc ID: a70d520d\n\
             Tracks:  2\n\
             Length:  56m52s\n  \
             1. 03:55\n  \
             2. 52:55\n"
        );
    }

    #[test]
    fn renders_import() {
        let toc = compute_fingerprint("a70d520d 2 150 17810 3412").unwrap();
        let album = parse_read_for_disc(
            "210 data a70d5289 CD database entry follows\n\
             DTITLE=Various Artists / Storm Boy\n\
             DGENRE=Soundtrack\n\
             TTITLE0=Walk Away\n\
             TTITLE1=Keep It Simple\n\
             EXTT1=Single edit\n\
             .\n",
            &toc,
        );
        let import = DiscImport {
            toc,
            disc_id: "a70d5289".to_string(),
            selection: MatchLine::new("data a70d5289 Various Artists / Storm Boy"),
            inexact: true,
            album,
        };

        let text = rendered(&import);

        assert!(text.starts_with("Disc ID:  a70d5289 (inexact match)\n"));
        assert!(text.contains("Match:    Various Artists / Storm Boy\n"));
        assert!(text.contains("Category: data\n"));
        assert!(text.contains("Genre:    Soundtrack\n"));
        assert!(text.contains("Year:     unknown\n"));
        assert!(text.contains("Release:  Single (compilation)\n"));
        assert!(text.contains("  1. 03:55  Walk Away\n"));
        assert!(text.contains("  2. 52:55  Keep It Simple\n              Single edit\n"));
    }

    #[test]
    fn flags_non_standard_category() {
        let album = AlbumMetadata {
            artist: "Xavier Rudd".to_string(),
            title: "Storm Boy".to_string(),
            category: "electronica".to_string(),
            year: 2018,
            tracks: vec![TrackMetadata::default(); 8],
            ..Default::default()
        };
        let listing = AlbumListing {
            album: &album,
            disc_length: 3412,
        };

        let text = rendered(&listing);

        assert!(text.contains("Category: electronica (non-standard)\n"));
        assert!(text.contains("Year:     2018\n"));
        assert!(text.contains("Release:  LP\n"));
        assert!(!text.contains("Genre:"));
    }
}
