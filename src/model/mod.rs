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

//! Domain models and core data structures.
//!
//! This module defines the album and track records produced by a CDDB
//! lookup, together with the small classifications (category, release type)
//! that are derived from them before an album is stored.

use serde::Serialize;

use crate::cddb::VALID_CATEGORIES;

/// Album level metadata decoded from a read response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct AlbumMetadata {
    pub(crate) artist: String,
    pub(crate) title: String,
    /// The server category, passed through unfiltered.
    pub(crate) category: String,
    pub(crate) genre: String,
    pub(crate) extra_info: String,
    /// Release year, zero when unknown.
    pub(crate) year: u32,
    /// One entry per track on the disc, in disc order.
    pub(crate) tracks: Vec<TrackMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct TrackMetadata {
    pub(crate) title: String,
    pub(crate) extra_info: String,
    pub(crate) duration_seconds: u32,
}

impl AlbumMetadata {
    /// If "various" appears anywhere in the artist, this is a compilation.
    pub(crate) fn is_compilation(&self) -> bool {
        self.artist.to_lowercase().contains("various")
    }

    /// Sum of all track durations in seconds.
    pub(crate) fn total_length(&self) -> u32 {
        self.tracks.iter().map(|track| track.duration_seconds).sum()
    }

    /// The recognised category, if the server reported one of the standard
    /// names.
    pub(crate) fn known_category(&self) -> Option<Category> {
        Category::from_name(&self.category)
    }

    pub(crate) fn release_type(&self) -> ReleaseType {
        ReleaseType::from_track_count(self.tracks.len())
    }
}

/// One of the original CDDB music categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Category {
    Blues,
    Classical,
    Country,
    Data,
    Folk,
    Jazz,
    NewAge,
    Reggae,
    Rock,
    Soundtrack,
    Misc,
}

impl Category {
    pub(crate) const ALL: [Category; 11] = [
        Category::Blues,
        Category::Classical,
        Category::Country,
        Category::Data,
        Category::Folk,
        Category::Jazz,
        Category::NewAge,
        Category::Reggae,
        Category::Rock,
        Category::Soundtrack,
        Category::Misc,
    ];

    /// Looks up a category by its exact protocol name.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        VALID_CATEGORIES
            .iter()
            .position(|&valid| valid == name)
            .map(|index| Self::ALL[index])
    }

    pub(crate) fn name(self) -> &'static str {
        VALID_CATEGORIES[self.index()]
    }

    /// Stable 1-based identifier, as used in the `categories` table.
    pub(crate) fn id(self) -> i64 {
        self.index() as i64 + 1
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Rough release format, guessed from the number of tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReleaseType {
    Single,
    Ep,
    Lp,
}

impl ReleaseType {
    pub(crate) fn from_track_count(count: usize) -> Self {
        match count {
            0..=4 => ReleaseType::Single,
            5..=7 => ReleaseType::Ep,
            _ => ReleaseType::Lp,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            ReleaseType::Single => "Single",
            ReleaseType::Ep => "EP",
            ReleaseType::Lp => "LP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album_by(artist: &str, track_count: usize) -> AlbumMetadata {
        AlbumMetadata {
            artist: artist.to_string(),
            tracks: vec![TrackMetadata::default(); track_count],
            ..Default::default()
        }
    }

    #[test]
    fn categories_follow_protocol_order() {
        for (index, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.name(), VALID_CATEGORIES[index]);
            assert_eq!(category.id(), index as i64 + 1);
            assert_eq!(Category::from_name(category.name()), Some(*category));
        }
    }

    #[test]
    fn unknown_categories_are_not_recognised() {
        assert_eq!(Category::from_name("newage"), Some(Category::NewAge));
        assert_eq!(Category::from_name("Rock"), None);
        assert_eq!(Category::from_name("pop"), None);
        assert_eq!(Category::from_name(""), None);
    }

    #[test]
    fn release_type_by_track_count() {
        assert_eq!(album_by("A", 1).release_type(), ReleaseType::Single);
        assert_eq!(album_by("A", 4).release_type(), ReleaseType::Single);
        assert_eq!(album_by("A", 5).release_type(), ReleaseType::Ep);
        assert_eq!(album_by("A", 7).release_type(), ReleaseType::Ep);
        assert_eq!(album_by("A", 8).release_type(), ReleaseType::Lp);
    }

    #[test]
    fn detects_compilations() {
        assert!(album_by("Various Artists", 10).is_compilation());
        assert!(album_by("VARIOUS", 10).is_compilation());
        assert!(!album_by("Xavier Rudd", 10).is_compilation());
    }

    #[test]
    fn total_length_sums_tracks() {
        let mut album = album_by("A", 2);
        album.tracks[0].duration_seconds = 235;
        album.tracks[1].duration_seconds = 298;
        assert_eq!(album.total_length(), 533);
    }
}
