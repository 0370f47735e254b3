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

//! External collaborators.
//!
//! The parsing code never talks to the drive or the network itself. These
//! traits describe where its input text comes from, and [`CommandLineTools`]
//! provides that text by running the usual command-line programs.

mod command;

use anyhow::Result;

use crate::cddb::DiscTableOfContents;

pub(crate) use command::CommandLineTools;

/// Supplies the raw text the parser consumes.
pub(crate) trait DiscSource {
    /// The disc-ID tool output for the disc in the drive.
    fn toc_text(&self) -> Result<String>;

    /// The query response for the given disc.
    fn query_text(&self, toc: &DiscTableOfContents) -> Result<String>;

    /// The read response for a match, addressed by its server-side category
    /// and disc id.
    fn read_text(&self, category: &str, disc_id: &str) -> Result<String>;
}

/// Controls the drive tray.
pub(crate) trait Tray {
    fn open(&self) -> Result<()>;
    fn close(&self) -> Result<()>;
}
