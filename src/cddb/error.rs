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

use thiserror::Error;

/// Errors produced while parsing CDDB tool output.
///
/// All variants are terminal for the current operation. Nothing in the
/// parsing layer retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub(crate) enum CddbError {
    /// There is no medium in the drive. This is an expected condition.
    #[error("no disc was found in the drive")]
    NoDisc,

    /// The TOC text does not follow the expected token grammar.
    #[error("malformed table of contents: {0}")]
    MalformedToc(String),

    /// The server response has an unexpected shape or status code.
    #[error("CDDB protocol error: {0}")]
    Protocol(String),

    /// A chosen match line could not be split into category and disc id.
    #[error("unable to parse selected match '{0}'")]
    SelectionParse(String),
}
