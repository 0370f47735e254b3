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

use std::sync::LazyLock;

use regex::Regex;

use crate::cddb::{CddbError, MatchLine, compile_pattern};

/// A match line: category word, disc identifier, then the description.
pub(crate) const SELECTION_PATTERN: &str = r"^[a-z]+ ([a-z0-9]+) .*$";

static SELECTION: LazyLock<Regex> = LazyLock::new(|| compile_pattern(SELECTION_PATTERN));

/// Extracts the disc identifier from an inexact match the user picked.
///
/// The identifier replaces the TOC fingerprint as the id of the disc from
/// here on.
///
/// # Errors
///
/// Returns [`CddbError::SelectionParse`] when the line does not have the
/// `<category> <discid> <description>` shape.
pub(crate) fn resolve_selection(selection: &MatchLine) -> Result<String, CddbError> {
    SELECTION
        .captures(selection.as_str())
        .and_then(|captures| captures.get(1))
        .map(|disc_id| disc_id.as_str().to_string())
        .ok_or_else(|| CddbError::SelectionParse(selection.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_disc_id() {
        let line = MatchLine::new("data a70d5289 Xavier Rudd / Storm Boy");
        assert_eq!(resolve_selection(&line), Ok("a70d5289".to_string()));
    }

    #[test]
    fn rejects_unexpected_shapes() {
        let cases = [
            "",
            "data",
            "data a70d5289",
            "DATA a70d5289 Xavier Rudd / Storm Boy",
            "data A70D5289 Xavier Rudd / Storm Boy",
            " data a70d5289 Xavier Rudd / Storm Boy",
            "211 Found inexact matches",
        ];

        for case in cases {
            assert_eq!(
                resolve_selection(&MatchLine::new(case)),
                Err(CddbError::SelectionParse(case.to_string())),
                "{:?} should be rejected",
                case
            );
        }
    }
}
