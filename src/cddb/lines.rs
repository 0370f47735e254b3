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

//! Response framing.
//!
//! Multi-line CDDB responses end with a line holding a single `.`. These
//! helpers cut a raw response at that terminator and pull the numeric status
//! code off the first line.

use crate::cddb::CddbError;

/// The line that terminates a multi-line response.
pub(crate) const TERMINATOR: &str = ".";

/// Splits a raw response into its content lines.
///
/// Lines may end in `\n` or `\r\n`. The first line that is exactly `.` and
/// everything after it is dropped. A response with no terminator yields all
/// of its lines.
pub(crate) fn split_response_lines(raw: &str) -> Vec<&str> {
    raw.lines().take_while(|line| *line != TERMINATOR).collect()
}

/// Extracts the status code from the first line of a response.
///
/// # Errors
///
/// Returns [`CddbError::Protocol`] if the first whitespace-delimited token is
/// missing or is not a valid status code.
pub(crate) fn status_code(line: &str) -> Result<u16, CddbError> {
    let token = line
        .split_whitespace()
        .next()
        .ok_or_else(|| CddbError::Protocol("empty status line".to_string()))?;

    token
        .parse()
        .map_err(|_| CddbError::Protocol(format!("invalid status code in '{}'", line)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_terminator() {
        let raw = "210 Found exact matches\ndata a70d5289 Xavier Rudd / Storm Boy\n.\ntrailing\n";
        let lines = split_response_lines(raw);
        assert_eq!(
            lines,
            vec![
                "210 Found exact matches",
                "data a70d5289 Xavier Rudd / Storm Boy"
            ]
        );
    }

    #[test]
    fn tolerates_crlf_and_missing_terminator() {
        let lines = split_response_lines("202 No match found\r\n.\r\n");
        assert_eq!(lines, vec!["202 No match found"]);

        let lines = split_response_lines("200 OK\nrock 1234abcd A / B");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn dot_inside_text_is_not_a_terminator() {
        let lines = split_response_lines("211 close\n. leading dot\nmisc 01 x / y\n.\n");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn parses_status_code() {
        assert_eq!(status_code("210 Found exact matches"), Ok(210));
        assert_eq!(status_code("  202"), Ok(202));
    }

    #[test]
    fn rejects_bad_status_lines() {
        assert!(matches!(status_code("OK 200"), Err(CddbError::Protocol(_))));
        assert!(matches!(status_code(""), Err(CddbError::Protocol(_))));
        assert!(matches!(status_code("   "), Err(CddbError::Protocol(_))));
        assert_eq!(
            status_code("70000 x"),
            Err(CddbError::Protocol("invalid status code in '70000 x'".to_string()))
        );
    }
}
