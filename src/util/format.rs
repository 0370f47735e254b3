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

/// Formats a duration in seconds into a human-readable `MM:SS` string.
///
/// This is used for the per-track lengths in album listings.
///
/// # Arguments
///
/// * `total_seconds` - The duration to format.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_time(65), "01:05");
/// assert_eq!(format_time(3600), "60:00");
/// ```
pub(crate) fn format_time(total_seconds: u64) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Formats the length of a whole disc, e.g. `56m52s`.
///
/// Hours are only shown once the length reaches 100 minutes. Below that the
/// minutes simply keep counting.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(readable_length(3412), "56m52s");
/// assert_eq!(readable_length(6000), "1h40m0s");
/// ```
pub(crate) fn readable_length(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if (hours == 1 && mins > 39) || hours > 1 {
        format!("{}h{}m{}s", hours, mins, secs)
    } else {
        format!("{}m{}s", mins + hours * 60, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_track_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(235), "03:55");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn formats_disc_length() {
        assert_eq!(readable_length(0), "0m0s");
        assert_eq!(readable_length(3412), "56m52s");
        assert_eq!(readable_length(3600), "60m0s");
        assert_eq!(readable_length(5999), "99m59s");
        assert_eq!(readable_length(6000), "1h40m0s");
        assert_eq!(readable_length(7384), "2h3m4s");
    }
}
