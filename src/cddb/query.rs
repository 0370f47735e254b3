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

//! Query response classification.
//!
//! A query response looks like this:
//!
//! ```text
//! 210 Found exact matches, list follows (until terminating `.')
//! data a70d5289 Xavier Rudd / Storm Boy
//! data a60d5288 Xavier Rudd / Storm Boy
//! .
//! ```
//!
//! The status code on the first line decides how the remaining lines are
//! interpreted:
//!
//! * `200` - one exact match
//! * `202` - no match
//! * `210` - several exact matches
//! * `211` - inexact matches, one of which must be picked

use std::fmt;

use serde::Serialize;

use crate::cddb::{
    CddbError,
    lines::{split_response_lines, status_code},
};

pub(crate) const EXACT_MATCH: u16 = 200;
pub(crate) const NO_MATCH: u16 = 202;
pub(crate) const MULTIPLE_EXACT_MATCHES: u16 = 210;
pub(crate) const INEXACT_MATCHES: u16 = 211;

/// A candidate line of the form `<category> <discid> <artist> / <title>`.
///
/// The raw text is kept verbatim. The category and disc id are sliced out on
/// demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct MatchLine(String);

impl MatchLine {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// The first token, the server-side category.
    pub(crate) fn category(&self) -> Option<&str> {
        self.0.split_whitespace().next()
    }

    /// The second token, the server-side disc id.
    pub(crate) fn disc_id(&self) -> Option<&str> {
        self.0.split_whitespace().nth(1)
    }

    /// Everything after the disc id, usually `<artist> / <title>`.
    pub(crate) fn description(&self) -> &str {
        let mut rest = self.0.trim_start();
        for _ in 0..2 {
            rest = match rest.split_once(char::is_whitespace) {
                Some((_, tail)) => tail.trim_start(),
                None => "",
            };
        }
        rest
    }
}

impl fmt::Display for MatchLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The classified result of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QueryOutcome {
    Single(MatchLine),
    Multiple(Vec<MatchLine>),
    Inexact(Vec<MatchLine>),
    None,
}

impl QueryOutcome {
    /// The candidate lines in server order.
    pub(crate) fn matches(&self) -> &[MatchLine] {
        match self {
            QueryOutcome::Single(line) => std::slice::from_ref(line),
            QueryOutcome::Multiple(lines) | QueryOutcome::Inexact(lines) => lines,
            QueryOutcome::None => &[],
        }
    }
}

/// Classifies a raw query response.
///
/// For a `200` response the match is line 1. Servers speaking raw cddbp put
/// the match on the status line itself, so when line 1 is absent the text
/// after the status code is used instead.
///
/// # Errors
///
/// Returns [`CddbError::Protocol`] if the response is empty, the status line
/// is not numeric, a `200` response carries no match, or the status code is
/// not one of the four handled codes.
pub(crate) fn classify_query(query_text: &str) -> Result<QueryOutcome, CddbError> {
    let lines = split_response_lines(query_text);

    let (status_line, candidates) = lines
        .split_first()
        .ok_or_else(|| CddbError::Protocol("empty query response".to_string()))?;

    let code = status_code(status_line)?;
    log::debug!("Query returned status {}", code);

    let outcome = match code {
        EXACT_MATCH => match candidates.first() {
            Some(&line) => QueryOutcome::Single(MatchLine::new(line)),
            None => {
                let inline = status_line
                    .trim_start()
                    .trim_start_matches(|c: char| c.is_ascii_digit())
                    .trim();
                if inline.is_empty() {
                    return Err(CddbError::Protocol("missing match line".to_string()));
                }
                QueryOutcome::Single(MatchLine::new(inline))
            }
        },
        MULTIPLE_EXACT_MATCHES => QueryOutcome::Multiple(to_matches(candidates)),
        INEXACT_MATCHES => QueryOutcome::Inexact(to_matches(candidates)),
        NO_MATCH => QueryOutcome::None,
        other => {
            return Err(CddbError::Protocol(format!(
                "unhandled status code {}",
                other
            )));
        }
    };

    log::debug!("{} candidate match(es)", outcome.matches().len());

    Ok(outcome)
}

fn to_matches(lines: &[&str]) -> Vec<MatchLine> {
    lines.iter().map(|&line| MatchLine::new(line)).collect()
}
