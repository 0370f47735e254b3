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

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::{cddb::MatchLine, session::Chooser};

/// Asks the user to pick a match from a numbered list.
///
/// Entries are numbered from 1. An empty answer, `q` or end of input
/// cancels.
pub(crate) struct PromptChooser<R, W> {
    input: R,
    output: W,
}

impl PromptChooser<io::StdinLock<'static>, io::Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read selection")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Chooser for PromptChooser<R, W> {
    fn choose(&mut self, candidates: &[MatchLine], inexact: bool) -> Result<Option<usize>> {
        if inexact {
            writeln!(self.output, "Only inexact matches were found for this disc:")?;
        } else {
            writeln!(self.output, "Several matches were found for this disc:")?;
        }

        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "{:>3}. {}", i + 1, candidate)?;
        }

        loop {
            write!(self.output, "Select 1-{} (q to cancel): ", candidates.len())?;
            self.output.flush()?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };

            if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }

            match answer.parse::<usize>() {
                Ok(n) if (1..=candidates.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.output, "'{}' is not a valid choice", answer)?,
            }
        }
    }
}
