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

//! Disc lookup orchestration.
//!
//! An [`ImportSession`] drives one disc through the whole CDDB exchange:
//!
//! * Fingerprint the disc from the disc-ID tool output.
//! * Query the server and classify the response.
//! * Ask the [`Chooser`] to pick when there is more than one candidate.
//! * Read the chosen entry and decode it into album metadata.
//!
//! The parsing itself is delegated to [`crate::cddb`]. This module only
//! sequences the calls and decides what each outcome means for the user.

mod prompt;

use anyhow::Result;
use serde::Serialize;

use crate::{
    cddb::{
        CddbError, DiscTableOfContents, MatchLine, QueryOutcome, classify_query,
        compute_fingerprint, parse_read_for_disc, resolve_selection,
    },
    model::AlbumMetadata,
    tools::{DiscSource, Tray},
};

pub(crate) use prompt::PromptChooser;

/// Picks one of several candidate matches.
pub(crate) trait Chooser {
    /// Returns the index of the chosen candidate, or `None` to cancel.
    fn choose(&mut self, candidates: &[MatchLine], inexact: bool) -> Result<Option<usize>>;
}

/// Everything learned about a disc that is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DiscImport {
    pub(crate) toc: DiscTableOfContents,
    /// The id stored with the album. For inexact matches this is the id of
    /// the chosen entry rather than the TOC fingerprint.
    pub(crate) disc_id: String,
    pub(crate) selection: MatchLine,
    pub(crate) inexact: bool,
    pub(crate) album: AlbumMetadata,
}

/// The end state of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lookup {
    NoDisc,
    NoMatch(DiscTableOfContents),
    Cancelled(DiscTableOfContents),
    Found(Box<DiscImport>),
}

pub(crate) struct ImportSession<'a, S> {
    source: &'a S,
    tray: Option<&'a dyn Tray>,
}

impl<'a, S: DiscSource> ImportSession<'a, S> {
    pub(crate) fn new(source: &'a S) -> Self {
        Self { source, tray: None }
    }

    /// Closes the tray before reading. The user may have left it open.
    pub(crate) fn with_tray(mut self, tray: &'a dyn Tray) -> Self {
        self.tray = Some(tray);
        self
    }

    /// Fingerprints the disc in the drive.
    ///
    /// Returns `Ok(None)` when the drive is empty.
    pub(crate) fn fingerprint(&self) -> Result<Option<DiscTableOfContents>> {
        if let Some(tray) = self.tray {
            if let Err(e) = tray.close() {
                log::warn!("Unable to close the tray: {:#}", e);
            }
        }

        let toc_text = self.source.toc_text()?;
        match compute_fingerprint(&toc_text) {
            Ok(toc) => Ok(Some(toc)),
            Err(CddbError::NoDisc) => {
                log::info!("No disc in the drive");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Runs the full lookup for the disc in the drive.
    pub(crate) fn lookup(&self, chooser: &mut dyn Chooser) -> Result<Lookup> {
        let Some(toc) = self.fingerprint()? else {
            return Ok(Lookup::NoDisc);
        };

        let query_text = self.source.query_text(&toc)?;
        let outcome = classify_query(&query_text)?;

        let (selection, inexact) = match outcome {
            QueryOutcome::None => {
                log::info!("No match for disc {}", toc.fingerprint);
                return Ok(Lookup::NoMatch(toc));
            }
            QueryOutcome::Single(line) => (line, false),
            QueryOutcome::Multiple(lines) => match pick(chooser, lines, false)? {
                Pick::Chosen(line) => (line, false),
                Pick::Empty => return Ok(Lookup::NoMatch(toc)),
                Pick::Cancelled => return Ok(Lookup::Cancelled(toc)),
            },
            QueryOutcome::Inexact(lines) => match pick(chooser, lines, true)? {
                Pick::Chosen(line) => (line, true),
                Pick::Empty => return Ok(Lookup::NoMatch(toc)),
                Pick::Cancelled => return Ok(Lookup::Cancelled(toc)),
            },
        };

        let disc_id = if inexact {
            resolve_selection(&selection)?
        } else {
            toc.fingerprint.clone()
        };

        let (category, entry_id) = match (selection.category(), selection.disc_id()) {
            (Some(category), Some(entry_id)) => (category, entry_id),
            _ => return Err(CddbError::SelectionParse(selection.to_string()).into()),
        };

        log::info!("Reading entry {} {}", category, entry_id);
        let read_text = self.source.read_text(category, entry_id)?;
        let album = parse_read_for_disc(&read_text, &toc);

        Ok(Lookup::Found(Box::new(DiscImport {
            toc,
            disc_id,
            selection,
            inexact,
            album,
        })))
    }
}

enum Pick {
    Chosen(MatchLine),
    Empty,
    Cancelled,
}

fn pick(chooser: &mut dyn Chooser, mut lines: Vec<MatchLine>, inexact: bool) -> Result<Pick> {
    if lines.is_empty() {
        log::warn!("Server reported matches but listed none");
        return Ok(Pick::Empty);
    }

    log::info!(
        "{} {} matches found",
        lines.len(),
        if inexact { "inexact" } else { "exact" }
    );

    match chooser.choose(&lines, inexact)? {
        Some(index) if index < lines.len() => {
            log::debug!("Option #{} was selected", index);
            Ok(Pick::Chosen(lines.swap_remove(index)))
        }
        Some(index) => Err(CddbError::Protocol(format!(
            "selection {} is out of range, there are {} matches",
            index,
            lines.len()
        ))
        .into()),
        None => Ok(Pick::Cancelled),
    }
}
