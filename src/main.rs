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

//! # CD Import.
//!
//! Looks up audio CDs in a CDDB database and stores the album metadata in a
//! local SQLite catalogue.
//!
//! The work is split into a pure parsing layer and the glue around it:
//!
//! * **[`cddb`]** turns the text printed by the disc-ID and CDDB tools into
//!   fingerprints, match outcomes and album metadata.
//! * **[`tools`]** runs those external programs.
//! * **[`session`]** sequences one disc through query, selection and read.
//! * **[`db`]** stores the result.
//!
//! ## Usage
//!
//! Running without a subcommand imports the disc in the configured drive.
//! The `parse` subcommand replays captured tool output without a drive,
//! which is handy for checking odd server responses.

mod cddb;
mod config;
mod db;
mod model;
mod render;
mod session;
mod tools;
mod util;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::{
    cddb::{compute_fingerprint, parse_read_for_disc},
    config::AppConfig,
    db::StoredAlbum,
    render::{AlbumListing, Render},
    session::{DiscImport, ImportSession, Lookup, PromptChooser},
    tools::{CommandLineTools, Tray},
    util::env::{Identity, init_logging},
};

#[derive(Parser, Debug)]
#[command(name = "cdimport", version, about = "Import audio CD metadata from CDDB")]
struct Cli {
    /// Log at debug level, overriding LOG_LEVEL
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up the disc in the drive and store it (the default)
    Import(ImportArgs),
    /// Print the fingerprint and track lengths of the disc in the drive
    Fingerprint,
    /// Parse captured disc-ID and read output without a drive
    Parse {
        /// File holding the disc-ID tool output
        #[arg(long)]
        toc: PathBuf,
        /// File holding the CDDB read response
        #[arg(long)]
        read: PathBuf,
        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Open the drive tray
    Eject {
        /// Close the tray instead
        #[arg(long)]
        close: bool,
    },
    /// Show the configuration in effect
    Config {
        /// Write it to the configuration file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug, Default)]
struct ImportArgs {
    /// Do everything except commit to the database
    #[arg(long)]
    dry_run: bool,
    /// Store the album even if it looks like a duplicate
    #[arg(long)]
    force: bool,
    /// Print JSON instead of a listing
    #[arg(long)]
    json: bool,
}

/// The entry point of the application.
///
/// Parses the command line, initialises logging and configuration, then
/// dispatches to the selected subcommand.
fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = config::load_config();

    match cli.command.unwrap_or(Command::Import(ImportArgs::default())) {
        Command::Import(args) => import(&config, &args),
        Command::Fingerprint => fingerprint(&config),
        Command::Parse { toc, read, json } => parse(&toc, &read, json),
        Command::Eject { close } => eject(&config, close),
        Command::Config { save } => show_config(&config, save),
    }
}

fn command_line_tools(config: &AppConfig) -> CommandLineTools {
    CommandLineTools::new(config, Identity::detect(config))
}

/// Looks up the disc in the drive and stores it.
///
/// A missing disc, an unknown disc and a cancelled choice are reported to
/// the user and are not errors.
fn import(config: &AppConfig, args: &ImportArgs) -> Result<()> {
    let tools = command_line_tools(config);
    let session = ImportSession::new(&tools).with_tray(&tools);
    let mut chooser = PromptChooser::stdio();

    let import = match session.lookup(&mut chooser)? {
        Lookup::NoDisc => {
            println!("No disc in {}", config.device);
            return Ok(());
        }
        Lookup::NoMatch(toc) => {
            println!(
                "No CDDB entry for disc {} ({} tracks)",
                toc.fingerprint,
                toc.track_count()
            );
            return Ok(());
        }
        Lookup::Cancelled(_) => {
            println!("Import cancelled");
            return Ok(());
        }
        Lookup::Found(import) => import,
    };

    if args.json {
        print_json(&*import)?;
    } else {
        import.render(&mut io::stdout().lock())?;
    }

    let mut conn = db::init_db(&config.database)?;

    let duplicates = find_duplicates(&conn, &import)?;
    for album in &duplicates {
        log::warn!(
            "Already stored as album {}: {} / {} ({}, {})",
            album.id,
            album.artist,
            album.title,
            album.category,
            album.release_type.name()
        );
    }
    if !duplicates.is_empty() && !args.force {
        println!("Not saved, use --force to store it again");
        return Ok(());
    }

    let album_id = db::insert_album(&mut conn, &import, args.dry_run)
        .with_context(|| format!("Failed to save '{}'", import.album.title))?;

    if args.dry_run {
        println!("Dry run, nothing saved");
        return Ok(());
    }

    println!("Saved as album {}", album_id);

    if config.eject_after_save {
        if let Err(e) = tools.open() {
            log::warn!("Unable to eject the disc: {:#}", e);
        }
    }

    Ok(())
}

/// Inexact matches can carry a different disc id for an album that is
/// already stored, so those are checked by artist and title as well.
fn find_duplicates(conn: &rusqlite::Connection, import: &DiscImport) -> Result<Vec<StoredAlbum>> {
    let mut duplicates = db::find_by_disc_id(conn, &import.disc_id)?;

    if import.inexact {
        for album in db::find_by_artist_title(conn, &import.album.artist, &import.album.title)? {
            if !duplicates.iter().any(|d| d.id == album.id) {
                duplicates.push(album);
            }
        }
    }

    Ok(duplicates)
}

fn fingerprint(config: &AppConfig) -> Result<()> {
    let tools = command_line_tools(config);

    match ImportSession::new(&tools).with_tray(&tools).fingerprint()? {
        Some(toc) => toc.render(&mut io::stdout().lock())?,
        None => println!("No disc in {}", config.device),
    }

    Ok(())
}

#[derive(Serialize)]
struct ParsedDisc<'a> {
    toc: &'a cddb::DiscTableOfContents,
    album: &'a model::AlbumMetadata,
}

fn parse(toc_path: &Path, read_path: &Path, json: bool) -> Result<()> {
    let toc_text = fs::read_to_string(toc_path)
        .with_context(|| format!("Failed to read '{}'", toc_path.display()))?;
    let read_text = fs::read_to_string(read_path)
        .with_context(|| format!("Failed to read '{}'", read_path.display()))?;

    let toc = compute_fingerprint(&toc_text)
        .with_context(|| format!("Invalid TOC in '{}'", toc_path.display()))?;
    let album = parse_read_for_disc(&read_text, &toc);

    if json {
        print_json(&ParsedDisc {
            toc: &toc,
            album: &album,
        })
    } else {
        let mut out = io::stdout().lock();
        writeln!(out, "Disc ID:  {}", toc.fingerprint)?;
        AlbumListing {
            album: &album,
            disc_length: toc.total_length_seconds,
        }
        .render(&mut out)?;
        Ok(())
    }
}

fn eject(config: &AppConfig, close: bool) -> Result<()> {
    let tools = command_line_tools(config);

    if close {
        tools.close().context("Failed to close the tray")
    } else {
        tools.open().context("Failed to open the tray")
    }
}

fn show_config(config: &AppConfig, save: bool) -> Result<()> {
    if save {
        config::save_config(config).context("Failed to save configuration")?;
    }

    let path = config::config_path().context("Failed to locate configuration file")?;
    println!("# {}", path.display());
    print_json(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
    println!("{}", text);
    Ok(())
}
