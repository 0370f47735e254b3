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

//! Data access layer.
//!
//! This module handles all interactions with the SQLite album database,
//! including schema creation, duplicate lookups and storing imported discs.
//! It uses cached statements for the lookups that run on every import.
//!
//! # Tables
//!
//! * `categories` - The fixed list of CDDB categories.
//! * `albums` - One row per imported disc.
//! * `tracks` - The tracks of each album, numbered from 1.

mod model;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::{model::Category, session::DiscImport};

pub(crate) use model::StoredAlbum;

/// Opens a connection to the SQLite database and configures it.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging.
/// * **Constraints**: Enforces foreign key integrity.
/// * **Schema**: Executes [`create_schema`] to ensure all tables and indices exist.
///
/// # Arguments
///
/// * `path` - The file system path to the SQLite database file.
///
/// # Errors
///
/// Returns an error if:
/// * The database file cannot be opened.
/// * The initial PRAGMA configurations fail.
/// * The schema initialization fails.
pub(crate) fn init_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database '{}'", path))?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    create_schema(&conn)?;
    seed_categories(&conn)?;

    Ok(conn)
}

/// Create the database schema.
///
/// This function creates the `categories`, `albums`, and `tracks` tables if
/// they do not already exist, in a single transaction.
///
/// Title and artist compare case-insensitively, which is what the duplicate
/// lookups rely on.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            disc_id TEXT NOT NULL,
            query_result TEXT NOT NULL,
            category_id INTEGER,
            category TEXT NOT NULL,
            release_type TEXT NOT NULL,
            is_compilation INTEGER NOT NULL,
            title TEXT NOT NULL COLLATE NOCASE,
            artist TEXT NOT NULL COLLATE NOCASE,
            genre TEXT NOT NULL,
            length INTEGER NOT NULL,
            extra_info TEXT NOT NULL,
            year INTEGER,
            num_tracks INTEGER NOT NULL,
            FOREIGN KEY (category_id) REFERENCES categories (id)
        );

        CREATE INDEX IF NOT EXISTS idx_albums_disc_id ON albums (disc_id);
        CREATE INDEX IF NOT EXISTS idx_albums_artist_title ON albums (artist, title);

        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            album_id INTEGER NOT NULL,
            number INTEGER NOT NULL,
            title TEXT NOT NULL,
            length INTEGER NOT NULL,
            extra_info TEXT NOT NULL,
            UNIQUE (album_id, number),
            FOREIGN KEY (album_id) REFERENCES albums (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tracks_album_id ON tracks (album_id);

        COMMIT;",
    )
    .context("Failed to create schema")
}

fn seed_categories(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO categories (id, name) VALUES (?1, ?2)")?;
    for category in Category::ALL {
        stmt.execute(params![category, category.name()])?;
    }
    Ok(())
}

const STORED_ALBUM_COLUMNS: &str = "
    SELECT al.id, al.artist, al.title, COALESCE(ca.name, al.category), al.release_type
    FROM albums al
    LEFT JOIN categories ca ON al.category_id = ca.id
";

/// Looks up albums previously stored with the given disc id.
///
/// # Errors
///
/// Returns an error if the SQL query fails or a row cannot be mapped to a
/// [`StoredAlbum`].
pub(crate) fn find_by_disc_id(conn: &Connection, disc_id: &str) -> Result<Vec<StoredAlbum>> {
    let sql = format!("{} WHERE al.disc_id = ? ORDER BY al.id", STORED_ALBUM_COLUMNS);

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([disc_id], StoredAlbum::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Looks up albums by artist and title, ignoring case.
///
/// Inexact matches carry a disc id that may not be the one stored for the
/// same album, so they are checked this way too.
///
/// # Errors
///
/// Returns an error if the SQL query fails or a row cannot be mapped to a
/// [`StoredAlbum`].
pub(crate) fn find_by_artist_title(
    conn: &Connection,
    artist: &str,
    title: &str,
) -> Result<Vec<StoredAlbum>> {
    let sql = format!(
        "{} WHERE al.artist = ?1 AND al.title = ?2 ORDER BY al.id",
        STORED_ALBUM_COLUMNS
    );

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map(params![artist, title], StoredAlbum::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Stores an imported disc and its tracks.
///
/// Everything is written in one transaction. With `dry_run` set the
/// transaction is rolled back once all rows have been inserted, which
/// exercises the constraints without changing the database.
///
/// Returns the id of the new album row.
pub(crate) fn insert_album(conn: &mut Connection, import: &DiscImport, dry_run: bool) -> Result<i64> {
    let album = &import.album;
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO albums (
            disc_id, query_result, category_id, category, release_type, is_compilation,
            title, artist, genre, length, extra_info, year, num_tracks
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            import.disc_id,
            import.selection.as_str(),
            album.known_category(),
            album.category,
            album.release_type(),
            album.is_compilation(),
            album.title,
            album.artist,
            album.genre,
            import.toc.total_length_seconds,
            album.extra_info,
            (album.year != 0).then_some(album.year),
            album.tracks.len() as i64,
        ],
    )
    .context("Failed to insert into the albums table")?;

    let album_id = tx.last_insert_rowid();
    log::debug!("Inserted album '{}' as album_id {}", album.title, album_id);

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO tracks (album_id, number, title, length, extra_info)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for (i, track) in album.tracks.iter().enumerate() {
            stmt.execute(params![
                album_id,
                i as i64 + 1,
                track.title,
                track.duration_seconds,
                track.extra_info,
            ])
            .with_context(|| format!("Failed to insert track {}", i + 1))?;
        }
    }

    if dry_run {
        log::info!("Dry run, rolling back album '{}'", album.title);
        tx.rollback()?;
    } else {
        tx.commit().context("Failed to commit transaction")?;
        log::info!(
            "Stored '{} / {}' with {} tracks",
            album.artist,
            album.title,
            album.tracks.len()
        );
    }

    Ok(album_id)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        cddb::{MatchLine, compute_fingerprint},
        model::{AlbumMetadata, ReleaseType, TrackMetadata},
    };

    fn open() -> (TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("albums.db");
        let conn = init_db(path.to_str().unwrap()).unwrap();
        (dir, conn)
    }

    fn storm_boy() -> DiscImport {
        DiscImport {
            toc: compute_fingerprint("a70d520d 2 150 17810 3412").unwrap(),
            disc_id: "a70d520d".to_string(),
            selection: MatchLine::new("data a70d5289 Xavier Rudd / Storm Boy"),
            inexact: false,
            album: AlbumMetadata {
                artist: "Xavier Rudd".to_string(),
                title: "Storm Boy".to_string(),
                category: "data".to_string(),
                genre: "Pop-Folk".to_string(),
                extra_info: String::new(),
                year: 2018,
                tracks: vec![
                    TrackMetadata {
                        title: "Walk Away".to_string(),
                        extra_info: String::new(),
                        duration_seconds: 235,
                    },
                    TrackMetadata {
                        title: "Keep It Simple".to_string(),
                        extra_info: "Single edit".to_string(),
                        duration_seconds: 3175,
                    },
                ],
            },
        }
    }

    #[test]
    fn init_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("albums.db");
        let path = path.to_str().unwrap();

        drop(init_db(path).unwrap());
        let conn = init_db(path).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 11);
    }

    #[test]
    fn stores_album_and_tracks() {
        let (_dir, mut conn) = open();
        let album_id = insert_album(&mut conn, &storm_boy(), false).unwrap();

        let found = find_by_disc_id(&conn, "a70d520d").unwrap();
        assert_eq!(
            found,
            vec![StoredAlbum {
                id: album_id,
                artist: "Xavier Rudd".to_string(),
                title: "Storm Boy".to_string(),
                category: "data".to_string(),
                release_type: ReleaseType::Single,
            }]
        );

        let tracks: Vec<(i64, String, i64, String)> = conn
            .prepare("SELECT number, title, length, extra_info FROM tracks WHERE album_id = ? ORDER BY number")
            .unwrap()
            .query_map([album_id], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            tracks,
            vec![
                (1, "Walk Away".to_string(), 235, String::new()),
                (2, "Keep It Simple".to_string(), 3175, "Single edit".to_string()),
            ]
        );

        let (length, year, category_id): (i64, Option<i64>, Option<i64>) = conn
            .query_row(
                "SELECT length, year, category_id FROM albums WHERE id = ?",
                [album_id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(length, 3412);
        assert_eq!(year, Some(2018));
        assert_eq!(category_id, Some(Category::Data.id()));
    }

    #[test]
    fn finds_by_artist_and_title_ignoring_case() {
        let (_dir, mut conn) = open();
        insert_album(&mut conn, &storm_boy(), false).unwrap();

        assert_eq!(
            find_by_artist_title(&conn, "xavier rudd", "STORM BOY").unwrap().len(),
            1
        );
        assert!(find_by_artist_title(&conn, "Xavier Rudd", "Spirit Bird").unwrap().is_empty());
        assert!(find_by_disc_id(&conn, "a60d5288").unwrap().is_empty());
    }

    #[test]
    fn unknown_category_and_year_are_kept_loosely() {
        let (_dir, mut conn) = open();
        let mut import = storm_boy();
        import.album.category = "electronica".to_string();
        import.album.year = 0;

        let album_id = insert_album(&mut conn, &import, false).unwrap();

        let found = find_by_disc_id(&conn, "a70d520d").unwrap();
        assert_eq!(found[0].category, "electronica");

        let year: Option<i64> = conn
            .query_row("SELECT year FROM albums WHERE id = ?", [album_id], |r| r.get(0))
            .unwrap();
        assert_eq!(year, None);
    }

    #[test]
    fn dry_run_leaves_no_rows() {
        let (_dir, mut conn) = open();
        insert_album(&mut conn, &storm_boy(), true).unwrap();

        assert!(find_by_disc_id(&conn, "a70d520d").unwrap().is_empty());
        let tracks: i64 = conn
            .query_row("SELECT COUNT(*) FROM tracks", [], |r| r.get(0))
            .unwrap();
        assert_eq!(tracks, 0);
    }
}
