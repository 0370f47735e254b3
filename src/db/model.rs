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

//! Database row mapping for domain models.
//!
//! This module provides the conversion logic between raw SQLite values and
//! the album classifications, plus the summary row returned by duplicate
//! lookups.

use rusqlite::{
    Result, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::model::{Category, ReleaseType};

/// An album already present in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredAlbum {
    pub(crate) id: i64,
    pub(crate) artist: String,
    pub(crate) title: String,
    pub(crate) category: String,
    pub(crate) release_type: ReleaseType,
}

impl StoredAlbum {
    /// Maps an SQLite row to a [`StoredAlbum`] instance.
    ///
    /// This is a helper function designed to be used with [`rusqlite::Statement::query_map`].
    ///
    /// # Errors
    ///
    /// Returns a [`rusqlite::Error`] if:
    /// * The row does not contain enough columns.
    /// * The data in a column cannot be converted to the required Rust type.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            artist: row.get(1)?,
            title: row.get(2)?,
            category: row.get(3)?,
            release_type: row.get(4)?,
        })
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.id()))
    }
}

impl ToSql for ReleaseType {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.name()))
    }
}

impl FromSql for ReleaseType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Single" => Ok(ReleaseType::Single),
            "EP" => Ok(ReleaseType::Ep),
            "LP" => Ok(ReleaseType::Lp),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}
