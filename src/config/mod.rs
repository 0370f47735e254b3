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

//! Application configuration.
//!
//! This module manages the application configuration file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "cdimport";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    /// CDDB gateway passed to the CDDB tool.
    pub server: String,
    /// The optical drive to read.
    pub device: String,
    pub disc_id_tool: String,
    pub cddb_tool: String,
    pub eject_tool: String,
    /// Path of the SQLite album database.
    pub database: String,
    /// Overrides the user name sent with CDDB requests.
    pub user: Option<String>,
    /// Overrides the host name sent with CDDB requests.
    pub host: Option<String>,
    pub eject_after_save: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: "https://gnudb.gnudb.org/~cddb/cddb.cgi".to_string(),
            device: "/dev/cdrom".to_string(),
            disc_id_tool: "cd-discid".to_string(),
            cddb_tool: "cddb-tool".to_string(),
            eject_tool: "eject".to_string(),
            database: "albums.db".to_string(),
            user: None,
            host: None,
            eject_after_save: true,
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_else(|e| {
        log::warn!("Unable to load configuration, using defaults: {}", e);
        AppConfig::default()
    })
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

/// Where the configuration file lives for the current user.
pub fn config_path() -> Result<PathBuf, confy::ConfyError> {
    confy::get_configuration_file_path(CONFIG_NAME, None)
}
