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

//! Command-line tool invocation.
//!
//! Programs are started directly with an argument vector rather than through
//! a shell, so quotes and parentheses in match lines need no escaping.

use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::{
    cddb::{DiscTableOfContents, PROTOCOL_LEVEL},
    config::AppConfig,
    tools::{DiscSource, Tray},
    util::env::Identity,
};

/// Runs `cd-discid`, `cddb-tool` and `eject`.
#[derive(Debug, Clone)]
pub(crate) struct CommandLineTools {
    config: AppConfig,
    identity: Identity,
}

impl CommandLineTools {
    pub(crate) fn new(config: &AppConfig, identity: Identity) -> Self {
        Self {
            config: config.clone(),
            identity,
        }
    }

    /// Arguments shared by the `query` and `read` CDDB tool commands.
    fn cddb_args(&self, command: &str) -> Vec<String> {
        vec![
            command.to_string(),
            self.config.server.clone(),
            PROTOCOL_LEVEL.to_string(),
            self.identity.user.clone(),
            self.identity.host.clone(),
        ]
    }
}

/// Runs a program and captures its standard output.
///
/// See [`output_text`] for when standard error is used instead.
fn capture(program: &str, args: &[String]) -> Result<String> {
    log::debug!("Executing {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute '{}'", program))?;

    if !output.status.success() {
        log::debug!("'{}' exited with {}", program, output.status);
    }

    Ok(output_text(&output.stdout, &output.stderr))
}

/// Picks the text handed to the parser.
///
/// Standard error is only used when standard output is blank. The disc-ID
/// tool reports a missing disc there, and the parser needs to see that
/// message, but diagnostics printed alongside a good read must not end up
/// trailing the TOC.
fn output_text(stdout: &[u8], stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    if text.trim().is_empty() {
        String::from_utf8_lossy(stderr).into_owned()
    } else {
        if !stderr.is_empty() {
            log::debug!("Ignoring diagnostics: {}", String::from_utf8_lossy(stderr).trim());
        }
        text.into_owned()
    }
}

/// Runs a program for its side effect only.
fn run(program: &str, args: &[&str]) -> Result<()> {
    log::debug!("Executing {} {}", program, args.join(" "));

    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("Failed to execute '{}'", program))?;

    if !status.success() {
        bail!("'{}' exited with {}", program, status);
    }

    Ok(())
}

impl DiscSource for CommandLineTools {
    fn toc_text(&self) -> Result<String> {
        capture(&self.config.disc_id_tool, &[self.config.device.clone()])
    }

    fn query_text(&self, toc: &DiscTableOfContents) -> Result<String> {
        let mut args = self.cddb_args("query");
        args.extend(toc.raw.split_whitespace().map(str::to_string));
        capture(&self.config.cddb_tool, &args)
    }

    fn read_text(&self, category: &str, disc_id: &str) -> Result<String> {
        let mut args = self.cddb_args("read");
        args.push(category.to_string());
        args.push(disc_id.to_string());
        capture(&self.config.cddb_tool, &args)
    }
}

impl Tray for CommandLineTools {
    fn open(&self) -> Result<()> {
        run(&self.config.eject_tool, &[self.config.device.as_str()])
    }

    fn close(&self) -> Result<()> {
        run(&self.config.eject_tool, &["-t", self.config.device.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cddb::compute_fingerprint;

    fn tools() -> CommandLineTools {
        let identity = Identity {
            user: "pmvarsa".to_string(),
            host: "pumpkin".to_string(),
        };
        CommandLineTools::new(&AppConfig::default(), identity)
    }

    #[test]
    fn builds_cddb_arguments() {
        assert_eq!(
            tools().cddb_args("query"),
            vec![
                "query",
                "https://gnudb.gnudb.org/~cddb/cddb.cgi",
                "6",
                "pmvarsa",
                "pumpkin"
            ]
        );
    }

    #[test]
    fn stderr_only_replaces_blank_stdout() {
        assert_eq!(
            output_text(b"a70d520d 2 150 17810 3412\n", b"cd-discid: warning: slow drive\n"),
            "a70d520d 2 150 17810 3412\n"
        );
        assert_eq!(
            output_text(b"", b"cd-discid: /dev/cdrom: No medium found\n"),
            "cd-discid: /dev/cdrom: No medium found\n"
        );
        assert_eq!(output_text(b"\n", b""), "");
    }

    #[test]
    fn diagnostics_do_not_spoil_the_toc() {
        let text = output_text(b"a70d520d 2 150 17810 3412\n", b"read retry on sector 4\n");
        let toc = compute_fingerprint(&text).unwrap();
        assert_eq!(toc.track_durations(), vec![235, 3175]);
    }

    #[test]
    fn missing_program_is_an_error() {
        let result = capture("cdimport-no-such-program", &[]);
        assert!(result.is_err());
    }
}
