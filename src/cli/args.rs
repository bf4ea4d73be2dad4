// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! The positional arguments follow the order of the original `sscmhist`
//! tool so existing scripts keep working.

use clap::Parser;
use std::convert::Infallible;
use std::path::PathBuf;

use crate::app::HistoryRequest;
use crate::history::{OutputFormat, VersionFilter};
use crate::scm::sscm::DEFAULT_SSCM_PROGRAM;
use crate::scm::{BranchContext, ConnectParams, Credentials, SscmCommandClient};

/// sscmhist - print the history of a file stored on a Surround SCM server
#[derive(Parser)]
#[command(name = "sscmhist")]
#[command(version, about = "Print the history of a file stored on a Surround SCM server")]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Path to the sscm command-line client
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SSCM_PROGRAM)]
    pub sscm: PathBuf,

    /// Use the login saved with `sscm setclient` instead of passing the
    /// username and password to sscm
    #[arg(long)]
    pub stored_login: bool,

    /// Server host name
    pub host: String,

    /// Server port
    pub port: u16,

    /// Username to log in with
    pub username: String,

    /// Password to log in with. It is passed to sscm as `-y<user>:<password>`
    /// and shows up in the process list; see --stored-login
    pub password: String,

    /// Mainline branch name
    pub mainline: String,

    /// Branch to query
    pub branch: String,

    /// Repository path containing the file
    pub repository: String,

    /// File name within the repository
    pub file: String,

    /// Only print this version (missing, 0 or non-numeric prints all versions)
    #[arg(id = "version_filter", value_name = "VERSION", allow_hyphen_values = true, value_parser = parse_version_filter)]
    pub version: Option<VersionFilter>,
}

fn parse_version_filter(raw: &str) -> Result<VersionFilter, Infallible> {
    Ok(VersionFilter::parse_lenient(raw))
}

impl Cli {
    /// The version filter, defaulting to all versions.
    pub fn version_filter(&self) -> VersionFilter {
        self.version.unwrap_or_default()
    }

    /// The `sscm` client these options describe.
    pub fn client(&self) -> SscmCommandClient {
        let client = SscmCommandClient::new(self.sscm.clone());
        if self.stored_login {
            client.with_stored_login()
        } else {
            client
        }
    }

    /// Build the history request; the password moves into the request.
    pub fn into_request(self) -> HistoryRequest {
        let version = self.version_filter();
        HistoryRequest {
            connect: ConnectParams {
                host: self.host,
                port: self.port,
                credentials: Credentials::new(self.username, self.password),
                context: BranchContext::new(self.mainline, self.branch),
            },
            repo_path: self.repository,
            file_path: self.file,
            version,
            format: self.format,
        }
    }
}
