// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! [`ScmClient`] backed by the Surround `sscm` command-line client.
//!
//! The command-line client has no persistent connection, so "connecting"
//! means checking that the client runs and that the server accepts the
//! credentials for the requested branch. The validated login is then passed
//! to every later command via `-y` and `-z`.
//!
//! `-y` puts the password on the child's command line, where other local
//! users can read it from the process list. A client configured with
//! `sscm setclient` already holds the login, and
//! [`SscmCommandClient::with_stored_login`] leaves `-y` off.

pub mod parser;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{HistError, Result};
use crate::scm::client::ScmClient;
use crate::scm::types::{BranchContext, ConnectParams, HistoryItem, HistoryQuery};

/// Default name of the client executable, looked up on `PATH`.
pub const DEFAULT_SSCM_PROGRAM: &str = "sscm";

/// Validated login kept for the lifetime of the connection.
struct Connection {
    /// `-z` value, `host:port`
    server: String,
    /// `-y` value, `username:password`; `None` uses the stored login
    login: Option<String>,
    context: BranchContext,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("server", &self.server)
            .field("login", &"<redacted>")
            .field("context", &self.context)
            .finish()
    }
}

/// Captured result of one `sscm` invocation.
#[derive(Debug)]
struct CommandOutput {
    success: bool,
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl CommandOutput {
    /// Best human-readable reason for a failed command.
    fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("sscm exited with status {}", code),
            None => "sscm terminated by signal".to_string(),
        }
    }
}

/// Client that shells out to `sscm` for every operation.
#[derive(Debug)]
pub struct SscmCommandClient {
    program: PathBuf,
    stored_login: bool,
    connection: Option<Connection>,
}

impl Default for SscmCommandClient {
    fn default() -> Self {
        Self::new(DEFAULT_SSCM_PROGRAM)
    }
}

impl SscmCommandClient {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            stored_login: false,
            connection: None,
        }
    }

    /// Rely on the login saved by `sscm setclient` instead of passing the
    /// credentials on every command line.
    pub fn with_stored_login(mut self) -> Self {
        self.stored_login = true;
        self
    }

    pub fn uses_stored_login(&self) -> bool {
        self.stored_login
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn run(&self, args: &[String]) -> std::io::Result<CommandOutput> {
        // The login argument is never logged.
        debug!(
            target: "sscmhist.sscm",
            program = %self.program.display(),
            command = args.first().map(String::as_str).unwrap_or(""),
            "running sscm"
        );

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn check_client_installed(&self) -> Result<()> {
        let output = self.run(&["version".to_string()]).map_err(|e| {
            HistError::Connect(format!(
                "unable to run '{}': {}",
                self.program.display(),
                e
            ))
        })?;
        if !output.success {
            return Err(HistError::Connect(output.failure_message()));
        }
        Ok(())
    }
}

fn connection_args(connection: &Connection) -> Vec<String> {
    let mut args = Vec::with_capacity(2);
    if let Some(login) = &connection.login {
        args.push(format!("-y{}", login));
    }
    args.push(format!("-z{}", connection.server));
    args
}

impl ScmClient for SscmCommandClient {
    fn connect(&mut self, params: ConnectParams) -> Result<()> {
        if self.connection.is_some() {
            return Err(HistError::Connect("already connected".to_string()));
        }
        self.check_client_installed()?;

        let (username, password) = params.credentials.into_parts();
        let connection = Connection {
            server: format!("{}:{}", params.host, params.port),
            login: (!self.stored_login).then(|| format!("{}:{}", username, password)),
            context: params.context,
        };

        // Validates server, login and branch in a single round trip.
        let mut args = vec![
            "branchproperty".to_string(),
            format!("-b{}", connection.context.branch()),
            format!("-p{}", connection.context.mainline()),
        ];
        args.extend(connection_args(&connection));

        let output = self
            .run(&args)
            .map_err(|e| HistError::Connect(format!("unable to run sscm: {}", e)))?;
        if !output.success {
            return Err(HistError::Connect(output.failure_message()));
        }

        info!(
            target: "sscmhist.sscm",
            server = %connection.server,
            user = %username,
            stored_login = self.stored_login,
            branch = connection.context.branch(),
            "connected"
        );
        self.connection = Some(connection);
        Ok(())
    }

    fn file_history(
        &mut self,
        repo_path: &str,
        file_path: &str,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoryItem>> {
        let connection = self
            .connection
            .as_ref()
            .ok_or_else(|| HistError::Query("not connected".to_string()))?;

        // `sscm history` lists every action and never includes workflow or
        // custom-field changes, which is the only query it can express.
        if *query != HistoryQuery::ALL_ACTIONS {
            return Err(HistError::Query(
                "sscm client only supports the all-actions history query".to_string(),
            ));
        }

        let mut args = vec![
            "history".to_string(),
            file_path.to_string(),
            format!("-b{}", connection.context.branch()),
            format!("-p{}", repo_path),
        ];
        args.extend(connection_args(connection));

        let output = self
            .run(&args)
            .map_err(|e| HistError::Query(format!("unable to run sscm: {}", e)))?;
        if !output.success {
            return Err(HistError::Query(output.failure_message()));
        }

        parser::parse_history(&output.stdout, connection.context.branch())
    }

    fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            debug!(target: "sscmhist.sscm", server = %connection.server, "disconnected");
        }
    }
}
