// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Top-level history run: connect, query, print, disconnect.
//!
//! The session and the fetched item list are both scoped to [`run`], so the
//! list is dropped and the session closed on every return path.

use std::io::Write;

use tracing::{error, info};

use crate::error::Result;
use crate::history::{write_history, OutputFormat, VersionFilter};
use crate::scm::{ConnectParams, ScmClient, Session};

/// Process exit status for a completed run.
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status when connecting or querying failed.
pub const EXIT_FAILURE: u8 = 1;

/// One history lookup as requested on the command line.
#[derive(Debug)]
pub struct HistoryRequest {
    pub connect: ConnectParams,
    pub repo_path: String,
    pub file_path: String,
    pub version: VersionFilter,
    pub format: OutputFormat,
}

/// Counts from a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Items returned by the server
    pub fetched: usize,
    /// Items that survived the version filter
    pub printed: usize,
}

/// Fetch and print the history described by `request`.
pub fn run<C, W>(client: &mut C, request: HistoryRequest, out: &mut W) -> Result<RunSummary>
where
    C: ScmClient + ?Sized,
    W: Write + ?Sized,
{
    let HistoryRequest {
        connect,
        repo_path,
        file_path,
        version,
        format,
    } = request;

    let mut session = Session::new(client);
    session.open(connect)?;

    // Declared after the session so it is released first.
    let items = session.fetch_history(&repo_path, &file_path)?;
    let printed = write_history(out, &items, version, format)?;

    info!(
        target: "sscmhist.app",
        fetched = items.len(),
        printed,
        filter = %version,
        "history printed"
    );
    Ok(RunSummary {
        fetched: items.len(),
        printed,
    })
}

/// Run and turn the outcome into an exit status.
///
/// Connect and query failures are reported on `out`, the same stream the
/// history goes to; any other failure is only logged.
pub fn execute<C, W>(client: &mut C, request: HistoryRequest, out: &mut W) -> u8
where
    C: ScmClient + ?Sized,
    W: Write + ?Sized,
{
    match run(client, request, out) {
        Ok(_) => EXIT_SUCCESS,
        Err(err) if err.is_scm_failure() => {
            if let Err(write_err) = writeln!(out, "{}", err).and_then(|_| out.flush()) {
                error!(target: "sscmhist.app", error = %write_err, "failed to report error");
            }
            EXIT_FAILURE
        }
        Err(err) => {
            error!(target: "sscmhist.app", error = %err, "history run failed");
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HistError;
    use crate::history::HEADER;
    use crate::scm::{BranchContext, Credentials, HistoryItem, MockScmClient};

    fn request(version: u32) -> HistoryRequest {
        HistoryRequest {
            connect: ConnectParams {
                host: "scm.example.com".to_string(),
                port: 4900,
                credentials: Credentials::new("alice", "secret"),
                context: BranchContext::new("Mainline", "dev"),
            },
            repo_path: "Mainline/src".to_string(),
            file_path: "main.c".to_string(),
            version: VersionFilter::new(version),
            format: OutputFormat::Text,
        }
    }

    fn three_items() -> Vec<HistoryItem> {
        vec![
            HistoryItem {
                version: 1,
                date: 1_383_069_840,
                action: 2,
                action_branch: "dev".to_string(),
                action_version: 1,
                username: "alice".to_string(),
            },
            HistoryItem {
                version: 2,
                date: 1_383_124_500,
                action: 10,
                action_branch: "dev".to_string(),
                action_version: 2,
                username: "bob".to_string(),
            },
            HistoryItem {
                version: 3,
                date: 1_383_306_000,
                action: 3,
                action_branch: "release".to_string(),
                action_version: 2,
                username: "carol".to_string(),
            },
        ]
    }

    /// A client whose connect and query succeed, disconnecting exactly once.
    fn healthy_client() -> MockScmClient {
        let mut client = MockScmClient::new();
        client
            .expect_connect()
            .withf(|params| {
                params.host == "scm.example.com"
                    && params.port == 4900
                    && params.context == BranchContext::new("Mainline", "dev")
            })
            .times(1)
            .returning(|_| Ok(()));
        client
            .expect_file_history()
            .withf(|repo, file, _| repo == "Mainline/src" && file == "main.c")
            .times(1)
            .returning(|_, _, _| Ok(three_items()));
        client.expect_disconnect().times(1).return_const(());
        client
    }

    fn output_lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_all_versions_prints_header_and_rows() {
        let mut client = healthy_client();
        let mut out = Vec::new();

        let status = execute(&mut client, request(0), &mut out);

        assert_eq!(status, EXIT_SUCCESS);
        let lines = output_lines(&out);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1\t1383069840\t2\tdev\t1\talice");
        assert_eq!(lines[2], "2\t1383124500\t10\tdev\t2\tbob");
        assert_eq!(lines[3], "3\t1383306000\t3\trelease\t2\tcarol");
    }

    #[test]
    fn test_single_version_has_no_header() {
        let mut client = healthy_client();
        let mut out = Vec::new();

        let status = execute(&mut client, request(2), &mut out);

        assert_eq!(status, EXIT_SUCCESS);
        assert_eq!(output_lines(&out), vec!["2\t1383124500\t10\tdev\t2\tbob"]);
    }

    #[test]
    fn test_unmatched_version_prints_nothing_and_succeeds() {
        let mut client = healthy_client();
        let mut out = Vec::new();

        let summary = run(&mut client, request(5), &mut out).unwrap();

        assert_eq!(
            summary,
            RunSummary {
                fetched: 3,
                printed: 0
            }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_connect_failure_reports_and_disconnects() {
        let mut client = MockScmClient::new();
        client
            .expect_connect()
            .times(1)
            .returning(|_| Err(HistError::Connect("Unable to connect to server".into())));
        client.expect_file_history().never();
        client.expect_disconnect().times(1).return_const(());
        let mut out = Vec::new();

        let status = execute(&mut client, request(0), &mut out);

        assert_eq!(status, EXIT_FAILURE);
        assert_eq!(
            output_lines(&out),
            vec!["sscm_connect failed: Unable to connect to server"]
        );
    }

    #[test]
    fn test_query_failure_reports_and_disconnects() {
        let mut client = MockScmClient::new();
        client.expect_connect().times(1).returning(|_| Ok(()));
        client
            .expect_file_history()
            .times(1)
            .returning(|_, _, _| Err(HistError::Query("File not found".into())));
        client.expect_disconnect().times(1).return_const(());
        let mut out = Vec::new();

        let status = execute(&mut client, request(0), &mut out);

        assert_eq!(status, EXIT_FAILURE);
        assert_eq!(
            output_lines(&out),
            vec!["sscm_file_history failed: File not found"]
        );
    }

    #[test]
    fn test_json_output() {
        let mut client = healthy_client();
        let mut out = Vec::new();
        let mut req = request(0);
        req.format = OutputFormat::Json;

        let status = execute(&mut client, req, &mut out);

        assert_eq!(status, EXIT_SUCCESS);
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[2]["actionBranch"], "release");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_failure_still_disconnects() {
        let mut client = healthy_client();

        let err = run(&mut client, request(0), &mut BrokenPipe).unwrap_err();

        assert!(matches!(err, HistError::Io(_)));
        assert_eq!(execute(&mut healthy_client(), request(0), &mut BrokenPipe), EXIT_FAILURE);
    }
}
