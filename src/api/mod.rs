//! Backend access — the dashboard endpoints, reachable over HTTP or from a
//! local snapshot directory.
//!
//! Fetch failures surface as [`ApiError`] to the update handler; they are
//! logged and shown in the status bar, never fatal.

pub mod models;
mod remote;
mod snapshot;

use std::path::PathBuf;

use thiserror::Error;

use models::{MemberRecord, OrderRecord, StatsPayload, Suggestion};
pub use remote::RemoteSource;
pub use snapshot::SnapshotSource;

/// Failure modes when talking to a data source.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid server url {0:?}")]
    BadUrl(String),
}

/// Where the dashboard data comes from.
///
/// A `SOURCE` argument starting with `http://`/`https://` selects the remote
/// backend; anything else is treated as a snapshot directory.
#[derive(Debug, Clone)]
pub enum DataSource {
    Remote(RemoteSource),
    Snapshot(SnapshotSource),
}

impl DataSource {
    pub fn from_arg(arg: &str) -> Result<Self, ApiError> {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Ok(Self::Remote(RemoteSource::new(arg)?))
        } else {
            Ok(Self::Snapshot(SnapshotSource::new(PathBuf::from(arg))))
        }
    }

    /// Short label for the table title / status bar.
    pub fn label(&self) -> String {
        match self {
            Self::Remote(remote) => remote.base().to_string(),
            Self::Snapshot(snapshot) => snapshot.dir().display().to_string(),
        }
    }

    pub async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, ApiError> {
        match self {
            Self::Remote(remote) => remote.fetch_orders().await,
            Self::Snapshot(snapshot) => snapshot.fetch_orders(),
        }
    }

    pub async fn fetch_stats(
        &self,
        year: Option<i32>,
        search: &str,
    ) -> Result<StatsPayload, ApiError> {
        match self {
            Self::Remote(remote) => remote.fetch_stats(year, search).await,
            Self::Snapshot(snapshot) => snapshot.fetch_stats(year, search),
        }
    }

    pub async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        match self {
            Self::Remote(remote) => remote.fetch_suggestions(query).await,
            Self::Snapshot(snapshot) => snapshot.fetch_suggestions(query),
        }
    }

    pub async fn fetch_members(&self, event_id: i64) -> Result<Vec<MemberRecord>, ApiError> {
        match self {
            Self::Remote(remote) => remote.fetch_members(event_id).await,
            Self::Snapshot(snapshot) => snapshot.fetch_members(event_id),
        }
    }

    /// Invoice link for a member's invoice id.  Constructed, never fetched —
    /// the PDF itself stays on the server.
    pub fn invoice_url(&self, invoice_id: i64) -> String {
        match self {
            Self::Remote(remote) => remote.invoice_url(invoice_id),
            Self::Snapshot(snapshot) => snapshot.invoice_url(invoice_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_selects_remote_or_snapshot() {
        assert!(matches!(
            DataSource::from_arg("http://localhost:8000").unwrap(),
            DataSource::Remote(_)
        ));
        assert!(matches!(
            DataSource::from_arg("https://events.example.org/").unwrap(),
            DataSource::Remote(_)
        ));
        assert!(matches!(
            DataSource::from_arg("./snapshot").unwrap(),
            DataSource::Snapshot(_)
        ));
    }
}
