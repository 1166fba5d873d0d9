//! Data revisions and race-free loading
//!
//! A revision is a commit sha of the upstream data repository, or `master`.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Revision loaded when none is selected
pub const DEFAULT_REVISION: &str = "master";

/// File name of the JSON feed inside a revision
pub const DATA_FILE: &str = "data.min.json";

/// File name of the legacy markdown feed inside a revision
pub const README_FILE: &str = "README.md";

/// `<host>/<revision>/data.min.json`
pub fn data_url(host: &str, revision: &str) -> String {
    format!("{}/{}/{}", host.trim_end_matches('/'), revision, DATA_FILE)
}

/// `<host>/<revision>/README.md`
pub fn readme_url(host: &str, revision: &str) -> String {
    format!("{}/{}/{}", host.trim_end_matches('/'), revision, README_FILE)
}

/// `<history-host>/commits?path=data.min.json`
pub fn commits_url(history_host: &str) -> String {
    format!("{}/commits?path={}", history_host.trim_end_matches('/'), DATA_FILE)
}

/// Commit entry as returned by the commits API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub date: String,
}

/// A selectable data revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub sha: String,
    /// "2024-05-01 (0a1b2c3)"
    pub date: String,
}

impl Revision {
    pub fn latest() -> Self {
        Self {
            sha: DEFAULT_REVISION.to_string(),
            date: "Latest".to_string(),
        }
    }

    pub fn from_commit(entry: &CommitEntry) -> Result<Self> {
        let date = DateTime::parse_from_rfc3339(&entry.commit.author.date).map_err(|_| {
            Error::Date {
                sha: entry.sha.clone(),
                date: entry.commit.author.date.clone(),
            }
        })?;
        let short: String = entry.sha.chars().take(7).collect();

        Ok(Self {
            sha: entry.sha.clone(),
            date: format!(
                "{} ({})",
                date.with_timezone(&Utc).format("%Y-%m-%d"),
                short
            ),
        })
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.date)
    }
}

/// Map a commits API response to revisions, `master` first.
/// Entries with an unreadable date are skipped.
pub fn parse_revisions(json: &str) -> Result<Vec<Revision>> {
    let entries: Vec<CommitEntry> = serde_json::from_str(json)?;
    Ok(revisions_from_commits(&entries))
}

pub fn revisions_from_commits(entries: &[CommitEntry]) -> Vec<Revision> {
    let mut revisions = vec![Revision::latest()];
    for entry in entries {
        match Revision::from_commit(entry) {
            Ok(revision) => revisions.push(revision),
            Err(e) => warn!("Skipping revision: {}", e),
        }
    }
    revisions
}

/// Token for one in-flight load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Where the current load stands
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading { revision: String },
    Ready { revision: String, data: T },
    Failed { revision: String, message: String },
}

/// Hands out tickets so only the newest load may publish its result.
/// A result replaces the previous one in a single assignment.
#[derive(Debug, Clone)]
pub struct LoadTracker<T> {
    generation: u64,
    pending: Option<(LoadTicket, String)>,
    state: LoadState<T>,
}

impl<T> Default for LoadTracker<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: None,
            state: LoadState::Idle,
        }
    }
}

impl<T> LoadTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `revision`; any earlier ticket becomes stale
    pub fn begin(&mut self, revision: &str) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        self.pending = Some((ticket, revision.to_string()));
        self.state = LoadState::Loading {
            revision: revision.to_string(),
        };
        debug!("Load {} started for {}", self.generation, revision);
        ticket
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        matches!(&self.pending, Some((t, _)) if *t == ticket)
    }

    /// Publish a result. Returns `false` (and drops the result) when the ticket is stale.
    pub fn finish<E: fmt::Display>(&mut self, ticket: LoadTicket, result: std::result::Result<T, E>) -> bool {
        if !self.is_current(ticket) {
            debug!("Discarding stale load {}", ticket.0);
            return false;
        }
        let Some((_, revision)) = self.pending.take() else {
            return false;
        };

        self.state = match result {
            Ok(data) => LoadState::Ready { revision, data },
            Err(e) => LoadState::Failed {
                revision,
                message: e.to_string(),
            },
        };
        true
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Ready { data, .. } => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(
            data_url("https://raw.example.com/repo/", "master"),
            "https://raw.example.com/repo/master/data.min.json"
        );
        assert_eq!(
            readme_url("https://raw.example.com/repo", "abc"),
            "https://raw.example.com/repo/abc/README.md"
        );
        assert_eq!(
            commits_url("https://api.example.com/repos/o/r"),
            "https://api.example.com/repos/o/r/commits?path=data.min.json"
        );
    }

    #[test]
    fn test_parse_revisions() {
        let json = r#"[
            { "sha": "0123456789abcdef", "commit": { "author": { "date": "2024-05-01T12:30:00Z" } } },
            { "sha": "fedcba9876543210", "commit": { "author": { "date": "not a date" } } },
            { "sha": "abc", "commit": { "author": { "date": "2024-04-30T23:30:00-02:00" } } }
        ]"#;

        let revisions = parse_revisions(json).unwrap();

        assert_eq!(revisions.len(), 3);
        assert_eq!(revisions[0], Revision::latest());
        assert_eq!(revisions[1].sha, "0123456789abcdef");
        assert_eq!(revisions[1].date, "2024-05-01 (0123456)");
        assert_eq!(revisions[2].date, "2024-05-01 (abc)");
    }

    #[test]
    fn test_parse_revisions_rejects_non_array() {
        assert!(parse_revisions(r#"{"message": "rate limited"}"#).is_err());
    }

    #[test]
    fn test_newest_load_wins() {
        let mut tracker: LoadTracker<&str> = LoadTracker::new();

        let first = tracker.begin("aaa");
        let second = tracker.begin("bbb");
        assert!(tracker.is_loading());

        // the later request resolves first
        assert!(tracker.finish(second, Ok::<_, String>("bbb data")));
        // the earlier one must not overwrite it
        assert!(!tracker.finish(first, Ok::<_, String>("aaa data")));

        assert_eq!(
            tracker.state(),
            &LoadState::Ready {
                revision: "bbb".to_string(),
                data: "bbb data"
            }
        );
    }

    #[test]
    fn test_failed_load_is_visible() {
        let mut tracker: LoadTracker<u32> = LoadTracker::new();
        let ticket = tracker.begin("master");

        assert!(tracker.finish(ticket, Err("HTTP error: 404 Not Found")));

        assert_eq!(
            tracker.state(),
            &LoadState::Failed {
                revision: "master".to_string(),
                message: "HTTP error: 404 Not Found".to_string()
            }
        );
        assert!(tracker.data().is_none());
        // a ticket is single use
        assert!(!tracker.finish(ticket, Ok::<_, String>(1)));
    }
}
