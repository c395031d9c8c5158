use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single CI build as returned by the server.
///
/// Timestamps are unix seconds; zero means "not set yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub parent: i64,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub enqueued: i64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub started: i64,
    #[serde(default)]
    pub finished: i64,
    #[serde(default)]
    pub deploy: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default, rename = "ref")]
    pub git_ref: String,
    #[serde(default)]
    pub host: String,
}

/// A webhook delivery record for a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub link: String,
}

/// A single step within a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub build_id: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub exit_code: i64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub started: i64,
    #[serde(default)]
    pub finished: i64,
    #[serde(default)]
    pub host: String,
}

/// Captured log output for a build step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Log {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub build_id: i64,
    #[serde(default)]
    pub repo_id: i64,
    #[serde(default)]
    pub step_id: i64,
    #[serde(default)]
    pub data: String,
}

/// A dashboard: a named collection of repositories with admins and
/// optional per-repo branch/event filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub updated_by: String,
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default)]
    pub repos: Vec<DashboardRepo>,
}

/// A repository entry on a dashboard, with optional display filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardRepo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

/// Platform-wide settings record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub compiler: Compiler,
    #[serde(default)]
    pub queue: Queue,
    #[serde(default)]
    pub repo_allowlist: Vec<String>,
    #[serde(default)]
    pub schedule_allowlist: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compiler {
    #[serde(default)]
    pub clone_image: String,
    #[serde(default)]
    pub template_depth: i64,
    #[serde(default)]
    pub starlark_exec_limit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    #[serde(default)]
    pub routes: Vec<String>,
}

/// Known build/step statuses. The wire format keeps statuses as plain
/// strings; this enum exists for display decisions (color, duration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Pending,
    Running,
    Success,
    Failure,
    Killed,
    Canceled,
    Error,
    Other(String),
}

impl FromStr for Status {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "success" => Self::Success,
            "failure" => Self::Failure,
            "killed" => Self::Killed,
            "canceled" => Self::Canceled,
            "error" => Self::Error,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl Status {
    /// A build that has not finished yet has no wall-clock duration.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("running".parse::<Status>().unwrap(), Status::Running);
        assert_eq!("Success".parse::<Status>().unwrap(), Status::Success);
        assert_eq!(
            "skipped".parse::<Status>().unwrap(),
            Status::Other("skipped".to_string())
        );
    }

    #[test]
    fn test_in_flight() {
        assert!("pending".parse::<Status>().unwrap().is_in_flight());
        assert!("running".parse::<Status>().unwrap().is_in_flight());
        assert!(!"failure".parse::<Status>().unwrap().is_in_flight());
    }

    #[test]
    fn test_build_json_round_trip() {
        let build = Build {
            id: 7,
            number: 42,
            event: "push".to_string(),
            status: "success".to_string(),
            created: 1563474076,
            started: 1563474078,
            finished: 1563474079,
            message: "fix the flaky test".to_string(),
            commit: "48afb5bdc41ad69bf22588491c33d4d1b8ded785".to_string(),
            author: "octocat".to_string(),
            branch: "main".to_string(),
            git_ref: "refs/heads/main".to_string(),
            ..Build::default()
        };

        let json = serde_json::to_string(&build).unwrap();
        let parsed: Build = serde_json::from_str(&json).unwrap();
        assert_eq!(build, parsed);
    }

    #[test]
    fn test_build_ref_field_name() {
        let json = r#"{"number": 1, "ref": "refs/heads/main"}"#;
        let build: Build = serde_json::from_str(json).unwrap();
        assert_eq!(build.git_ref, "refs/heads/main");
    }

    #[test]
    fn test_dashboard_defaults() {
        let dashboard: Dashboard = serde_json::from_str(r#"{"name": "team"}"#).unwrap();
        assert_eq!(dashboard.name, "team");
        assert!(dashboard.admins.is_empty());
        assert!(dashboard.repos.is_empty());
    }
}
