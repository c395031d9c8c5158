//! Mapping from event-name strings to the structured event set used by
//! dashboard and repo filters.
//!
//! Accepted forms:
//! - plain events: `push`, `tag`, `delete`, `pull_request`, `deployment`,
//!   `comment`, `schedule`
//! - legacy aliases: `pull` (pull_request), `deploy` (deployment)
//! - qualified `event:action` forms, e.g. `pull_request:opened`
//!
//! Unrecognized tokens are rejected. Setting a flag twice is a no-op, so
//! the result is independent of token order and duplicates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("invalid event: {0}")]
    Unknown(String),
}

/// Boolean event flags grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSet {
    #[serde(default)]
    pub push: PushActions,
    #[serde(default)]
    pub pull_request: PullActions,
    #[serde(default)]
    pub deployment: DeployActions,
    #[serde(default)]
    pub comment: CommentActions,
    #[serde(default)]
    pub schedule: ScheduleActions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushActions {
    #[serde(default)]
    pub branch: bool,
    #[serde(default)]
    pub tag: bool,
    #[serde(default)]
    pub delete_branch: bool,
    #[serde(default)]
    pub delete_tag: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullActions {
    #[serde(default)]
    pub opened: bool,
    #[serde(default)]
    pub edited: bool,
    #[serde(default)]
    pub synchronize: bool,
    #[serde(default)]
    pub reopened: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployActions {
    #[serde(default)]
    pub created: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentActions {
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub edited: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleActions {
    #[serde(default)]
    pub run: bool,
}

impl EventSet {
    /// Canonical qualified tokens for every enabled flag, in fixed
    /// category order. Feeding the result back through [`populate`]
    /// reproduces the same set.
    pub fn to_list(&self) -> Vec<String> {
        let mut list = Vec::new();
        let mut push = |enabled: bool, token: &str| {
            if enabled {
                list.push(token.to_string());
            }
        };

        push(self.push.branch, "push:branch");
        push(self.push.tag, "push:tag");
        push(self.push.delete_branch, "push:delete_branch");
        push(self.push.delete_tag, "push:delete_tag");
        push(self.pull_request.opened, "pull_request:opened");
        push(self.pull_request.edited, "pull_request:edited");
        push(self.pull_request.synchronize, "pull_request:synchronize");
        push(self.pull_request.reopened, "pull_request:reopened");
        push(self.deployment.created, "deployment:created");
        push(self.comment.created, "comment:created");
        push(self.comment.edited, "comment:edited");
        push(self.schedule.run, "schedule:run");

        list
    }
}

/// Build an [`EventSet`] from raw event tokens.
///
/// Rejects unknown tokens instead of silently dropping them: a typo in an
/// event filter would otherwise produce a filter that matches nothing.
pub fn populate(events: &[String]) -> Result<EventSet, EventError> {
    let mut set = EventSet::default();

    for event in events {
        match event.as_str() {
            "push" | "push:branch" => set.push.branch = true,
            "tag" | "push:tag" => set.push.tag = true,
            "delete" => {
                set.push.delete_branch = true;
                set.push.delete_tag = true;
            }
            "push:delete_branch" => set.push.delete_branch = true,
            "push:delete_tag" => set.push.delete_tag = true,
            "pull_request" | "pull" => {
                set.pull_request.opened = true;
                set.pull_request.synchronize = true;
                set.pull_request.reopened = true;
            }
            "pull_request:opened" => set.pull_request.opened = true,
            "pull_request:edited" => set.pull_request.edited = true,
            "pull_request:synchronize" => set.pull_request.synchronize = true,
            "pull_request:reopened" => set.pull_request.reopened = true,
            "deployment" | "deploy" | "deployment:created" => set.deployment.created = true,
            "comment" => {
                set.comment.created = true;
                set.comment.edited = true;
            }
            "comment:created" => set.comment.created = true,
            "comment:edited" => set.comment.edited = true,
            "schedule" | "schedule:run" => set.schedule.run = true,
            unknown => return Err(EventError::Unknown(unknown.to_string())),
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_events() {
        let set = populate(&strings(&["push", "tag", "schedule"])).unwrap();
        assert!(set.push.branch);
        assert!(set.push.tag);
        assert!(set.schedule.run);
        assert!(!set.deployment.created);
        assert!(!set.pull_request.opened);
    }

    #[test]
    fn test_delete_sets_both_flags() {
        let set = populate(&strings(&["delete"])).unwrap();
        assert!(set.push.delete_branch);
        assert!(set.push.delete_tag);
    }

    #[test]
    fn test_legacy_aliases() {
        let via_alias = populate(&strings(&["pull", "deploy"])).unwrap();
        let via_name = populate(&strings(&["pull_request", "deployment"])).unwrap();
        assert_eq!(via_alias, via_name);
    }

    #[test]
    fn test_qualified_actions() {
        let set = populate(&strings(&["pull_request:edited", "comment:created"])).unwrap();
        assert!(set.pull_request.edited);
        assert!(!set.pull_request.opened);
        assert!(set.comment.created);
        assert!(!set.comment.edited);
    }

    #[test]
    fn test_unknown_token_is_an_error() {
        let err = populate(&strings(&["push", "pusj"])).unwrap_err();
        assert_eq!(err, EventError::Unknown("pusj".to_string()));
        assert_eq!(err.to_string(), "invalid event: pusj");
    }

    #[test]
    fn test_idempotent_and_order_independent() {
        let once = populate(&strings(&["push", "comment", "tag"])).unwrap();
        let twice = populate(&strings(&["tag", "push", "comment", "push", "tag"])).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input_is_empty_set() {
        assert_eq!(populate(&[]).unwrap(), EventSet::default());
    }

    #[test]
    fn test_to_list_round_trips() {
        let set = populate(&strings(&["pull", "tag", "comment:edited"])).unwrap();
        let list = set.to_list();
        assert_eq!(
            list,
            strings(&[
                "push:tag",
                "pull_request:opened",
                "pull_request:synchronize",
                "pull_request:reopened",
                "comment:edited",
            ])
        );
        assert_eq!(populate(&list).unwrap(), set);
    }
}
