use anyhow::Result;

use super::{ValidateError, require, require_number};
use crate::api::{BuildListOpts, CiClient, PageOpts};
use crate::output::{ColorMode, Format, Renderable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    View,
    Restart,
    Cancel,
    Approve,
}

/// Everything a build action needs, collected from flags and env vars.
#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub org: String,
    pub repo: String,
    pub number: i64,
    pub event: Option<String>,
    pub status: Option<String>,
    pub branch: Option<String>,
    pub before: Option<i64>,
    pub after: Option<i64>,
    pub page: i64,
    pub per_page: i64,
    pub output: Format,
    pub color: ColorMode,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidateError> {
        require("org", &self.org)?;
        require("repo", &self.repo)?;

        match self.action {
            Action::Get => Ok(()),
            Action::View | Action::Restart | Action::Cancel | Action::Approve => {
                require_number("build number", self.number)
            }
        }
    }
}

pub async fn run(config: Config, client: &CiClient) -> Result<()> {
    config.validate()?;

    let result = match config.action {
        Action::Get => {
            let opts = BuildListOpts {
                page: PageOpts {
                    page: config.page,
                    per_page: config.per_page,
                },
                event: config.event.clone(),
                status: config.status.clone(),
                branch: config.branch.clone(),
                before: config.before,
                after: config.after,
            };
            let builds = client.get_builds(&config.org, &config.repo, &opts).await?;
            Renderable::Builds(builds)
        }
        Action::View => {
            let build = client
                .get_build(&config.org, &config.repo, config.number)
                .await?;
            Renderable::Build(build)
        }
        Action::Restart => {
            let build = client
                .restart_build(&config.org, &config.repo, config.number)
                .await?;
            Renderable::Build(build)
        }
        Action::Cancel => {
            let build = client
                .cancel_build(&config.org, &config.repo, config.number)
                .await?;
            Renderable::Build(build)
        }
        Action::Approve => {
            let build = client
                .approve_build(&config.org, &config.repo, config.number)
                .await?;
            Renderable::Build(build)
        }
    };

    result.render(config.output, config.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(action: Action) -> Config {
        Config {
            action,
            org: "github".to_string(),
            repo: "octocat".to_string(),
            number: 1,
            event: None,
            status: None,
            branch: None,
            before: None,
            after: None,
            page: 1,
            per_page: 10,
            output: Format::Table,
            color: ColorMode::Never,
        }
    }

    #[test]
    fn test_validate_get() {
        let mut cfg = config(Action::Get);
        cfg.number = 0;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_validate_missing_org() {
        let mut cfg = config(Action::Get);
        cfg.org = String::new();
        assert_eq!(cfg.validate(), Err(ValidateError::Missing("org")));
    }

    #[test]
    fn test_validate_missing_repo() {
        let mut cfg = config(Action::View);
        cfg.repo = String::new();
        assert_eq!(cfg.validate(), Err(ValidateError::Missing("repo")));
    }

    #[test]
    fn test_validate_number_required_per_action() {
        for action in [Action::View, Action::Restart, Action::Cancel, Action::Approve] {
            let mut cfg = config(action);
            cfg.number = 0;
            assert_eq!(
                cfg.validate(),
                Err(ValidateError::InvalidNumber("build number"))
            );

            cfg.number = 42;
            assert_eq!(cfg.validate(), Ok(()));
        }
    }
}
