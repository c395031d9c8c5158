use anyhow::Result;

use super::{ValidateError, require, require_number};
use crate::api::{CiClient, PageOpts};
use crate::output::{ColorMode, Format, Renderable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    View,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub org: String,
    pub repo: String,
    pub number: i64,
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
            Action::View => require_number("hook number", self.number),
        }
    }
}

pub async fn run(config: Config, client: &CiClient) -> Result<()> {
    config.validate()?;

    let result = match config.action {
        Action::Get => {
            let page = PageOpts {
                page: config.page,
                per_page: config.per_page,
            };
            let hooks = client.get_hooks(&config.org, &config.repo, &page).await?;
            Renderable::Hooks(hooks)
        }
        Action::View => {
            let hook = client
                .get_hook(&config.org, &config.repo, config.number)
                .await?;
            Renderable::Hook(hook)
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
            number: 3,
            page: 1,
            per_page: 10,
            output: Format::Table,
            color: ColorMode::Never,
        }
    }

    #[test]
    fn test_validate_get_ignores_number() {
        let mut cfg = config(Action::Get);
        cfg.number = 0;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_validate_view_needs_number() {
        let mut cfg = config(Action::View);
        cfg.number = 0;
        assert_eq!(
            cfg.validate(),
            Err(ValidateError::InvalidNumber("hook number"))
        );
    }

    #[test]
    fn test_validate_missing_org() {
        let mut cfg = config(Action::View);
        cfg.org = "  ".to_string();
        assert_eq!(cfg.validate(), Err(ValidateError::Missing("org")));
    }
}
