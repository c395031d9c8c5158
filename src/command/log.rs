use anyhow::Result;

use super::{ValidateError, require, require_number};
use crate::api::CiClient;
use crate::output::{ColorMode, Format, Renderable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub org: String,
    pub repo: String,
    pub build: i64,
    /// When set, only this step's log is fetched.
    pub step: Option<i64>,
    pub output: Format,
    pub color: ColorMode,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidateError> {
        require("org", &self.org)?;
        require("repo", &self.repo)?;
        require_number("build number", self.build)?;

        if let Some(step) = self.step {
            require_number("step number", step)?;
        }
        Ok(())
    }
}

pub async fn run(config: Config, client: &CiClient) -> Result<()> {
    config.validate()?;

    let result = match config.step {
        Some(step) => {
            let log = client
                .get_step_log(&config.org, &config.repo, config.build, step)
                .await?;
            Renderable::Log(log)
        }
        None => {
            let logs = client
                .get_build_logs(&config.org, &config.repo, config.build)
                .await?;
            Renderable::Logs(logs)
        }
    };

    result.render(config.output, config.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            action: Action::View,
            org: "github".to_string(),
            repo: "octocat".to_string(),
            build: 1,
            step: None,
            output: Format::Table,
            color: ColorMode::Never,
        }
    }

    #[test]
    fn test_validate_whole_build() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn test_validate_needs_build() {
        let mut cfg = config();
        cfg.build = 0;
        assert_eq!(
            cfg.validate(),
            Err(ValidateError::InvalidNumber("build number"))
        );
    }

    #[test]
    fn test_validate_rejects_zero_step() {
        let mut cfg = config();
        cfg.step = Some(0);
        assert_eq!(
            cfg.validate(),
            Err(ValidateError::InvalidNumber("step number"))
        );

        cfg.step = Some(2);
        assert_eq!(cfg.validate(), Ok(()));
    }
}
