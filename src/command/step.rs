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
    pub build: i64,
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
        require_number("build number", self.build)?;

        match self.action {
            Action::Get => Ok(()),
            Action::View => require_number("step number", self.number),
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
            let steps = client
                .get_steps(&config.org, &config.repo, config.build, &page)
                .await?;
            Renderable::Steps(steps)
        }
        Action::View => {
            let step = client
                .get_step(&config.org, &config.repo, config.build, config.number)
                .await?;
            Renderable::Step(step)
        }
    };

    result.render(config.output, config.color)
}
