use anyhow::Result;

use super::{ValidateError, add_unique, drop_items};
use crate::api::{CiClient, Platform};
use crate::output::{ColorMode, Format, Renderable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Update,
}

/// Platform settings actions. Update is a fetch-merge-write cycle over
/// the current settings record.
#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub clone_image: Option<String>,
    pub template_depth: Option<i64>,
    pub starlark_exec_limit: Option<i64>,
    pub add_routes: Vec<String>,
    pub drop_routes: Vec<String>,
    pub add_repos: Vec<String>,
    pub drop_repos: Vec<String>,
    pub add_schedules: Vec<String>,
    pub drop_schedules: Vec<String>,
    pub output: Format,
    pub color: ColorMode,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidateError> {
        match self.action {
            Action::View => Ok(()),
            Action::Update => {
                if !self.has_changes() {
                    return Err(ValidateError::NoChanges);
                }
                Ok(())
            }
        }
    }

    fn has_changes(&self) -> bool {
        self.clone_image.is_some()
            || self.template_depth.is_some()
            || self.starlark_exec_limit.is_some()
            || !self.add_routes.is_empty()
            || !self.drop_routes.is_empty()
            || !self.add_repos.is_empty()
            || !self.drop_repos.is_empty()
            || !self.add_schedules.is_empty()
            || !self.drop_schedules.is_empty()
    }
}

pub async fn run(config: Config, client: &CiClient) -> Result<()> {
    config.validate()?;

    let result = match config.action {
        Action::View => Renderable::Platform(client.get_settings().await?),
        Action::Update => {
            let mut settings = client.get_settings().await?;
            apply_update(&mut settings, &config);
            Renderable::Platform(client.update_settings(&settings).await?)
        }
    };

    result.render(config.output, config.color)
}

fn apply_update(settings: &mut Platform, config: &Config) {
    if let Some(clone_image) = &config.clone_image {
        settings.compiler.clone_image = clone_image.clone();
    }
    if let Some(template_depth) = config.template_depth {
        settings.compiler.template_depth = template_depth;
    }
    if let Some(starlark_exec_limit) = config.starlark_exec_limit {
        settings.compiler.starlark_exec_limit = starlark_exec_limit;
    }

    add_unique(&mut settings.queue.routes, &config.add_routes);
    drop_items(&mut settings.queue.routes, &config.drop_routes);

    add_unique(&mut settings.repo_allowlist, &config.add_repos);
    drop_items(&mut settings.repo_allowlist, &config.drop_repos);

    add_unique(&mut settings.schedule_allowlist, &config.add_schedules);
    drop_items(&mut settings.schedule_allowlist, &config.drop_schedules);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn config(action: Action) -> Config {
        Config {
            action,
            clone_image: None,
            template_depth: None,
            starlark_exec_limit: None,
            add_routes: Vec::new(),
            drop_routes: Vec::new(),
            add_repos: Vec::new(),
            drop_repos: Vec::new(),
            add_schedules: Vec::new(),
            drop_schedules: Vec::new(),
            output: Format::Table,
            color: ColorMode::Never,
        }
    }

    #[test]
    fn test_validate_view_needs_nothing() {
        assert_eq!(config(Action::View).validate(), Ok(()));
    }

    #[test]
    fn test_validate_update_needs_a_change() {
        let cfg = config(Action::Update);
        assert_eq!(cfg.validate(), Err(ValidateError::NoChanges));

        let mut cfg = config(Action::Update);
        cfg.add_routes = strings(&["large"]);
        assert_eq!(cfg.validate(), Ok(()));

        let mut cfg = config(Action::Update);
        cfg.template_depth = Some(3);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_apply_update_scalars() {
        let mut settings = Platform::default();
        let mut cfg = config(Action::Update);
        cfg.clone_image = Some("target/clone:latest".to_string());
        cfg.starlark_exec_limit = Some(100);

        apply_update(&mut settings, &cfg);

        assert_eq!(settings.compiler.clone_image, "target/clone:latest");
        assert_eq!(settings.compiler.starlark_exec_limit, 100);
        assert_eq!(settings.compiler.template_depth, 0);
    }

    #[test]
    fn test_apply_update_lists_deduplicate() {
        let mut settings = Platform {
            repo_allowlist: strings(&["github/octocat"]),
            ..Platform::default()
        };

        let mut cfg = config(Action::Update);
        cfg.add_repos = strings(&["github/octocat", "github/hello-world"]);
        cfg.add_schedules = strings(&["github/*"]);
        cfg.drop_routes = strings(&["large"]);

        apply_update(&mut settings, &cfg);

        assert_eq!(
            settings.repo_allowlist,
            strings(&["github/octocat", "github/hello-world"])
        );
        assert_eq!(settings.schedule_allowlist, strings(&["github/*"]));
        assert!(settings.queue.routes.is_empty());
    }
}
