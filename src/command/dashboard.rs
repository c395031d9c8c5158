use anyhow::Result;

use super::{ValidateError, add_unique, drop_items, require};
use crate::api::{CiClient, Dashboard, DashboardRepo};
use crate::events;
use crate::output::{ColorMode, Format, Renderable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Get,
    View,
    Update,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub action: Action,
    /// Dashboard identifier (view/update).
    pub id: String,
    /// Dashboard name (required on add, optional rename on update).
    pub name: String,
    /// Repos to include (add) or append (update), as org/repo names.
    pub add_repos: Vec<String>,
    pub drop_repos: Vec<String>,
    pub add_admins: Vec<String>,
    pub drop_admins: Vec<String>,
    /// Repos whose branch/event filters are being replaced (update only).
    pub target_repos: Vec<String>,
    pub branches: Vec<String>,
    pub events: Vec<String>,
    pub output: Format,
    pub color: ColorMode,
}

impl Default for Action {
    fn default() -> Self {
        Self::Get
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidateError> {
        match self.action {
            Action::Add => require("name", &self.name),
            Action::Get => Ok(()),
            Action::View => require("id", &self.id),
            Action::Update => {
                require("id", &self.id)?;
                if !self.target_repos.is_empty()
                    && self.branches.is_empty()
                    && self.events.is_empty()
                {
                    return Err(ValidateError::NoOverrides);
                }
                Ok(())
            }
        }
    }

    /// Event tokens in canonical qualified form. Unknown tokens are
    /// rejected here, before any network call.
    fn canonical_events(&self) -> Result<Vec<String>> {
        Ok(events::populate(&self.events)?.to_list())
    }
}

pub async fn run(config: Config, client: &CiClient) -> Result<()> {
    config.validate()?;

    let result = match config.action {
        Action::Add => {
            let events = config.canonical_events()?;
            let dashboard = Dashboard {
                name: config.name.clone(),
                admins: config.add_admins.clone(),
                repos: config
                    .add_repos
                    .iter()
                    .map(|name| DashboardRepo {
                        name: name.clone(),
                        branches: config.branches.clone(),
                        events: events.clone(),
                        ..DashboardRepo::default()
                    })
                    .collect(),
                ..Dashboard::default()
            };
            Renderable::Dashboard(client.add_dashboard(&dashboard).await?)
        }
        Action::Get => Renderable::Dashboards(client.get_dashboards().await?),
        Action::View => Renderable::Dashboard(client.get_dashboard(&config.id).await?),
        Action::Update => {
            let events = config.canonical_events()?;
            let mut dashboard = client.get_dashboard(&config.id).await?;
            apply_update(&mut dashboard, &config, &events);
            Renderable::Dashboard(client.update_dashboard(&dashboard).await?)
        }
    };

    result.render(config.output, config.color)
}

/// Merge the requested add/drop/target mutations into a fetched dashboard.
fn apply_update(dashboard: &mut Dashboard, config: &Config, events: &[String]) {
    if !config.name.trim().is_empty() {
        dashboard.name = config.name.clone();
    }

    add_unique(&mut dashboard.admins, &config.add_admins);
    drop_items(&mut dashboard.admins, &config.drop_admins);

    for name in &config.add_repos {
        if !dashboard.repos.iter().any(|r| &r.name == name) {
            dashboard.repos.push(DashboardRepo {
                name: name.clone(),
                ..DashboardRepo::default()
            });
        }
    }
    dashboard.repos.retain(|r| !config.drop_repos.contains(&r.name));

    for repo in &mut dashboard.repos {
        if config.target_repos.contains(&repo.name) {
            if !config.branches.is_empty() {
                repo.branches = config.branches.clone();
            }
            if !events.is_empty() {
                repo.events = events.to_vec();
            }
        }
    }
}
