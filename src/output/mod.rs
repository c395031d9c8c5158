//! Output drivers: table, wide table, JSON, YAML, dump, and spew.

pub mod table;

use std::fmt::Debug;
use std::io::IsTerminal;

use anyhow::Result;
use chrono::DateTime;
use chrono_humanize::HumanTime;
use clap::ValueEnum;
use serde::Serialize;

use crate::api::{Build, Dashboard, Hook, Log, Platform, Status, Step};
use self::table::{Cell, Table, status_cell};

/// Column wrap width for the default table.
const TABLE_WRAP: usize = 50;

/// Column wrap width for the wide table.
const WIDE_WRAP: usize = 200;

/// The requested output driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Fixed column set, wrapped at 50 chars
    #[default]
    Table,
    /// Extended column set, wrapped at 200 chars
    Wide,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// Recursive field dump
    Dump,
    /// Pretty-printed nested structure
    Spew,
}

/// Whether table output uses terminal colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Closed set of renderable resource kinds.
///
/// Every dispatcher wraps its result in one of these variants; the
/// formatter never sees a dynamically-typed value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Renderable {
    Build(Build),
    Builds(Vec<Build>),
    Hook(Hook),
    Hooks(Vec<Hook>),
    Step(Step),
    Steps(Vec<Step>),
    Log(Log),
    Logs(Vec<Log>),
    Dashboard(Dashboard),
    Dashboards(Vec<Dashboard>),
    Platform(Platform),
}

impl Renderable {
    /// Render to stdout in the requested format.
    pub fn render(&self, format: Format, color: ColorMode) -> Result<()> {
        match format {
            Format::Table => print!("{}", self.to_table(false, color.enabled())),
            Format::Wide => print!("{}", self.to_table(true, color.enabled())),
            Format::Json => println!("{}", serde_json::to_string_pretty(self)?),
            Format::Yaml => print!("{}", serde_yaml::to_string(self)?),
            Format::Dump => println!("{:?}", self.debug_inner()),
            Format::Spew => println!("{:#?}", self.debug_inner()),
        }
        Ok(())
    }

    fn debug_inner(&self) -> &dyn Debug {
        match self {
            Self::Build(v) => v,
            Self::Builds(v) => v,
            Self::Hook(v) => v,
            Self::Hooks(v) => v,
            Self::Step(v) => v,
            Self::Steps(v) => v,
            Self::Log(v) => v,
            Self::Logs(v) => v,
            Self::Dashboard(v) => v,
            Self::Dashboards(v) => v,
            Self::Platform(v) => v,
        }
    }

    /// Build the table/wide rendering as a string.
    pub fn to_table(&self, wide: bool, color: bool) -> String {
        match self {
            Self::Build(build) => builds_table(std::slice::from_ref(build), wide, color),
            Self::Builds(builds) => builds_table(builds, wide, color),
            Self::Hook(hook) => hooks_table(std::slice::from_ref(hook), wide, color),
            Self::Hooks(hooks) => hooks_table(hooks, wide, color),
            Self::Step(step) => steps_table(std::slice::from_ref(step), wide, color),
            Self::Steps(steps) => steps_table(steps, wide, color),
            Self::Log(log) => log_text(std::slice::from_ref(log)),
            Self::Logs(logs) => log_text(logs),
            Self::Dashboard(dashboard) => {
                dashboards_table(std::slice::from_ref(dashboard), wide, color)
            }
            Self::Dashboards(dashboards) => dashboards_table(dashboards, wide, color),
            Self::Platform(platform) => platform_table(platform, wide, color),
        }
    }
}

/// Render a duration column value.
///
/// In-flight builds have no wall-clock duration yet and render `"..."`.
pub fn duration(status: &str, started: i64, finished: i64) -> String {
    let parsed: Status = status.parse().unwrap_or(Status::Other(String::new()));
    if parsed.is_in_flight() || started == 0 || finished < started {
        return "...".to_string();
    }
    humanize_delta(finished - started)
}

fn humanize_delta(total: i64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{hours}h{minutes}m")
        } else {
            format!("{hours}h")
        }
    } else if minutes > 0 {
        if seconds > 0 {
            format!("{minutes}m{seconds}s")
        } else {
            format!("{minutes}m")
        }
    } else {
        format!("{seconds}s")
    }
}

/// Human-relative rendering of a unix timestamp ("2 hours ago").
fn relative(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(when) if timestamp > 0 => HumanTime::from(when).to_string(),
        _ => String::new(),
    }
}

fn short_commit(commit: &str) -> &str {
    if commit.len() > 8 { &commit[..8] } else { commit }
}

/// Rows sorted ascending by numeric identifier. Sorts a copy so the
/// caller's slice keeps its order.
fn sorted_by<T: Clone>(items: &[T], key: impl Fn(&T) -> i64) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.sort_by_key(|item| key(item));
    copy
}

fn builds_table(builds: &[Build], wide: bool, color: bool) -> String {
    let wrap = if wide { WIDE_WRAP } else { TABLE_WRAP };
    let headers: &[&str] = if wide {
        &["NUMBER", "STATUS", "EVENT", "BRANCH", "COMMIT", "AUTHOR", "DURATION", "CREATED"]
    } else {
        &["NUMBER", "STATUS", "EVENT", "BRANCH", "DURATION"]
    };

    let mut table = Table::new(headers, wrap, color);
    for build in sorted_by(builds, |b| b.number) {
        let mut cells = vec![
            Cell::new(build.number.to_string()),
            status_cell(&build.status),
            Cell::new(&build.event),
            Cell::new(&build.branch),
        ];
        if wide {
            cells.push(Cell::new(short_commit(&build.commit)));
            cells.push(Cell::new(&build.author));
        }
        cells.push(Cell::new(duration(&build.status, build.started, build.finished)));
        if wide {
            cells.push(Cell::new(relative(build.created)));
        }
        table.add_row(cells);
    }
    table.render()
}

fn hooks_table(hooks: &[Hook], wide: bool, color: bool) -> String {
    let wrap = if wide { WIDE_WRAP } else { TABLE_WRAP };
    let headers: &[&str] = if wide {
        &["NUMBER", "STATUS", "EVENT", "BRANCH", "SOURCE_ID", "HOST", "CREATED", "ERROR"]
    } else {
        &["NUMBER", "STATUS", "EVENT", "BRANCH"]
    };

    let mut table = Table::new(headers, wrap, color);
    for hook in sorted_by(hooks, |h| h.number) {
        let mut cells = vec![
            Cell::new(hook.number.to_string()),
            status_cell(&hook.status),
            Cell::new(&hook.event),
            Cell::new(&hook.branch),
        ];
        if wide {
            cells.push(Cell::new(&hook.source_id));
            cells.push(Cell::new(&hook.host));
            cells.push(Cell::new(relative(hook.created)));
            cells.push(Cell::new(&hook.error));
        }
        table.add_row(cells);
    }
    table.render()
}

fn steps_table(steps: &[Step], wide: bool, color: bool) -> String {
    let wrap = if wide { WIDE_WRAP } else { TABLE_WRAP };
    let headers: &[&str] = if wide {
        &["NUMBER", "NAME", "STATUS", "IMAGE", "STAGE", "DURATION", "CREATED"]
    } else {
        &["NUMBER", "NAME", "STATUS", "DURATION"]
    };

    let mut table = Table::new(headers, wrap, color);
    for step in sorted_by(steps, |s| s.number) {
        let mut cells = vec![
            Cell::new(step.number.to_string()),
            Cell::new(&step.name),
            status_cell(&step.status),
        ];
        if wide {
            cells.push(Cell::new(&step.image));
            cells.push(Cell::new(&step.stage));
        }
        cells.push(Cell::new(duration(&step.status, step.started, step.finished)));
        if wide {
            cells.push(Cell::new(relative(step.created)));
        }
        table.add_row(cells);
    }
    table.render()
}

/// Logs have no tabular form; table/wide print the captured text as-is.
fn log_text(logs: &[Log]) -> String {
    let mut out = String::new();
    for log in logs {
        out.push_str(&log.data);
        if !log.data.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn dashboards_table(dashboards: &[Dashboard], wide: bool, color: bool) -> String {
    let wrap = if wide { WIDE_WRAP } else { TABLE_WRAP };
    let headers: &[&str] = if wide {
        &["NAME", "ID", "REPOS", "ADMINS", "CREATED", "UPDATED"]
    } else {
        &["NAME", "ID", "REPOS", "ADMINS"]
    };

    let mut table = Table::new(headers, wrap, color);
    for dashboard in dashboards {
        let repos: Vec<&str> = dashboard.repos.iter().map(|r| r.name.as_str()).collect();
        let mut cells = vec![
            Cell::new(&dashboard.name),
            Cell::new(&dashboard.id),
            Cell::new(repos.join(", ")),
            Cell::new(dashboard.admins.join(", ")),
        ];
        if wide {
            cells.push(Cell::new(relative(dashboard.created_at)));
            cells.push(Cell::new(relative(dashboard.updated_at)));
        }
        table.add_row(cells);
    }
    table.render()
}

fn platform_table(platform: &Platform, _wide: bool, color: bool) -> String {
    let mut table = Table::new(&["FIELD", "VALUE"], WIDE_WRAP, color);
    table.add_row(vec![
        Cell::new("clone image"),
        Cell::new(&platform.compiler.clone_image),
    ]);
    table.add_row(vec![
        Cell::new("template depth"),
        Cell::new(platform.compiler.template_depth.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("starlark exec limit"),
        Cell::new(platform.compiler.starlark_exec_limit.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("queue routes"),
        Cell::new(platform.queue.routes.join(", ")),
    ]);
    table.add_row(vec![
        Cell::new("repo allowlist"),
        Cell::new(platform.repo_allowlist.join(", ")),
    ]);
    table.add_row(vec![
        Cell::new("schedule allowlist"),
        Cell::new(platform.schedule_allowlist.join(", ")),
    ]);
    table.render()
}
