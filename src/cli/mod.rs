//! clap surface: one subcommand per resource/verb pair.
//!
//! Identifying flags fall back to env vars (`CICTL_*`); numeric
//! identifiers may also be given as the first positional argument.

use clap::{Args, Parser, Subcommand};

use crate::command::{build, dashboard, hook, log, settings, step};
use crate::output::{ColorMode, Format};

#[derive(Parser)]
#[command(name = "cictl")]
#[command(author, version, about = "Command-line client for a CI server")]
pub struct Cli {
    /// CI server address
    #[arg(long, global = true, env = "CICTL_ADDR")]
    pub addr: Option<String>,

    /// API token
    #[arg(long, global = true, env = "CICTL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value_t = Format::Table,
        env = "CICTL_OUTPUT"
    )]
    pub output: Format,

    /// Color mode for table output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and manage builds
    #[command(subcommand)]
    Build(BuildCommand),

    /// Inspect webhook deliveries
    #[command(subcommand)]
    Hook(HookCommand),

    /// View build and step logs
    #[command(subcommand)]
    Log(LogCommand),

    /// Inspect build steps
    #[command(subcommand)]
    Step(StepCommand),

    /// Manage dashboards
    #[command(subcommand)]
    Dashboard(DashboardCommand),

    /// View and update platform settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Repository coordinates shared by repo-scoped commands.
#[derive(Args, Debug, Clone)]
pub struct RepoScope {
    /// Organization the repository belongs to
    #[arg(long, env = "CICTL_ORG")]
    pub org: Option<String>,

    /// Repository name
    #[arg(long, env = "CICTL_REPO")]
    pub repo: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct Pagination {
    /// Page of results to fetch
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Number of results per page
    #[arg(long, default_value_t = 10)]
    pub per_page: i64,
}

/// A resource number, accepted positionally or via `--number`.
#[derive(Args, Debug, Clone)]
pub struct NumberArg {
    /// Resource number
    #[arg(value_name = "NUMBER")]
    pub positional: Option<i64>,

    /// Resource number (flag form)
    #[arg(long = "number", short = 'n', conflicts_with = "positional")]
    pub flag: Option<i64>,
}

impl NumberArg {
    fn get(&self) -> i64 {
        self.flag.or(self.positional).unwrap_or(0)
    }
}

/// A dashboard identifier, accepted positionally or via `--id`.
#[derive(Args, Debug, Clone)]
pub struct IdArg {
    /// Dashboard id
    #[arg(value_name = "ID")]
    pub positional: Option<String>,

    /// Dashboard id (flag form)
    #[arg(long = "id", conflicts_with = "positional")]
    pub flag: Option<String>,
}

impl IdArg {
    fn get(&self) -> String {
        self.flag
            .clone()
            .or_else(|| self.positional.clone())
            .unwrap_or_default()
    }
}

#[derive(Subcommand)]
pub enum BuildCommand {
    /// List builds for a repository
    Get {
        #[command(flatten)]
        scope: RepoScope,
        #[command(flatten)]
        page: Pagination,
        /// Filter by event
        #[arg(long)]
        event: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by branch
        #[arg(long)]
        branch: Option<String>,
        /// Only builds created before this unix timestamp
        #[arg(long)]
        before: Option<i64>,
        /// Only builds created after this unix timestamp
        #[arg(long)]
        after: Option<i64>,
    },
    /// Show a single build
    View {
        #[command(flatten)]
        scope: RepoScope,
        #[command(flatten)]
        number: NumberArg,
    },
    /// Restart a build
    Restart {
        #[command(flatten)]
        scope: RepoScope,
        #[command(flatten)]
        number: NumberArg,
    },
    /// Cancel a running build
    Cancel {
        #[command(flatten)]
        scope: RepoScope,
        #[command(flatten)]
        number: NumberArg,
    },
    /// Approve a build awaiting approval
    Approve {
        #[command(flatten)]
        scope: RepoScope,
        #[command(flatten)]
        number: NumberArg,
    },
}

impl BuildCommand {
    pub fn into_config(self, output: Format, color: ColorMode) -> build::Config {
        let mut config = build::Config {
            action: build::Action::Get,
            org: String::new(),
            repo: String::new(),
            number: 0,
            event: None,
            status: None,
            branch: None,
            before: None,
            after: None,
            page: 1,
            per_page: 10,
            output,
            color,
        };

        match self {
            Self::Get {
                scope,
                page,
                event,
                status,
                branch,
                before,
                after,
            } => {
                config.org = scope.org.unwrap_or_default();
                config.repo = scope.repo.unwrap_or_default();
                config.page = page.page;
                config.per_page = page.per_page;
                config.event = event;
                config.status = status;
                config.branch = branch;
                config.before = before;
                config.after = after;
            }
            Self::View { scope, number } => {
                config.action = build::Action::View;
                config.org = scope.org.unwrap_or_default();
                config.repo = scope.repo.unwrap_or_default();
                config.number = number.get();
            }
            Self::Restart { scope, number } => {
                config.action = build::Action::Restart;
                config.org = scope.org.unwrap_or_default();
                config.repo = scope.repo.unwrap_or_default();
                config.number = number.get();
            }
            Self::Cancel { scope, number } => {
                config.action = build::Action::Cancel;
                config.org = scope.org.unwrap_or_default();
                config.repo = scope.repo.unwrap_or_default();
                config.number = number.get();
            }
            Self::Approve { scope, number } => {
                config.action = build::Action::Approve;
                config.org = scope.org.unwrap_or_default();
                config.repo = scope.repo.unwrap_or_default();
                config.number = number.get();
            }
        }

        config
    }
}

#[derive(Subcommand)]
pub enum HookCommand {
    /// List webhook deliveries for a repository
    Get {
        #[command(flatten)]
        scope: RepoScope,
        #[command(flatten)]
        page: Pagination,
    },
    /// Show a single webhook delivery
    View {
        #[command(flatten)]
        scope: RepoScope,
        #[command(flatten)]
        number: NumberArg,
    },
}

impl HookCommand {
    pub fn into_config(self, output: Format, color: ColorMode) -> hook::Config {
        match self {
            Self::Get { scope, page } => hook::Config {
                action: hook::Action::Get,
                org: scope.org.unwrap_or_default(),
                repo: scope.repo.unwrap_or_default(),
                number: 0,
                page: page.page,
                per_page: page.per_page,
                output,
                color,
            },
            Self::View { scope, number } => hook::Config {
                action: hook::Action::View,
                org: scope.org.unwrap_or_default(),
                repo: scope.repo.unwrap_or_default(),
                number: number.get(),
                page: 1,
                per_page: 10,
                output,
                color,
            },
        }
    }
}

#[derive(Subcommand)]
pub enum LogCommand {
    /// Show logs for a build, or one step with --step
    View {
        #[command(flatten)]
        scope: RepoScope,
        /// Build number
        #[arg(value_name = "BUILD")]
        positional: Option<i64>,
        /// Build number (flag form)
        #[arg(long, conflicts_with = "positional")]
        build: Option<i64>,
        /// Limit output to a single step
        #[arg(long)]
        step: Option<i64>,
    },
}

impl LogCommand {
    pub fn into_config(self, output: Format, color: ColorMode) -> log::Config {
        match self {
            Self::View {
                scope,
                positional,
                build,
                step,
            } => log::Config {
                action: log::Action::View,
                org: scope.org.unwrap_or_default(),
                repo: scope.repo.unwrap_or_default(),
                build: build.or(positional).unwrap_or(0),
                step,
                output,
                color,
            },
        }
    }
}

#[derive(Subcommand)]
pub enum StepCommand {
    /// List steps for a build
    Get {
        #[command(flatten)]
        scope: RepoScope,
        /// Build number
        #[arg(long)]
        build: Option<i64>,
        #[command(flatten)]
        page: Pagination,
    },
    /// Show a single step
    View {
        #[command(flatten)]
        scope: RepoScope,
        /// Build number
        #[arg(long)]
        build: Option<i64>,
        #[command(flatten)]
        number: NumberArg,
    },
}

impl StepCommand {
    pub fn into_config(self, output: Format, color: ColorMode) -> step::Config {
        match self {
            Self::Get { scope, build, page } => step::Config {
                action: step::Action::Get,
                org: scope.org.unwrap_or_default(),
                repo: scope.repo.unwrap_or_default(),
                build: build.unwrap_or(0),
                number: 0,
                page: page.page,
                per_page: page.per_page,
                output,
                color,
            },
            Self::View {
                scope,
                build,
                number,
            } => step::Config {
                action: step::Action::View,
                org: scope.org.unwrap_or_default(),
                repo: scope.repo.unwrap_or_default(),
                build: build.unwrap_or(0),
                number: number.get(),
                page: 1,
                per_page: 10,
                output,
                color,
            },
        }
    }
}

#[derive(Subcommand)]
pub enum DashboardCommand {
    /// Create a dashboard
    Add {
        /// Dashboard name
        #[arg(long)]
        name: Option<String>,
        /// Repositories to include (org/repo)
        #[arg(long = "repos", value_delimiter = ',')]
        repos: Vec<String>,
        /// Users with admin access
        #[arg(long = "admins", value_delimiter = ',')]
        admins: Vec<String>,
        /// Branch filter applied to the included repos
        #[arg(long = "branches", value_delimiter = ',')]
        branches: Vec<String>,
        /// Event filter applied to the included repos
        #[arg(long = "events", value_delimiter = ',')]
        events: Vec<String>,
    },
    /// List your dashboards
    Get,
    /// Show a single dashboard
    View {
        #[command(flatten)]
        id: IdArg,
    },
    /// Update a dashboard
    Update {
        #[command(flatten)]
        id: IdArg,
        /// Rename the dashboard
        #[arg(long)]
        name: Option<String>,
        /// Repositories to append
        #[arg(long = "add-repos", value_delimiter = ',')]
        add_repos: Vec<String>,
        /// Repositories to remove
        #[arg(long = "drop-repos", value_delimiter = ',')]
        drop_repos: Vec<String>,
        /// Admins to append
        #[arg(long = "add-admins", value_delimiter = ',')]
        add_admins: Vec<String>,
        /// Admins to remove
        #[arg(long = "drop-admins", value_delimiter = ',')]
        drop_admins: Vec<String>,
        /// Repositories whose filters are being replaced
        #[arg(long = "target-repos", value_delimiter = ',')]
        target_repos: Vec<String>,
        /// Replacement branch filter for the targeted repos
        #[arg(long = "branches", value_delimiter = ',')]
        branches: Vec<String>,
        /// Replacement event filter for the targeted repos
        #[arg(long = "events", value_delimiter = ',')]
        events: Vec<String>,
    },
}

impl DashboardCommand {
    pub fn into_config(self, output: Format, color: ColorMode) -> dashboard::Config {
        let mut config = dashboard::Config {
            output,
            color,
            ..dashboard::Config::default()
        };

        match self {
            Self::Add {
                name,
                repos,
                admins,
                branches,
                events,
            } => {
                config.action = dashboard::Action::Add;
                config.name = name.unwrap_or_default();
                config.add_repos = repos;
                config.add_admins = admins;
                config.branches = branches;
                config.events = events;
            }
            Self::Get => {
                config.action = dashboard::Action::Get;
            }
            Self::View { id } => {
                config.action = dashboard::Action::View;
                config.id = id.get();
            }
            Self::Update {
                id,
                name,
                add_repos,
                drop_repos,
                add_admins,
                drop_admins,
                target_repos,
                branches,
                events,
            } => {
                config.action = dashboard::Action::Update;
                config.id = id.get();
                config.name = name.unwrap_or_default();
                config.add_repos = add_repos;
                config.drop_repos = drop_repos;
                config.add_admins = add_admins;
                config.drop_admins = drop_admins;
                config.target_repos = target_repos;
                config.branches = branches;
                config.events = events;
            }
        }

        config
    }
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show the platform settings
    View,
    /// Update the platform settings
    Update {
        /// Compiler clone image
        #[arg(long)]
        clone_image: Option<String>,
        /// Compiler template depth
        #[arg(long)]
        template_depth: Option<i64>,
        /// Compiler starlark exec limit
        #[arg(long)]
        starlark_exec_limit: Option<i64>,
        /// Queue routes to append
        #[arg(long = "add-route", value_delimiter = ',')]
        add_routes: Vec<String>,
        /// Queue routes to remove
        #[arg(long = "drop-route", value_delimiter = ',')]
        drop_routes: Vec<String>,
        /// Repo allowlist entries to append
        #[arg(long = "add-repo", value_delimiter = ',')]
        add_repos: Vec<String>,
        /// Repo allowlist entries to remove
        #[arg(long = "drop-repo", value_delimiter = ',')]
        drop_repos: Vec<String>,
        /// Schedule allowlist entries to append
        #[arg(long = "add-schedule", value_delimiter = ',')]
        add_schedules: Vec<String>,
        /// Schedule allowlist entries to remove
        #[arg(long = "drop-schedule", value_delimiter = ',')]
        drop_schedules: Vec<String>,
    },
}

impl SettingsCommand {
    pub fn into_config(self, output: Format, color: ColorMode) -> settings::Config {
        match self {
            Self::View => settings::Config {
                action: settings::Action::View,
                clone_image: None,
                template_depth: None,
                starlark_exec_limit: None,
                add_routes: Vec::new(),
                drop_routes: Vec::new(),
                add_repos: Vec::new(),
                drop_repos: Vec::new(),
                add_schedules: Vec::new(),
                drop_schedules: Vec::new(),
                output,
                color,
            },
            Self::Update {
                clone_image,
                template_depth,
                starlark_exec_limit,
                add_routes,
                drop_routes,
                add_repos,
                drop_repos,
                add_schedules,
                drop_schedules,
            } => settings::Config {
                action: settings::Action::Update,
                clone_image,
                template_depth,
                starlark_exec_limit,
                add_routes,
                drop_routes,
                add_repos,
                drop_repos,
                add_schedules,
                drop_schedules,
                output,
                color,
            },
        }
    }
}
