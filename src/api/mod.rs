pub mod client;
pub mod types;

pub use client::{BuildListOpts, CiClient, PageOpts};
pub use types::{Build, Compiler, Dashboard, DashboardRepo, Hook, Log, Platform, Queue, Status, Step};
