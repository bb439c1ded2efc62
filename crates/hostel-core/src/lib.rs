//! hostel-core - list/CRUD state management for the hostel admin dashboard.
//!
//! This crate provides the data layer behind the admin screens: REST
//! adapters for each resource, an in-memory list cache with client-side
//! search and pagination, the edit session state machine, a delete
//! confirmation gate and a single-slot alert channel. Rendering layers call
//! the `ResourceManager` handlers and re-display the state it exposes.
//!
//! ```no_run
//! use hostel_core::{Config, StudentInfoManager};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let api = config.api_client()?;
//! let mut students = StudentInfoManager::students(&api, &config);
//! students.mount().await;
//! students.set_search_text("ann");
//! students.search_settled().await;
//! println!("{} matching students", students.total_count());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod logging;
pub mod manager;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiResult, ResourceAdapter, RestAdapter, SaveOutcome};
pub use cache::{ListCache, ListOrder, ListQuery};
pub use config::Config;
pub use manager::{
    Alert, EditSession, ListOptions, NoticeManager, ResourceManager, RowClick, SessionMode,
    Severity, StudentInfoManager,
};
pub use models::{DashboardDetails, Notice, Record, RecordId, StudentInfo};
