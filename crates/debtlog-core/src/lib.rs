#![forbid(unsafe_code)]
//! debtlog-core library.
//!
//! Scoring engine, in-memory entry store, and report aggregation for the
//! technical debt log. Everything here is synchronous and owned by a single
//! [`session::Session`]; nothing is persisted.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums with stable [`error::ErrorCode`]s; `anyhow::Result`
//!   for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod score;
pub mod session;
pub mod store;
pub mod summary;

pub use error::{AddError, DebtlogError, ErrorCode};
pub use id::EntryId;
pub use model::{BusinessRisk, Category, DebtEntry, DraftField, Effort, EntryDraft, Impact};
pub use score::{Priority, compute_priority};
pub use session::Session;
pub use store::{ItemStore, StoreState};
pub use summary::{Recommendation, Report, ReportSettings, Summary};
