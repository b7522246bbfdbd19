//! `seed-loader` loads seed data from delimited files into either a relational store or a GraphQL
//! service, with an optional destructive purge beforehand and a reconciliation pass afterwards.
//!
//! The primary entrypoint is [`pipeline::LoadPipeline`], which runs the connect, purge, load and
//! verify phases against any [`backend::BackendAdapter`].
//!
//! ## Seed files
//!
//! - Named `NN_<table>.csv`; the one- or two-digit prefix sets load order and is stripped to get
//!   the table name.
//! - First line is the header, matching backend column names.
//! - Fields are split on `,` with no quote handling; short rows are padded with empty fields.
//!
//! ## Value typing
//!
//! Each field is classified on its text alone ([`encoding::classify`]): empty → null, digits →
//! integer, `digits.digits` → float, `true`/`false` → boolean, `YYYY-MM-DD` → date,
//! `YYYY-MM-DD HH:MM:SS` → timestamp, anything else → string. Relational inserts write nulls as
//! `NULL`; graph inserts leave null fields out of the row object.
//!
//! ## Quick example
//!
//! ```no_run
//! use seed_loader::backend::connect;
//! use seed_loader::config::SeedConfig;
//! use seed_loader::ingestion::discover_source_files;
//! use seed_loader::pipeline::{LoadPipeline, TableScope};
//!
//! # fn main() -> Result<(), seed_loader::SeedError> {
//! seed_loader::logging::init(0);
//! let config = SeedConfig::load(Some("seed.toml".as_ref()))?;
//! let mut backend = connect(&config.connection()?)?;
//! let files = discover_source_files(&config.data_dir)?;
//!
//! let report = LoadPipeline::new(backend.as_mut(), files, config.pipeline_options(TableScope::All))
//!     .with_scheduler(config.scheduler())
//!     .run()?;
//! if let Some(recon) = &report.reconciliation {
//!     println!("{recon}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: seed file discovery and CSV reading
//! - [`encoding`]: value typing and backend literals
//! - [`backend`]: the backend trait and its relational/graph implementations
//! - [`purge`]: deletion ordering
//! - [`pipeline`]: phase orchestration and observers
//! - [`reconcile`]: source vs backend count comparison
//! - [`summary`]: per-run results and the summary artifact
//! - [`config`], [`logging`]: ambient setup
//! - [`error`]: the shared error type

pub mod backend;
pub mod config;
pub mod encoding;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod pipeline;
pub mod purge;
pub mod reconcile;
pub mod summary;
pub mod types;

pub use error::{SeedError, SeedResult, Severity};
