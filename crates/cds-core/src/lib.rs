//! # cds-core
//!
//! View-state machines for the clinical decision support client, and the
//! `ClinicalApi` trait they talk to.
//!
//! This crate provides:
//! - `ClinicalApi`, the async seam to the backend
//! - one state holder per page (`QueryFlow`, `DrugInteractionChecker`,
//!   `GuidelineExplorer`, `RepositoryExplorer`) and the navigation `Shell`
//! - the generation guard that keeps stale completions off screen
//! - pure presentation helpers in `present`
//!
//! Every flow splits a request into `begin_*` (validate, issue a ticket) and
//! `complete*` (apply if the ticket is current), so an event loop can run the
//! request on another task. Each flow also has an `async` method that does
//! both against a `&dyn ClinicalApi`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cds_core::{QueryFlow, traits::ClinicalApi};
//!
//! let mut flow = QueryFlow::default();
//! flow.form.query = "65-year-old male with chest pain".into();
//! let response = flow.submit(&api).await?;
//! ```

pub mod alerts;
pub mod generation;
pub mod guidelines;
pub mod interactions;
pub mod present;
pub mod query_flow;
pub mod repository;
pub mod shell;
pub mod traits;

#[cfg(test)]
mod mock;

pub use generation::{Completion, Generation, Slot, Ticket};
pub use guidelines::GuidelineExplorer;
pub use interactions::DrugInteractionChecker;
pub use query_flow::QueryFlow;
pub use repository::RepositoryExplorer;
pub use shell::Shell;
