//! # cds-config
//!
//! Configuration for the clinical decision support client binaries.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use cds_config::ClientConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = ClientConfig::resolve(Some(Path::new("cds.toml")))?;
//! ```
//!
//! Resolution order: built-in defaults, then the TOML file, then
//! `CDS_API_URL` from the environment, then command-line flags applied by the
//! binary through `ClientConfig::with_base_url`.

pub mod config;

pub use config::{ClientConfig, API_URL_ENV, DEFAULT_BASE_URL};
