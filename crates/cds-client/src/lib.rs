//! # cds-client
//!
//! The HTTP implementation of [`ClinicalApi`](cds_core::traits::ClinicalApi).
//!
//! ```rust,ignore
//! use cds_client::HttpClinicalApi;
//!
//! let api = HttpClinicalApi::from_config(&config)?;
//! let status = api.health().await?;
//! ```

pub mod http;

pub use http::{HttpClinicalApi, REQUEST_ID_HEADER};
