//! Backend API access
//!
//! Pages talk to the backend only through the [`ResponseListService`] and
//! [`TagService`] traits; [`ApiClient`] implements both over HTTP.

pub mod client;
pub mod services;
pub mod types;

pub use client::ApiClient;
pub use services::{ResponseListService, TagService};
pub use types::{file_url, EventApi};
