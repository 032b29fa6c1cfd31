//! eventadmin: response review and tag configuration for an event backend

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod i18n;
pub mod models;
pub mod response_table;
pub mod tags;
pub mod tui;
