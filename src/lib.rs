//! Biodigester dashboard and report export service.
//!
//! Indicator rows are read from Postgres, aggregated over fixed periods,
//! formatted with Brazilian Portuguese conventions and served as dashboard
//! JSON, a server-sent snapshot stream, or PDF/CSV/XLSX report files.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod periods;
pub mod repositories;
pub mod services;
