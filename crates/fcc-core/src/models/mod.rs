//! Data models for extracted forms and pipeline configuration.

pub mod config;
pub mod record;
