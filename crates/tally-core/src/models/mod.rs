//! Data models for invoice rows and pipeline configuration.

pub mod config;
pub mod invoice;
