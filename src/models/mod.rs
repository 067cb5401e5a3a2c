//! Request and Response models for the admin API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP query strings and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{PatternQuery, PerformanceQuery};
pub use responses::{
    format_bytes, format_percent, ClearResponse, EntriesResponse, EntryTtl, HealthResponse,
    InvalidateResponse, PerformanceResponse, StatsResponse,
};
