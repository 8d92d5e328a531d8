//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate data-source queries into store updates.
//! - Keep UI/FFI layers decoupled from aggregation details.

pub mod dashboard_service;
