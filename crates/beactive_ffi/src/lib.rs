//! Flutter-facing bridge for the BeActive core.

pub mod api;
