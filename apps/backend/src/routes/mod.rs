//! HTTP route handlers

pub mod review;
pub mod stats;
