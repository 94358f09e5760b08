//! Unit tests for configuration loading and resolution.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, repository, count, and delay resolution tests
//! - `run_plan`: Run plan assembly and validation tests

mod helpers;
