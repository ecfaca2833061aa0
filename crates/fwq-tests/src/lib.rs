//! Integration tests for the firmware query planner
//!
//! This crate contains end-to-end tests that exercise the full stack:
//! - database files loaded from disk
//! - query plan derivation (requests, batches, ECU lookup)
//! - the runner driving a mock transport
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fwq-tests
//! ```
//!
//! # Test Structure
//!
//! - `plan_e2e_test.rs` - Database loading and plan derivation
//! - `runner_e2e_test.rs` - Runner against the mock transport

// This crate only contains tests, no library code
