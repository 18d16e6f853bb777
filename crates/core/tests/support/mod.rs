//! Shared test helpers for `aep-core` integration tests.
//!
//! These helpers provide a scripted platform API and a recording sleeper so
//! that service tests can focus on request sequences instead of HTTP.

#![allow(dead_code)]

pub mod platform;
pub mod sleeper;
