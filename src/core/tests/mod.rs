//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Group evaluation (disambiguation, graceful release, hold, analog)
//! - Registration, conflicts and transactional bulk loads
//! - Conflict reporting
//! - Registry and client/group management
//! - Combo string and input script parsing

#[cfg(test)]
mod support;

#[cfg(test)]
mod load_tests;
#[cfg(test)]
mod registration_tests;
