//! Config module tests
//!
//! - Profile parsing, loading from disk and applying to a registry
