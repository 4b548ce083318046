//! Test module for waypoint
//!
//! Contains property-based tests using proptest alongside async tests
//! validating the matching, chain-execution, and dispatch contracts.

#[cfg(test)]
pub mod pattern_tests;
