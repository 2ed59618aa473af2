//! Unit tests module
//!
//! Contains unit tests for individual public functions.

mod parameter_extraction_tests;
mod path_normalization_tests;
mod slug_tests;
