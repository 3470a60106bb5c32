//! Test preprocessor for judged programs.
//!
//! Reads a test directory (a `meta.json` describing a binary structure of
//! rooms plus annotated test files) and writes the judge input file and the
//! expected-output file.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
