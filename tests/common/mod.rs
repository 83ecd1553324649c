//! Common test utilities for all integration tests.
//!
//! Provides in-memory mesh collaborators for driving the generators.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

pub mod mesh;
