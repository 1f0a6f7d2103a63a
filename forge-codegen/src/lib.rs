//! Shared code generation utilities for the modforge module generator.
//!
//! This crate provides target-agnostic abstractions and utilities
//! used by target generators (e.g., `modforge-codegen-laravel`).
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, MethodChain, etc.)
//! - [`pipeline`] - Compilation pipeline (validate, lower, analyze) with lints and plugins
//! - [`schema`] - Analysis computed from the IR and schema display
//! - [`generation`] - Output management (FileRegistry, FileEntry, etc.)
//! - [`language`] - Target abstractions (LanguageCodegen, TypeMapper, etc.)

pub mod builder;
pub mod generation;
pub mod language;
pub mod pipeline;
pub mod schema;
