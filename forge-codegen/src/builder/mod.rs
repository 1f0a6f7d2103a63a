//! Code generation building blocks.
//!
//! This module provides the core primitives for generating code:
//! - [`CodeBuilder`] - Fluent API for building indented code
//! - [`CodeFragment`] - Intermediate representation for code pieces
//! - [`Renderable`] - Trait for types that can be converted to code fragments
//! - [`MethodChain`] - `->call()` chains used by migrations and Filament
//! - [`Indent`] - Indentation configuration

mod chain;
mod code_builder;
mod indent;
mod renderable;

pub use chain::MethodChain;
pub use code_builder::CodeBuilder;
pub use indent::Indent;
pub use renderable::{CodeFragment, Renderable};
