//! TypeScript emitters for tsmirror.
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, CodeFragment, etc.)
//! - [`ast`] - TypeScript declarations (type aliases, object types, constants, route stubs)
//! - [`file`] - Assembly of the namespace file
//! - [`generator`] - The [`Generator`] entry point

pub mod ast;
pub mod builder;
pub mod file;
pub mod generator;

pub use generator::{Generator, WriteResult};
