//! Code generation building blocks.
//!
//! - [`CodeBuilder`] - Indentation-aware line buffer
//! - [`CodeFragment`] - Intermediate representation for code pieces
//! - [`Renderable`] - Trait for nodes that can be converted to fragments

mod code_builder;
mod renderable;

pub use code_builder::CodeBuilder;
pub use renderable::{CodeFragment, Renderable};
