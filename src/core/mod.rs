// src/core/mod.rs

//! # Configuration Resolution Layer
//!
//! Merges explicit values, string-keyed property overrides and static defaults
//! into typed, lazily-resolved configuration cells.
//!
//! - **`properties`**: the immutable override store, loaded from `helmw.toml` and `-P` flags.
//! - **`interpolator`**: shell-style expansion of override strings.
//! - **`cell`**: a single typed cell and its resolution order.
//! - **`project`**: project root, build dir and the property store.
//! - **`extension`**: `HelmExtension`, the object owning every Helm cell.

pub mod cell;
pub mod error;
pub mod extension;
pub mod interpolator;
pub mod paths;
pub mod project;
pub mod properties;
