//! Core library for sitegen
//!
//! This crate implements the **Functional Core** of the sitegen application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The sitegen project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`sitegen_core`** (this crate): Pure transformation functions with zero network or filesystem I/O
//! - **`sitegen`**: Model calls, the HTTP server, and file output (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: Archives are assembled in memory; writing them anywhere is the shell's job
//! - **Testable**: Everything here is exercised with fixture strings, no model required
//!
//! # Module Organization
//!
//! - [`bundle`]: Marker scanning and the multi-file codec (`extract_file`, `split_all`)
//! - [`archive`]: Zip packaging of a bundle and reading it back
//! - [`prompt`]: Prompt validation, the fixed system instruction, sampling options
//! - [`session`]: The value carried from a generation to its preview and download
//!
//! # Example Usage
//!
//! ```rust
//! use sitegen_core::bundle::{extract_file, split_all, MarkerMode};
//!
//! let text = "<!-- File: a.txt -->\nAAA\n\n<!-- File: b.txt -->\nBBB";
//!
//! let bundle = split_all(text, MarkerMode::Strict);
//! assert_eq!(bundle.len(), 2);
//! assert_eq!(extract_file(text, "a.txt", MarkerMode::Strict).as_deref(), Some("AAA"));
//! ```

pub mod archive;
pub mod bundle;
pub mod prompt;
pub mod session;
