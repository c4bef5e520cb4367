//! `scrub_core` is the core library for the `scrub` source scrubber. It
//! rewrites C-family source text: comments are stripped and whitespace and
//! newlines collapsed under a configurable policy, while specially tagged
//! block comments delimit custom regions that are captured and replaced by
//! pluggable handlers (deletion, or delegation to an external minifier).
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source file
//!   → normalize_line_endings (strip carriage returns)
//!   → Scanner (per-character lexical modes: code / string / comment / capture)
//!   → BlockHandler dispatch (delete, minify via the external adapter)
//!   → rewritten text (trimmed) → output directory
//! ```
//!
//! ## Modules
//!
//! - [`config`] — `scrub.toml` loading, generation, and tolerant per-key
//!   parsing.
//! - [`engine`] — the single-pass scan/transform state machine and its
//!   [`TransformPolicy`].
//! - [`handlers`] — the [`BlockHandler`] capability and the built-in delete
//!   and minify handlers.
//! - [`minify`] — the boundary to the external minification service.
//! - [`batch`] — directory enumeration and per-file error recovery.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use scrub_core::BatchOptions;
//! use scrub_core::CommandBackend;
//! use scrub_core::HandlerRegistry;
//! use scrub_core::MinifierAdapter;
//! use scrub_core::Settings;
//! use scrub_core::process_directory;
//!
//! let root = Path::new(".");
//! let settings = Settings::load_or_init(&root.join(scrub_core::SETTINGS_FILE_NAME)).unwrap();
//! let adapter = MinifierAdapter::new(
//! 	Box::new(CommandBackend::new(settings.minify_command.clone())),
//! 	settings.minify_line_length,
//! );
//! let registry = HandlerRegistry::with_builtins(adapter);
//! let report = process_directory(&BatchOptions::from_settings(&settings, root), &registry).unwrap();
//! eprintln!("{} file(s) written", report.written.len());
//! ```

pub use batch::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use handlers::*;
pub use minify::*;

pub mod batch;
pub mod config;
mod engine;
mod error;
pub mod handlers;
pub mod minify;
