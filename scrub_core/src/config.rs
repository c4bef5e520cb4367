//! Settings loading and generation for `scrub.toml`.
//!
//! Loading is deliberately forgiving: a missing file is generated from
//! defaults, an unparseable file is regenerated from defaults, and a single
//! bad value is skipped with a warning while the default is kept. Only I/O
//! failures propagate.

use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::ScrubError;
use crate::ScrubResult;
use crate::engine::TransformPolicy;

/// Name of the persisted settings file, looked up in the project root.
pub const SETTINGS_FILE_NAME: &str = "scrub.toml";

/// Persisted tool settings.
///
/// ```toml
/// path_files_in = "Scripts"
/// path_files_out = "Scripts/out"
/// ignore_files = ["BaseProgram.cs"]
/// remove_multiline_comments = true
/// remove_newlines = false
/// remove_singleline_comments = true
/// remove_whitespace = true
/// minify_line_length = 0
/// minify_command = ""
/// ```
#[derive(Debug, Clone, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Settings {
	/// Directory the source files are read from.
	pub path_files_in: PathBuf,
	/// Directory the rewritten files are written to. Defaults to `out`
	/// under `path_files_in` unless set explicitly.
	pub path_files_out: PathBuf,
	/// File names (exact match, no patterns) to skip while scanning.
	pub ignore_files: Vec<String>,
	pub remove_multiline_comments: bool,
	pub remove_newlines: bool,
	pub remove_singleline_comments: bool,
	pub remove_whitespace: bool,
	/// Line length passed to the external minifier. `0` leaves the
	/// service's own default in place.
	pub minify_line_length: u32,
	/// Shell command invoked as the external minifier. Empty means not
	/// configured; minify blocks then fail per file with a clear reason.
	pub minify_command: String,
}

impl Default for Settings {
	fn default() -> Self {
		let path_files_in = PathBuf::from("Scripts");
		let path_files_out = path_files_in.join("out");

		Self {
			path_files_in,
			path_files_out,
			ignore_files: vec!["BaseProgram.cs".to_string()],
			remove_multiline_comments: true,
			remove_newlines: false,
			remove_singleline_comments: true,
			remove_whitespace: true,
			minify_line_length: 0,
			minify_command: String::new(),
		}
	}
}

impl Settings {
	/// Load settings from `path`, generating a default file when it is
	/// missing and regenerating one when it cannot be parsed at all.
	pub fn load_or_init(path: &Path) -> ScrubResult<Self> {
		if !path.is_file() {
			tracing::info!(path = %path.display(), "no settings file found, generating defaults");
			return Self::generate(path);
		}

		let content = std::fs::read_to_string(path)?;
		match Self::parse(&content) {
			Ok(settings) => Ok(settings),
			Err(error) => {
				tracing::warn!(%error, "failed to load settings, regenerating defaults");
				Self::generate(path)
			}
		}
	}

	/// Write a settings file populated with defaults and return them.
	pub fn generate(path: &Path) -> ScrubResult<Self> {
		let settings = Self::default();
		let content = toml::to_string_pretty(&settings)
			.map_err(|e| ScrubError::ConfigParse(e.to_string()))?;
		std::fs::write(path, content)?;
		Ok(settings)
	}

	/// Parse settings from TOML text. The document itself must parse; each
	/// recognized key is then applied individually, and a key that is
	/// unknown, mistyped, or empty is skipped with a warning while the
	/// default value is retained.
	pub fn parse(content: &str) -> ScrubResult<Self> {
		let value: toml::Value = toml::from_str(content)
			.map_err(|e: toml::de::Error| ScrubError::ConfigParse(e.to_string()))?;
		let Some(table) = value.as_table() else {
			return Err(ScrubError::ConfigParse(
				"expected a table of settings".to_string(),
			));
		};

		let mut settings = Self::default();
		let mut out_path_set = false;

		for (key, value) in table {
			match key.as_str() {
				"path_files_in" => {
					if let Some(path) = non_empty_str(value) {
						settings.path_files_in = PathBuf::from(path);
					} else {
						skip_expected(key, "a non-empty string");
					}
				}
				"path_files_out" => {
					if let Some(path) = non_empty_str(value) {
						settings.path_files_out = PathBuf::from(path);
						out_path_set = true;
					} else {
						skip_expected(key, "a non-empty string");
					}
				}
				"ignore_files" => {
					if let Some(items) = value.as_array() {
						settings.ignore_files = items
							.iter()
							.filter_map(|item| {
								let name = non_empty_str(item);
								if name.is_none() {
									skip_expected("ignore_files entry", "a non-empty string");
								}
								name.map(str::to_string)
							})
							.collect();
					} else {
						skip_expected(key, "an array of file names");
					}
				}
				"remove_multiline_comments" => {
					apply_bool(key, value, &mut settings.remove_multiline_comments);
				}
				"remove_newlines" => {
					apply_bool(key, value, &mut settings.remove_newlines);
				}
				"remove_singleline_comments" => {
					apply_bool(key, value, &mut settings.remove_singleline_comments);
				}
				"remove_whitespace" => {
					apply_bool(key, value, &mut settings.remove_whitespace);
				}
				"minify_line_length" => {
					match value.as_integer().and_then(|n| u32::try_from(n).ok()) {
						Some(length) => settings.minify_line_length = length,
						None => skip_expected(key, "a non-negative integer"),
					}
				}
				"minify_command" => {
					if let Some(command) = value.as_str() {
						settings.minify_command = command.to_string();
					} else {
						skip_expected(key, "a string");
					}
				}
				unknown => {
					tracing::warn!("skipping unknown setting `{unknown}`");
				}
			}
		}

		// The output directory shadows the input directory unless it was
		// configured on its own.
		if !out_path_set {
			settings.path_files_out = settings.path_files_in.join("out");
		}

		Ok(settings)
	}

	/// The engine policy slice of these settings.
	pub fn policy(&self) -> TransformPolicy {
		TransformPolicy {
			remove_single_line_comments: self.remove_singleline_comments,
			remove_multi_line_comments: self.remove_multiline_comments,
			remove_whitespace: self.remove_whitespace,
			remove_newlines: self.remove_newlines,
		}
	}

	/// Key/value pairs for echoing the resolved configuration, in the order
	/// the keys appear in the settings file.
	pub fn summary(&self) -> Vec<(&'static str, String)> {
		vec![
			("path_files_in", self.path_files_in.display().to_string()),
			("path_files_out", self.path_files_out.display().to_string()),
			("ignore_files", self.ignore_files.join(",")),
			(
				"remove_multiline_comments",
				self.remove_multiline_comments.to_string(),
			),
			("remove_newlines", self.remove_newlines.to_string()),
			(
				"remove_singleline_comments",
				self.remove_singleline_comments.to_string(),
			),
			("remove_whitespace", self.remove_whitespace.to_string()),
			("minify_line_length", self.minify_line_length.to_string()),
			("minify_command", self.minify_command.clone()),
		]
	}
}

fn non_empty_str(value: &toml::Value) -> Option<&str> {
	value.as_str().filter(|s| !s.trim().is_empty())
}

fn apply_bool(key: &str, value: &toml::Value, slot: &mut bool) {
	match value.as_bool() {
		Some(flag) => *slot = flag,
		None => skip_expected(key, "a boolean"),
	}
}

fn skip_expected(key: &str, expected: &str) {
	tracing::warn!("skipping `{key}`: expected {expected}");
}
