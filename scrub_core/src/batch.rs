//! Batch processing: walk the input directory, run every candidate file
//! through the engine, and keep going when a single file fails.

use std::path::Path;
use std::path::PathBuf;

use crate::ScrubError;
use crate::ScrubResult;
use crate::config::Settings;
use crate::engine::TransformPolicy;
use crate::engine::normalize_line_endings;
use crate::engine::transform;
use crate::handlers::HandlerRegistry;

/// Extension of the files picked up from the input directory.
pub const SOURCE_EXTENSION: &str = "cs";

/// Options for one batch run, extracted from [`Settings`] with paths
/// resolved against a root directory.
#[derive(Debug, Clone)]
pub struct BatchOptions {
	/// Directory the source files are read from.
	pub input_dir: PathBuf,
	/// Directory the rewritten files are written to, created on demand.
	pub output_dir: PathBuf,
	/// File names skipped during collection (exact match).
	pub ignore_files: Vec<String>,
	/// Formatting policy applied to every file.
	pub policy: TransformPolicy,
}

impl BatchOptions {
	/// Construct [`BatchOptions`] from loaded settings, resolving relative
	/// paths against `root`.
	pub fn from_settings(settings: &Settings, root: &Path) -> Self {
		Self {
			input_dir: root.join(&settings.path_files_in),
			output_dir: root.join(&settings.path_files_out),
			ignore_files: settings.ignore_files.clone(),
			policy: settings.policy(),
		}
	}
}

/// A file whose transform failed. The batch records it and moves on.
#[derive(Debug)]
pub struct FileFailure {
	/// Path of the input file that failed.
	pub file: PathBuf,
	pub error: ScrubError,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
	/// Output paths written, in processing order.
	pub written: Vec<PathBuf>,
	/// Per-file failures, in processing order.
	pub failures: Vec<FileFailure>,
}

impl BatchReport {
	/// Returns true when every discovered file was transformed and written.
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}

	/// Number of files the batch attempted.
	pub fn attempted(&self) -> usize {
		self.written.len() + self.failures.len()
	}
}

/// Enumerate candidate files: direct children of `input_dir` with the
/// source extension whose file name is not on the ignore list. Sorted for
/// deterministic processing order.
pub fn collect_source_files(input_dir: &Path, ignore_files: &[String]) -> ScrubResult<Vec<PathBuf>> {
	if !input_dir.is_dir() {
		return Err(ScrubError::MissingInputDir(input_dir.to_path_buf()));
	}

	let mut files = Vec::new();
	for entry in std::fs::read_dir(input_dir)? {
		let path = entry?.path();
		if !path.is_file() {
			continue;
		}

		let has_extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| ext == SOURCE_EXTENSION);
		if !has_extension {
			continue;
		}

		let ignored = path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(|name| ignore_files.iter().any(|ignore| ignore == name));
		if ignored {
			tracing::debug!(file = %path.display(), "skipping ignored file");
			continue;
		}

		files.push(path);
	}

	files.sort();
	Ok(files)
}

/// Process every candidate file under `options`, writing each transformed
/// file to the output directory under its own name.
///
/// A failing file (a custom-block handler error, or an unreadable file) is
/// recorded in the report and does not stop the batch; nothing is written
/// for it. Only a missing input directory or an uncreatable output
/// directory aborts the run.
pub fn process_directory(
	options: &BatchOptions,
	registry: &HandlerRegistry,
) -> ScrubResult<BatchReport> {
	let files = collect_source_files(&options.input_dir, &options.ignore_files)?;
	process_files(&files, options, registry)
}

/// Process an already-collected list of files. Used by callers that want to
/// report the file list before processing starts.
pub fn process_files(
	files: &[PathBuf],
	options: &BatchOptions,
	registry: &HandlerRegistry,
) -> ScrubResult<BatchReport> {
	std::fs::create_dir_all(&options.output_dir)?;

	let mut report = BatchReport::default();
	for file in files {
		match process_file(file, &options.output_dir, &options.policy, registry) {
			Ok(dest) => {
				tracing::debug!(file = %file.display(), dest = %dest.display(), "file processed");
				report.written.push(dest);
			}
			Err(error) => {
				tracing::warn!(file = %file.display(), %error, "failed to process file");
				report.failures.push(FileFailure {
					file: file.clone(),
					error,
				});
			}
		}
	}

	Ok(report)
}

fn process_file(
	file: &Path,
	output_dir: &Path,
	policy: &TransformPolicy,
	registry: &HandlerRegistry,
) -> ScrubResult<PathBuf> {
	let raw = std::fs::read_to_string(file)?;
	let content = normalize_line_endings(&raw);
	let output = transform(&content, policy, registry)?;

	let Some(name) = file.file_name() else {
		// collect_source_files only yields paths with a final component.
		return Err(ScrubError::Io(std::io::Error::other(
			"source path has no file name",
		)));
	};
	let dest = output_dir.join(name);
	std::fs::write(&dest, output)?;
	Ok(dest)
}
