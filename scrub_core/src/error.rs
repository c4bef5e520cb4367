use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ScrubError {
	#[error(transparent)]
	#[diagnostic(code(scrub::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse settings file: {0}")]
	#[diagnostic(
		code(scrub::config_parse),
		help("check that scrub.toml is valid TOML, or delete it to regenerate the defaults")
	)]
	ConfigParse(String),

	#[error("input directory `{}` not found", .0.display())]
	#[diagnostic(
		code(scrub::missing_input_dir),
		help("set `path_files_in` in scrub.toml to an existing directory (relative paths allowed)")
	)]
	MissingInputDir(PathBuf),

	#[error("minification failed: {reason}")]
	#[diagnostic(
		code(scrub::minification),
		help(
			"the external minifier rejected the fragment; check `minify_command` in scrub.toml and \
			 make sure the command reads source from stdin and writes the result to stdout"
		)
	)]
	Minification { reason: String },

	#[error("custom block `{tag}` failed to process")]
	#[diagnostic(code(scrub::custom_block))]
	CustomBlock {
		tag: String,
		#[source]
		source: Box<ScrubError>,
	},
}

pub type ScrubResult<T> = Result<T, ScrubError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
