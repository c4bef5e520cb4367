//! Boundary to the external code-minifying service. The service works on
//! complete compilation units, so a bare fragment has to be wrapped in a
//! synthetic class declaration before the call and unwrapped afterwards.

use std::io::Write;
use std::process::Command;
use std::process::Stdio;

use crate::ScrubError;
use crate::ScrubResult;

/// Envelope the service needs around a fragment so it does not discard
/// top-level-looking content as meaningless. `public` keeps the class name
/// itself from being compressed away.
const WRAP_PREFIX: &str = "public class Program {";
const WRAP_SUFFIX: &str = "\n}";

/// Environment variable carrying the configured line length to the external
/// command.
pub const LINE_LENGTH_ENV: &str = "SCRUB_MINIFY_LINE_LENGTH";

/// The external minification service, abstracted so tests can substitute a
/// fake. Implementations receive the already-wrapped source and return the
/// service's raw output.
pub trait MinifyBackend {
	fn run(&self, wrapped: &str, line_length: u32) -> ScrubResult<String>;
}

/// Runs a configured shell command as the minification service. The wrapped
/// source is fed on stdin, the minified result is read from stdout, and the
/// line length is exported as [`LINE_LENGTH_ENV`].
pub struct CommandBackend {
	command: String,
}

impl CommandBackend {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
		}
	}
}

impl MinifyBackend for CommandBackend {
	fn run(&self, wrapped: &str, line_length: u32) -> ScrubResult<String> {
		let command = self.command.trim();
		if command.is_empty() {
			return Err(ScrubError::Minification {
				reason: "no minify command configured (set `minify_command` in scrub.toml)"
					.to_string(),
			});
		}

		let mut child = if cfg!(windows) {
			Command::new("cmd")
				.arg("/C")
				.arg(command)
				.env(LINE_LENGTH_ENV, line_length.to_string())
				.stdin(Stdio::piped())
				.stdout(Stdio::piped())
				.stderr(Stdio::piped())
				.spawn()
		} else {
			Command::new("sh")
				.arg("-c")
				.arg(command)
				.env(LINE_LENGTH_ENV, line_length.to_string())
				.stdin(Stdio::piped())
				.stdout(Stdio::piped())
				.stderr(Stdio::piped())
				.spawn()
		}
		.map_err(|e| ScrubError::Minification {
			reason: format!("failed to start `{command}`: {e}"),
		})?;

		if let Some(stdin) = child.stdin.as_mut() {
			stdin
				.write_all(wrapped.as_bytes())
				.map_err(|e| ScrubError::Minification {
					reason: format!("failed to write source to `{command}`: {e}"),
				})?;
		}

		let output = child.wait_with_output().map_err(|e| ScrubError::Minification {
			reason: format!("failed to run `{command}`: {e}"),
		})?;

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
			let reason = if stderr.is_empty() {
				format!(
					"command exited with status {}",
					output
						.status
						.code()
						.map_or_else(|| "unknown".to_string(), |code| code.to_string())
				)
			} else {
				stderr
			};

			return Err(ScrubError::Minification { reason });
		}

		Ok(String::from_utf8_lossy(&output.stdout).to_string())
	}
}

/// Wraps and unwraps fragments around a [`MinifyBackend`] invocation. One
/// immutable adapter value is constructed per run and shared by every file's
/// transform.
pub struct MinifierAdapter {
	backend: Box<dyn MinifyBackend>,
	line_length: u32,
}

impl MinifierAdapter {
	pub fn new(backend: Box<dyn MinifyBackend>, line_length: u32) -> Self {
		Self {
			backend,
			line_length,
		}
	}

	/// Minify one code fragment standalone. Service failures surface as
	/// [`ScrubError::Minification`]; an output that no longer carries the
	/// envelope is a broken service contract and is reported the same way.
	pub fn minify(&self, fragment: &str) -> ScrubResult<String> {
		let wrapped = format!("{WRAP_PREFIX}{fragment}{WRAP_SUFFIX}");
		let minified = self.backend.run(&wrapped, self.line_length)?;
		let minified = normalized(&minified);

		match unwrap_envelope(&minified) {
			Some(inner) => Ok(inner.to_string()),
			None => Err(ScrubError::Minification {
				reason: "minifier output did not preserve the wrapping declaration".to_string(),
			}),
		}
	}
}

fn normalized(output: &str) -> String {
	if output.contains('\r') {
		output.replace('\r', "")
	} else {
		output.to_string()
	}
}

/// Structural match against the known envelope shape: the class header with
/// or without a space before the brace, and the trailing closing brace.
fn unwrap_envelope(output: &str) -> Option<&str> {
	let rest = output
		.strip_prefix("public class Program {")
		.or_else(|| output.strip_prefix("public class Program{"))?;
	rest.trim_end().strip_suffix('}')
}
