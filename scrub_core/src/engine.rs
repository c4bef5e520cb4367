//! The scan/transform engine: a single left-to-right pass over one file's
//! text that strips comments, collapses whitespace, and captures custom
//! blocks, all without ever tokenizing the language proper. The scanner only
//! tracks lexical mode (code vs. string vs. comment vs. custom-block
//! capture), which is enough to rewrite the text safely.

use crate::ScrubError;
use crate::ScrubResult;
use crate::handlers::HandlerRegistry;

/// Formatting policy applied while rewriting a single file. Immutable for
/// the duration of one [`transform`] call.
#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
pub struct TransformPolicy {
	/// Drop `//` comments instead of copying them through.
	pub remove_single_line_comments: bool,
	/// Drop `/* */` comments instead of copying them through.
	pub remove_multi_line_comments: bool,
	/// Collapse runs of non-newline whitespace to a single separator.
	pub remove_whitespace: bool,
	/// Rewrite newlines to spaces. Downgraded newlines take part in
	/// whitespace collapsing like any other space.
	pub remove_newlines: bool,
}

impl Default for TransformPolicy {
	fn default() -> Self {
		Self {
			remove_single_line_comments: true,
			remove_multi_line_comments: true,
			remove_whitespace: true,
			remove_newlines: false,
		}
	}
}

/// Normalize line endings by removing every carriage return, so the scanner
/// only ever sees `\n`.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace('\r', "")
	} else {
		content.to_string()
	}
}

/// Rewrite `source` under `policy`, dispatching recognized custom blocks to
/// the handlers in `registry`.
///
/// The scan is total over any character sequence: malformed input (a file
/// ending mid-string, mid-comment, or with a custom block never closed) is
/// not an error, and whatever accumulated in the open buffers is silently
/// discarded. The only failure path is a custom-block handler refusing its
/// captured text, in which case the whole file's output is abandoned and the
/// handler's error is returned wrapped in [`ScrubError::CustomBlock`].
pub fn transform(
	source: &str,
	policy: &TransformPolicy,
	registry: &HandlerRegistry,
) -> ScrubResult<String> {
	let mut scanner = Scanner::new(policy, registry);

	for ch in source.chars() {
		scanner.step(ch)?;
	}

	Ok(scanner.finish())
}

/// The mutually exclusive lexical mode of the scanner. String literals are a
/// separate, orthogonal sub-state ([`StringState`]) because a string can only
/// open from code but must keep the custom-block capture routing intact.
#[derive(Clone, Copy)]
enum Mode {
	/// Plain code between comments.
	Code,
	/// Inside a `//` comment, until the next newline.
	LineComment,
	/// Inside a `/* */` comment. `armed` is set after a `*` that may be the
	/// first half of the closing `*/`. Starting unarmed is what keeps `/*/`
	/// open: the `*` of the opener can never double as the closer.
	BlockComment { armed: bool },
}

/// String-literal sub-state, evaluated before comment scanning.
#[derive(Clone, Copy)]
enum StringState {
	None,
	/// Inside a plain `"..."` literal. `escaped` suppresses the closing-quote
	/// test for exactly one character, giving the even/odd backslash parity
	/// rule (`\"` stays inside, `\\"` closes).
	Normal { escaped: bool },
	/// Inside a verbatim `@"..."` literal. `closing` is set after a `"` that
	/// either ends the literal or doubles into a literal quote.
	Raw { closing: bool },
}

struct Scanner<'a> {
	policy: &'a TransformPolicy,
	registry: &'a HandlerRegistry,
	mode: Mode,
	string: StringState,
	/// A `/` was seen in code; whether it opens a comment is decided by the
	/// next character. This one-character deferral is what makes `/**//`
	/// parse as "open, immediately close, trailing slash" instead of a
	/// malformed construct.
	pending_slash: bool,
	/// The previous character of the raw input, for `@"` detection.
	prev: char,
	/// Whether the scanner is inside a collapsible whitespace run.
	in_whitespace: bool,
	/// Content of the comment currently being scanned: without delimiters
	/// for block comments, with the leading `//` for line comments.
	comment_buf: String,
	/// Index into the registry of the active custom-block handler.
	active_block: Option<usize>,
	/// Raw text captured inside the active custom block, handed to the
	/// handler when its close tag is seen.
	block_buf: String,
	out: String,
}

impl<'a> Scanner<'a> {
	fn new(policy: &'a TransformPolicy, registry: &'a HandlerRegistry) -> Self {
		Self {
			policy,
			registry,
			mode: Mode::Code,
			string: StringState::None,
			pending_slash: false,
			prev: '\0',
			in_whitespace: false,
			comment_buf: String::new(),
			active_block: None,
			block_buf: String::new(),
			out: String::new(),
		}
	}

	fn step(&mut self, ch: char) -> ScrubResult<()> {
		if matches!(self.string, StringState::None) {
			match self.mode {
				Mode::Code => self.code_char(ch)?,
				Mode::LineComment => self.line_comment_char(ch),
				Mode::BlockComment { .. } => self.block_comment_char(ch)?,
			}
		} else {
			self.string_char(ch)?;
		}

		self.prev = ch;
		Ok(())
	}

	/// Trim the result and drop whatever is still sitting in open buffers:
	/// an unterminated comment or custom block is truncated, not reported.
	fn finish(self) -> String {
		self.out.trim().to_string()
	}

	fn code_char(&mut self, ch: char) -> ScrubResult<()> {
		if self.pending_slash {
			self.pending_slash = false;
			match ch {
				'*' => {
					self.mode = Mode::BlockComment { armed: false };
					return Ok(());
				}
				'/' => {
					self.mode = Mode::LineComment;
					if self.active_block.is_some() {
						self.block_buf.push_str("//");
					} else {
						self.comment_buf.push_str("//");
					}
					return Ok(());
				}
				// A lone slash is the division operator; emit it, then let
				// the current character take the ordinary path below.
				_ => self.put_code('/'),
			}
		}

		if ch == '/' {
			self.pending_slash = true;
			return Ok(());
		}

		self.put_code(ch);

		// Strings only ever open from code; a quote inside a comment is just
		// comment content.
		if ch == '"' {
			self.string = if self.prev == '@' {
				StringState::Raw { closing: false }
			} else {
				StringState::Normal { escaped: false }
			};
		}

		Ok(())
	}

	fn line_comment_char(&mut self, ch: char) {
		if self.active_block.is_some() {
			// Inside a custom block the comment is part of the capture,
			// newline included.
			self.block_buf.push(ch);
			if ch == '\n' {
				self.mode = Mode::Code;
			}
			return;
		}

		if ch == '\n' {
			if !self.policy.remove_single_line_comments {
				self.out.push_str(&self.comment_buf);
			}
			if !self.policy.remove_newlines {
				self.out.push('\n');
			}
			self.comment_buf.clear();
			self.in_whitespace = self.policy.remove_whitespace;
			self.mode = Mode::Code;
		} else {
			self.comment_buf.push(ch);
		}
	}

	fn block_comment_char(&mut self, ch: char) -> ScrubResult<()> {
		let Mode::BlockComment { armed } = self.mode else {
			unreachable!("block_comment_char outside block comment");
		};

		if armed {
			match ch {
				'/' => {
					self.mode = Mode::Code;
					return self.close_block_comment();
				}
				// A star run: the earlier star is content, the new one is
				// the close candidate.
				'*' => self.comment_buf.push('*'),
				_ => {
					self.comment_buf.push('*');
					self.comment_buf.push(ch);
					self.mode = Mode::BlockComment { armed: false };
				}
			}
		} else if ch == '*' {
			self.mode = Mode::BlockComment { armed: true };
		} else {
			self.comment_buf.push(ch);
		}

		Ok(())
	}

	/// A `*/` was just consumed. Decide what the buffered comment content
	/// was: a custom-block close tag, a custom-block open tag, or an
	/// ordinary comment subject to policy.
	fn close_block_comment(&mut self) -> ScrubResult<()> {
		let content = std::mem::take(&mut self.comment_buf);

		if let Some(index) = self.active_block {
			let handler = self.registry.get(index);
			if handler.close_tag() == content.trim() {
				let captured = std::mem::take(&mut self.block_buf);
				let replacement =
					handler
						.transform(&captured)
						.map_err(|source| ScrubError::CustomBlock {
							tag: handler.open_tag().to_string(),
							source: Box::new(source),
						})?;
				self.out.push_str(&replacement);
				self.active_block = None;
			} else {
				// Any other comment inside an active block is preserved
				// verbatim as part of the capture. This also means a custom
				// block cannot be re-opened while one is active.
				self.block_buf.push_str("/*");
				self.block_buf.push_str(&content);
				self.block_buf.push_str("*/");
			}
			return Ok(());
		}

		if let Some(index) = self.registry.find_open(content.trim()) {
			self.active_block = Some(index);
		} else if !self.policy.remove_multi_line_comments {
			self.out.push_str("/*");
			self.out.push_str(&content);
			self.out.push_str("*/");
		}

		Ok(())
	}

	fn string_char(&mut self, ch: char) -> ScrubResult<()> {
		match self.string {
			StringState::Normal { escaped } => {
				self.put_verbatim(ch);
				if escaped {
					self.string = StringState::Normal { escaped: false };
				} else if ch == '\\' {
					self.string = StringState::Normal { escaped: true };
				} else if ch == '"' {
					self.string = StringState::None;
				}
			}
			StringState::Raw { closing } => {
				if closing {
					if ch == '"' {
						// Doubled quote: one literal quote, stay inside.
						self.put_verbatim(ch);
						self.string = StringState::Raw { closing: false };
					} else {
						// The previous quote closed the literal; this
						// character belongs to code.
						self.string = StringState::None;
						self.code_char(ch)?;
					}
				} else {
					self.put_verbatim(ch);
					if ch == '"' {
						self.string = StringState::Raw { closing: true };
					}
				}
			}
			StringState::None => unreachable!("string_char outside string"),
		}

		Ok(())
	}

	/// Copy a string-literal character through untouched, routed into the
	/// capture buffer when a custom block is open.
	fn put_verbatim(&mut self, ch: char) {
		if self.active_block.is_some() {
			self.block_buf.push(ch);
		} else {
			self.out.push(ch);
		}
	}

	/// Emit an ordinary code character. Custom-block captures are opaque to
	/// the whitespace policy (their text is replaced wholesale anyway);
	/// everything else goes through newline downgrading and run collapsing.
	fn put_code(&mut self, ch: char) {
		if self.active_block.is_some() {
			self.block_buf.push(ch);
			return;
		}

		let ch = if ch == '\n' && self.policy.remove_newlines {
			' '
		} else {
			ch
		};

		if ch == '\n' {
			self.out.push('\n');
			// The newline itself is content, but what follows it (e.g.
			// indentation) opens a fresh collapsible run.
			self.in_whitespace = self.policy.remove_whitespace;
		} else if is_inline_whitespace(ch) {
			if !self.in_whitespace {
				self.out.push(ch);
				self.in_whitespace = self.policy.remove_whitespace;
			}
		} else {
			self.out.push(ch);
			self.in_whitespace = false;
		}
	}
}

/// Whitespace that participates in run collapsing. Newlines are handled
/// separately because their removal is a distinct policy knob.
fn is_inline_whitespace(ch: char) -> bool {
	ch.is_whitespace() && ch != '\n'
}
