//! Custom-block handlers: named open/close tag pairs that claim a region of
//! source delimited by two block comments and replace its captured text.

use crate::ScrubResult;
use crate::minify::MinifierAdapter;

/// A custom-block capability: a pair of tags compared against the exact
/// trimmed content of a block comment, and a transform applied to the text
/// captured between them.
pub trait BlockHandler {
	/// Tag whose block comment opens this handler's region.
	fn open_tag(&self) -> &str;
	/// Tag whose block comment closes this handler's region.
	fn close_tag(&self) -> &str;
	/// Produce the replacement for the captured region text.
	fn transform(&self, captured: &str) -> ScrubResult<String>;
}

/// Deletes the region outright: `/*-*/ ... /*-*/` leaves nothing behind.
pub struct DeleteHandler;

impl BlockHandler for DeleteHandler {
	fn open_tag(&self) -> &str {
		"-"
	}

	fn close_tag(&self) -> &str {
		"-"
	}

	fn transform(&self, _captured: &str) -> ScrubResult<String> {
		Ok(String::new())
	}
}

/// Replaces the region with its minified form: `/*m*/ ... /*m*/` delegates
/// the captured text to the external minifier through [`MinifierAdapter`].
pub struct MinifyHandler {
	adapter: MinifierAdapter,
}

impl MinifyHandler {
	pub fn new(adapter: MinifierAdapter) -> Self {
		Self { adapter }
	}
}

impl BlockHandler for MinifyHandler {
	fn open_tag(&self) -> &str {
		"m"
	}

	fn close_tag(&self) -> &str {
		"m"
	}

	fn transform(&self, captured: &str) -> ScrubResult<String> {
		self.adapter.minify(captured)
	}
}

/// The set of registered handlers. Registration order is the order open tags
/// are tested in, so when two handlers share an open tag the first one
/// registered wins.
#[derive(Default)]
pub struct HandlerRegistry {
	handlers: Vec<Box<dyn BlockHandler>>,
}

impl HandlerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// The built-in handler set: delete (`-`) and minify (`m`).
	pub fn with_builtins(adapter: MinifierAdapter) -> Self {
		let mut registry = Self::new();
		registry.register(Box::new(DeleteHandler));
		registry.register(Box::new(MinifyHandler::new(adapter)));
		registry
	}

	pub fn register(&mut self, handler: Box<dyn BlockHandler>) {
		self.handlers.push(handler);
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// First registered handler whose open tag equals the trimmed comment
	/// content.
	pub(crate) fn find_open(&self, trimmed: &str) -> Option<usize> {
		self.handlers
			.iter()
			.position(|handler| handler.open_tag() == trimmed)
	}

	pub(crate) fn get(&self, index: usize) -> &dyn BlockHandler {
		self.handlers[index].as_ref()
	}
}
