use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	version,
	about = "Strip comments and squeeze whitespace out of C-family source trees.",
	long_about = "scrub rewrites a directory of source files: comments are removed and \
	              whitespace and newlines collapsed under the policy in scrub.toml, while \
	              specially tagged block comments mark regions for custom processing.\n\nA \
	              `/*-*/ ... /*-*/` region is deleted outright; a `/*m*/ ... /*m*/` region is \
	              replaced by the output of the configured external minifier.\n\nQuick start:\n  \
	              scrub init   Create a default scrub.toml\n  scrub run    Process the input \
	              directory (also the default command)"
)]
pub struct ScrubCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. `scrub.toml` is looked up here
	/// and relative input/output paths resolve against it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a default `scrub.toml` in the project root.
	///
	/// If the file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Process every candidate file in the input directory.
	///
	/// Reads `scrub.toml` (generating it with defaults when absent),
	/// collects source files not on the ignore list, rewrites each one under
	/// the configured policy, and writes the results to the output
	/// directory. A file whose custom block fails to process is reported
	/// and skipped; the rest of the batch still runs.
	///
	/// This is the default when no subcommand is given.
	Run {
		/// Wait for Enter before exiting, for double-click-style launches.
		#[arg(long, default_value_t = false)]
		pause: bool,
	},
}
