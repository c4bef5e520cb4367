use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use scrub_cli::Commands;
use scrub_cli::ScrubCli;
use scrub_core::BatchOptions;
use scrub_core::CommandBackend;
use scrub_core::HandlerRegistry;
use scrub_core::MinifierAdapter;
use scrub_core::SETTINGS_FILE_NAME;
use scrub_core::Settings;
use scrub_core::collect_source_files;
use scrub_core::process_files;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ScrubCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.init();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Run { pause }) => run_process(&args, pause),
		None => run_process(&args, false),
	};

	if let Err(e) = result {
		// Render through miette for rich diagnostics with help text and
		// error codes.
		match e.downcast::<scrub_core::ScrubError>() {
			Ok(scrub_err) => {
				let report: miette::Report = (*scrub_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &ScrubCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &ScrubCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let settings_path = root.join(SETTINGS_FILE_NAME);

	if settings_path.exists() {
		println!(
			"Settings file already exists: {}",
			settings_path.display()
		);
		return Ok(());
	}

	let _ = Settings::generate(&settings_path)?;
	println!("Created {SETTINGS_FILE_NAME}");
	println!();
	println!("Next steps:");
	println!("  1. Point `path_files_in` at your source directory");
	println!("  2. Set `minify_command` if you use `/*m*/` blocks");
	println!("  3. Run `scrub run` to process the directory");

	Ok(())
}

fn run_process(args: &ScrubCli, pause: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let settings = Settings::load_or_init(&root.join(SETTINGS_FILE_NAME))?;

	if args.verbose {
		println!("{}", colored!("Using settings:", bold));
		for (key, value) in settings.summary() {
			println!("    {key} set to {value}");
		}
	}

	let options = BatchOptions::from_settings(&settings, &root);
	let files = collect_source_files(&options.input_dir, &options.ignore_files)?;

	if args.verbose {
		for file in &files {
			println!("Found `{}`", display_name(file));
		}
	}
	println!("Found {} file(s), processing...", files.len());

	let registry = HandlerRegistry::with_builtins(MinifierAdapter::new(
		Box::new(CommandBackend::new(settings.minify_command.clone())),
		settings.minify_line_length,
	));

	let report = process_files(&files, &options, &registry)?;

	for dest in &report.written {
		println!("  processed `{}`", display_name(dest));
	}
	for failure in &report.failures {
		eprintln!(
			"{} failed to process `{}`: {}",
			colored!("warning:", yellow),
			display_name(&failure.file),
			failure.error
		);
		if let Some(cause) = std::error::Error::source(&failure.error) {
			eprintln!("    caused by: {cause}");
		}
	}

	if report.is_ok() {
		println!("Processed {} file(s).", report.written.len());
	} else {
		println!(
			"Processed {} file(s), {} failure(s).",
			report.written.len(),
			report.failures.len()
		);
	}

	if pause {
		wait_for_enter();
	}

	Ok(())
}

fn display_name(path: &Path) -> String {
	path.file_name()
		.map_or_else(|| path.display().to_string(), |name| {
			name.to_string_lossy().to_string()
		})
}

fn wait_for_enter() {
	println!("Press Enter to continue...");
	let mut line = String::new();
	let _ = std::io::stdin().read_line(&mut line);
}
