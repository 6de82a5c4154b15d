mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{
    RootSource, EXIT_FAILURE, EXIT_NOT_FOUND, EXIT_ROOT_NOT_FOUND, EXIT_UNSUPPORTED_PLATFORM,
};
use libpty_locator::{LibraryResolver, LocatorConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "libpty-locate",
    version,
    about = "Locate the native pty library for this platform"
)]
struct Cli {
    /// Installation root to search (overrides PTY_LIB_FOLDER).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the path of the native pty library.
    Library,
    /// Print the path of an auxiliary native file.
    File {
        /// File name, used as-is on every platform.
        name: String,
    },
    /// List every probed location and whether it exists.
    Candidates {
        /// Probe for an auxiliary file instead of the native library.
        #[arg(long)]
        file: Option<String>,
    },
    /// Show the detected platform, architecture and expected file name.
    Platform,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("LIBPTY_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let (config, source) = match cli.root {
        Some(root) => (LocatorConfig::new().with_lib_folder(root), RootSource::Flag),
        None => {
            let config = LocatorConfig::process().clone();
            let source = if config.lib_folder().is_some() {
                RootSource::Env
            } else {
                RootSource::Discovered
            };
            (config, source)
        }
    };
    tracing::debug!("installation root source: {}", source.label());
    let resolver = LibraryResolver::new(config);
    let json_output = cli.json;

    let result = match cli.command {
        Commands::Library => commands::library::run(&resolver, json_output),
        Commands::File { name } => commands::file::run(&resolver, &name, json_output),
        Commands::Candidates { file } => {
            commands::candidates::run(&resolver, file.as_deref(), json_output)
        }
        Commands::Platform => commands::platform::run(&resolver, source, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("unsupported platform") {
                EXIT_UNSUPPORTED_PLATFORM
            } else if msg.starts_with("could not find") {
                EXIT_NOT_FOUND
            } else if msg.starts_with("installation root not found") {
                EXIT_ROOT_NOT_FOUND
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
