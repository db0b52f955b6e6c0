use std::env;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use hexscript::orchestrator::wait_for_keypress;
use hexscript::{
    BuildContext, LogConfig, Logger, Orchestrator, PathResolver, PipelineOptions, Platform,
    SystemCommandRunner,
};

/// Compile a C/C++ file, convert it to Intel HEX and optionally run it.
#[derive(Parser, Debug)]
#[command(name = "hexscript", version, about)]
struct Cli {
    /// C/C++ source file (.c, .cpp, .cxx)
    source: Option<PathBuf>,

    /// "1" to run the program after building, "0" (default) to skip
    #[arg(allow_hyphen_values = true)]
    run_flag: Option<String>,

    /// Anything after the run flag is ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    extra: Vec<String>,

    /// Executable path (default: next to the source)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Intel HEX path (default: executable with .hex extension)
    #[arg(long, value_name = "FILE")]
    hex_output: Option<PathBuf>,

    /// Append the run log to this file, on any platform
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Do not wait for a keypress before exiting
    #[arg(long)]
    no_pause: bool,

    /// Print the run summary as JSON at the end
    #[arg(long)]
    json: bool,

    /// Show internal diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = LogConfig::for_platform(Platform::current(), &cwd);
    if let Some(path) = cli.log_file.clone() {
        config = config.with_log_file(path);
    }
    match serde_json::to_string(&config) {
        Ok(json) => log::debug!("log config: {}", json),
        Err(e) => log::debug!("log config not serializable: {}", e),
    }

    let pause = config.wants_pause() && !cli.no_pause;
    let logger = Logger::new(config);
    logger.log("");

    if !cli.extra.is_empty() {
        log::debug!("ignoring extra arguments: {:?}", cli.extra);
    }

    let Some(source) = cli.source else {
        logger.log("Error: drop a .c/.cpp/.cxx file onto this program to build it");
        if pause {
            wait_for_keypress(&logger);
        }
        process::exit(1);
    };

    let resolver = PathResolver::from_env();
    let ctx = BuildContext::new(&logger, &resolver, &SystemCommandRunner, Platform::current());
    let options = PipelineOptions {
        source,
        run_flag: cli.run_flag,
        output: cli.output,
        hex_output: cli.hex_output,
    };

    let summary = Orchestrator::new(ctx).run(&options);

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("cannot serialize run summary: {}", e),
        }
    }

    if pause {
        wait_for_keypress(&logger);
    }
}
