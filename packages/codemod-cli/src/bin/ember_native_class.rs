/**
 * Ember Native Class Codemod - ember-native-class
 *
 * Rewrites `Base.extend({ ... })` definitions into native classes.
 */
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ember_native_class::logging::DEFAULT_LOG_FILE;
use ember_native_class::{FileType, JsonRuntimeData, Quote, Transformer};
use ember_native_class_cli::config::{load_options, OptionOverrides};
use ember_native_class_cli::discovery::discover_files;
use ember_native_class_cli::run::{open_logger, Runner};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("ember-native-class")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Ember object definitions into native classes")
        .arg(
            Arg::new("paths")
                .value_name("PATHS")
                .help("Files, directories or glob patterns to transform")
                .required(true)
                .num_args(1..),
        )
        .arg(
            Arg::new("telemetry")
                .long("telemetry")
                .value_name("FILE")
                .help("Runtime usage data (JSON)")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON file with codemod options")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(bool_flag("decorators", "Allow emitting decorators"))
        .arg(bool_flag("class-fields", "Allow class fields with initial values"))
        .arg(bool_flag("classic-decorator", "Add @classic to every class"))
        .arg(
            Arg::new("quote")
                .long("quote")
                .value_name("STYLE")
                .help("Quotes for generated imports: single or double")
                .value_parser(|s: &str| s.parse::<Quote>()),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .value_name("KIND")
                .help("Only transform services, controllers, components or routes")
                .value_parser(|s: &str| s.parse::<FileType>()),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Report outcomes without writing files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Outcome log, '-' for the console, 'none' to disable")
                .default_value(DEFAULT_LOG_FILE),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print debug diagnostics")
                .action(ArgAction::SetTrue),
        )
}

fn bool_flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("BOOL")
        .help(help)
        .value_parser(value_parser!(bool))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn overrides(matches: &ArgMatches) -> OptionOverrides {
    OptionOverrides {
        decorators: matches.get_one::<bool>("decorators").copied(),
        class_fields: matches.get_one::<bool>("class-fields").copied(),
        classic_decorator: matches.get_one::<bool>("classic-decorator").copied(),
        quote: matches.get_one::<Quote>("quote").copied(),
        file_type: matches.get_one::<FileType>("type").copied(),
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let options = load_options(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        &overrides(matches),
    )?;

    let telemetry = matches
        .get_one::<PathBuf>("telemetry")
        .context("--telemetry is required")?;
    let runtime_data = JsonRuntimeData::load(telemetry)
        .with_context(|| format!("failed to load telemetry {}", telemetry.display()))?;

    let inputs: Vec<String> = matches
        .get_many::<String>("paths")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let files = discover_files(&inputs)?;
    info!(files = files.len(), modules = runtime_data.len(), "starting");

    let log_file = matches
        .get_one::<String>("log-file")
        .map(String::as_str)
        .unwrap_or(DEFAULT_LOG_FILE);
    let logger = open_logger(log_file)?;

    let transformer = Transformer::new(options, &runtime_data);
    let dry_run = matches.get_flag("dry-run");
    let summary = Runner::new(&transformer, logger.as_ref(), dry_run).run(&files);

    println!(
        "{} files: {} transformed, {} failed, {} skipped, {} unchanged, {} errors",
        summary.total(),
        summary.succeeded,
        summary.failed,
        summary.skipped,
        summary.unchanged,
        summary.errored
    );
    Ok(!summary.has_errors())
}

fn main() {
    let matches = command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
