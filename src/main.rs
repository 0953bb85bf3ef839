use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nisse::config::{self, NisseConfiguration};
use nisse::manager::NisseManager;
use nisse::ui;

#[derive(clap::Parser)]
#[command(
    name = "nisse",
    version,
    about = "Publish build metadata (OS, git commit, dynamic version) as properties"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short = 'D',
        value_name = "KEY=VALUE",
        help = "Set a configuration property (a bare KEY means true)"
    )]
    define: Vec<String>,

    #[arg(long, help = "Directory to inspect instead of the current directory")]
    dir: Option<PathBuf>,

    #[arg(short, long, help = "Write a properties file instead of printing")]
    output: Option<PathBuf>,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,

    #[arg(short, long, help = "Only log errors")]
    quiet: bool,

    #[arg(long, help = "Log level (trace, debug, info, warn, error)")]
    log_level: Option<String>,
}

fn init_logging(args: &Args) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("NISSE_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
        parse_level(&level_str)
    };

    let mut filter = EnvFilter::from_default_env();
    if env::var("RUST_LOG").is_err() {
        if let Ok(directive) = format!("nisse={}", level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// `-D key=value`; a bare `-D key` means `true`, as with Maven
fn parse_define(define: &str) -> (String, String) {
    match define.split_once('=') {
        Some((key, value)) => (key.trim().to_string(), value.to_string()),
        None => (define.trim().to_string(), "true".to_string()),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let file_config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;

    let mut user_properties = file_config.properties;
    for define in &args.define {
        let (key, value) = parse_define(define);
        debug!("Property {} set from command line", key);
        user_properties.insert(key, value);
    }

    let working_directory = match args.dir {
        Some(dir) => dir,
        None => env::current_dir().context("Cannot determine current directory")?,
    };

    let configuration = NisseConfiguration::builder()
        .with_environment()
        .with_user_properties(user_properties)
        .with_current_working_directory(working_directory.clone())
        .with_session_root_directory(working_directory)
        .with_default_translation_table()
        .build()
        .context("Invalid configuration")?;

    let report = NisseManager::with_default_sources().create_properties(&configuration);
    ui::display_failures(&report.failures);

    match &args.output {
        Some(path) => {
            ui::write_properties_file(&report, path)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            ui::display_status(&format!(
                "Wrote {} properties to {}",
                report.properties.len(),
                path.display()
            ));
        }
        None => ui::display_properties(&report),
    }

    Ok(())
}
