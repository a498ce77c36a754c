use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sipgen::{
    Settings,
    conditionals::parse_version_setting,
    config::{LogLevel, LoggingSettings},
    header::parse_header,
    macros::extract,
};

#[derive(Parser, Debug)]
#[command(name = "sipgen", version, about = "Generate SIP files from annotated C++ headers")]
struct Args {
    /// Directory containing C++ header input files.
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Directory to contain SIP output files.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// File containing the header template.
    #[arg(long)]
    header: Option<PathBuf>,

    #[arg(long, alias = "lib_name")]
    lib_name: Option<String>,

    /// Copyright year.
    #[arg(long)]
    year: Option<String>,

    /// Copyright name.
    #[arg(long)]
    name: Option<String>,

    /// Configuration file. Defaults to the nearest sipgen.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat SYMBOL as defined. Repeatable.
    #[arg(long = "define", value_name = "SYMBOL")]
    defines: Vec<String>,

    /// Target version, e.g. 0x050400 or 5.4.0.
    #[arg(long)]
    qt_version: Option<String>,

    /// Print the parsed declarations of HEADER as JSON and exit.
    #[arg(long, value_name = "HEADER")]
    dump_ast: Option<PathBuf>,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn apply_overrides(
    settings: &mut Settings,
    args: &Args,
) -> Result<(), String> {
    if let Some(input) = &args.input {
        settings.input.directory = input.clone();
    }
    if let Some(output) = &args.output {
        settings.output.directory = output.clone();
    }
    if let Some(header) = &args.header {
        settings.output.header_template = Some(header.clone());
    }
    if let Some(lib_name) = &args.lib_name {
        settings.output.lib_name = lib_name.clone();
    }
    if let Some(year) = &args.year {
        settings.output.copy_year = year.clone();
    }
    if let Some(name) = &args.name {
        settings.output.copy_name = name.clone();
    }
    settings.preprocessor.defines.extend(args.defines.iter().cloned());
    if let Some(version) = &args.qt_version {
        settings.preprocessor.qt_version =
            parse_version_setting(version).ok_or_else(|| format!("invalid --qt-version `{version}`"))?;
    }
    if args.verbose {
        settings.logging.level = settings.logging.level.max(LogLevel::Debug);
    }
    if let Some(log_file) = &args.log_file {
        settings.logging.file = Some(log_file.clone());
    }
    settings.normalize();
    Ok(())
}

fn init_logging(logging: &LoggingSettings) {
    let directive = logging.level.filter_directive();

    let file_layer = logging.file.as_ref().map(|log_path| {
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(Path::new(".")),
            log_path.file_name().unwrap_or(std::ffi::OsStr::new("sipgen.log")),
        );
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(false)
            .with_filter(EnvFilter::new(&directive))
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(&directive));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

fn dump_ast(
    header: &Path,
    settings: &Settings,
) -> Result<String, String> {
    let source = std::fs::read_to_string(header).map_err(|e| format!("{}: {e}", header.display()))?;
    let extraction = extract(&source, &settings.macros).map_err(|e| format!("{}: {e}", header.display()))?;
    let ast = parse_header(&extraction.text).map_err(|e| format!("{}: {e}", header.display()))?;
    serde_json::to_string_pretty(&ast).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("sipgen: {e}");
            return ExitCode::from(2);
        },
    };
    if let Err(message) = apply_overrides(&mut settings, &args) {
        eprintln!("sipgen: {message}");
        return ExitCode::from(2);
    }

    init_logging(&settings.logging);
    info!("sipgen v{}", env!("CARGO_PKG_VERSION"));

    if let Some(header) = &args.dump_ast {
        return match dump_ast(header, &settings) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            },
            Err(message) => {
                error!("{message}");
                ExitCode::FAILURE
            },
        };
    }

    match sipgen::run(&settings) {
        Ok(summary) => {
            for failure in &summary.failures {
                warn!("No artifact for {failure}");
            }
            print!("{}", summary.module_index());
            ExitCode::SUCCESS
        },
        Err(failure) => {
            error!("Aborting: {failure}");
            ExitCode::FAILURE
        },
    }
}
