use std::io::Read;
use std::path::PathBuf;
use std::sync::Once;

use anyhow::Context;
use clap::Parser;
use cursorctx_core::{
    CursorContext, classify,
    token::{Position, offset_to_position, position_to_offset},
};
use serde::Serialize;
use tracing::{debug, warn};

mod config;
#[cfg(test)]
mod main_test;

use config::{ConfigFile, DEFAULT_TRACE_FILTER, OutputFormat, Overrides, Settings};

static TRACE_INIT: Once = Once::new();

#[derive(Debug, Parser)]
#[command(
    name = "cursorctx",
    author,
    version,
    about = "Classify the completion context at a cursor in Go source",
    long_about = None
)]
struct CliArgs {
    /// Go source file to analyze, or `-` to read stdin
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Cursor as a byte offset (defaults to the end of the buffer)
    #[arg(long, conflicts_with_all = ["line", "column"])]
    offset: Option<usize>,

    /// Cursor line, 1-based
    #[arg(long, requires = "column")]
    line: Option<u32>,

    /// Cursor column in characters, 1-based
    #[arg(long, requires = "line")]
    column: Option<u32>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reject buffers larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_input_bytes: Option<usize>,

    /// Tracing filter directives, e.g. `cursorctx_core=trace`
    #[arg(long, value_name = "DIRECTIVES")]
    log_filter: Option<String>,
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            max_input_bytes: self.max_input_bytes,
            format: self.format,
            log_filter: self.log_filter.clone(),
        }
    }

    fn reads_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

fn init_tracing(explicit: Option<&str>) {
    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = explicit.map(str::to_string).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn read_source(args: &CliArgs, limit: usize) -> anyhow::Result<String> {
    let source = if args.reads_stdin() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read source from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read file '{}'", args.file.display()))?
    };

    if source.len() > limit {
        return Err(anyhow::anyhow!(
            "Input is {} bytes, over the limit of {} bytes (see --max-input-bytes)",
            source.len(),
            limit
        ));
    }
    Ok(source)
}

fn resolve_cursor(source: &str, args: &CliArgs) -> anyhow::Result<usize> {
    if let Some(offset) = args.offset {
        if offset > source.len() {
            warn!(offset, len = source.len(), "cursor offset past the end of the buffer, clamping");
        }
        return Ok(offset.min(source.len()));
    }
    match (args.line, args.column) {
        (Some(line), Some(column)) => position_to_offset(source, line, column)
            .with_context(|| format!("Invalid cursor position {}:{}", line, column)),
        _ => Ok(source.len()),
    }
}

/// A classification together with where the cursor ended up.
#[derive(Debug, Serialize)]
struct Report<'a> {
    cursor: Position,
    #[serde(flatten)]
    context: &'a CursorContext,
}

fn render(report: &Report<'_>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "context={}\nexpr={}\npartial={}\ncursor={}",
            report.context.kind(),
            report.context.expression(),
            report.context.partial(),
            report.cursor
        )),
        OutputFormat::Json => serde_json::to_string_pretty(report).context("Failed to serialize result"),
    }
}

fn run(args: CliArgs) -> anyhow::Result<String> {
    let file_config = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let settings = Settings::resolve(args.overrides(), file_config)?;
    init_tracing(settings.log_filter.as_deref());
    debug!(?settings, "resolved settings");

    let source = read_source(&args, settings.max_input_bytes)?;
    let cursor = resolve_cursor(&source, &args)?;
    debug!(cursor, len = source.len(), "classifying");

    let context = classify(&source, cursor);
    let report = Report {
        cursor: offset_to_position(&source, cursor),
        context: &context,
    };
    render(&report, settings.format)
}

fn main() {
    match run(CliArgs::parse()) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("cursorctx error: {err:#}");
            std::process::exit(2);
        }
    }
}
