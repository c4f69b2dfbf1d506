use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use sti_language::{diagnostic, language, Body, VerifiedTemplate};
use tracing_subscriber::EnvFilter;

mod values;

#[derive(Parser)]
#[command(name = "sti")]
#[command(about = "Render sti string templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, env = "STI_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template with the given values
    Render {
        /// Input .sti file
        file: PathBuf,

        /// JSON object of values
        #[arg(short = 'i', long)]
        values: Option<PathBuf>,

        /// Set a single value, overriding the values file
        #[arg(short = 'D', long = "set", value_name = "KEY=VALUE", value_parser = values::parse_assignment)]
        set: Vec<(String, String)>,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and verify templates without rendering them
    Check {
        /// Input .sti files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print a template in canonical form
    Fmt {
        /// Input .sti file
        file: PathBuf,

        /// Fail instead of printing when the file is not canonical
        #[arg(long)]
        check: bool,
    },

    /// Show the grammar's node kinds and versions
    Grammar,
}

fn init_logging(verbose: u8, format: LogFormat) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("STI_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Render {
            file,
            values,
            set,
            output,
        } => render_template(&file, values.as_deref(), set, output.as_deref()),
        Commands::Check { files } => check_templates(&files),
        Commands::Fmt { file, check } => format_template(&file, check),
        Commands::Grammar => show_grammar(),
    }
}

/// Write `text` without panicking when stdout is closed early
fn write_output<W: Write>(mut out: W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .context("Failed to write to stdout")
}

fn write_stdout(text: &str) -> Result<()> {
    write_output(io::stdout().lock(), text)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Print diagnostics for a language error and turn it into a CLI error
fn report(err: sti_language::Error, path: &Path, source: &str) -> anyhow::Error {
    let name = path.display().to_string();
    if let Err(io_err) = diagnostic::eprint_report(&err, &name, source) {
        tracing::warn!(error = %io_err, "failed to print diagnostics");
    }
    let count = err.flatten().len();
    anyhow!(
        "{} error{} in {}",
        count,
        if count == 1 { "" } else { "s" },
        name
    )
}

fn parse_file(path: &Path, source: &str) -> Result<Body> {
    let lang = language();
    if !lang.matches_path(path) {
        tracing::info!(path = %path.display(), "file does not have an .sti extension");
    }
    lang.parse(source).map_err(|err| report(err, path, source))
}

fn render_template(
    file: &Path,
    values_path: Option<&Path>,
    set: Vec<(String, String)>,
    output: Option<&Path>,
) -> Result<()> {
    let source = read_source(file)?;
    let body = parse_file(file, &source)?;

    let mut inputs: HashMap<String, String> = match values_path {
        Some(path) => values::load(path)?,
        None => HashMap::new(),
    };
    inputs.extend(set);
    tracing::debug!(inputs = inputs.len(), "loaded template values");

    let rendered = VerifiedTemplate::try_from_body_inputs(&body, &inputs)
        .map_err(|err| report(err, file, &source))?
        .reduce();

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = rendered.len(), "wrote output");
        }
        None => write_stdout(&rendered)?,
    }
    Ok(())
}

fn check_templates(files: &[PathBuf]) -> Result<()> {
    let mut failed = 0;
    for file in files {
        let checked = read_source(file).and_then(|source| {
            let body = parse_file(file, &source)?;
            sti_language::check(&body).map_err(|err| report(err, file, &source))?;
            Ok(())
        });
        match checked {
            Ok(()) => write_stdout(&format!("{}: ok\n", file.display()))?,
            Err(err) => {
                eprintln!("{}: {:#}", file.display(), err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed", failed, files.len());
    }
    Ok(())
}

fn format_template(file: &Path, check: bool) -> Result<()> {
    let source = read_source(file)?;
    let formatted = parse_file(file, &source)?.to_string();

    if check {
        if formatted != source {
            bail!("{} is not formatted", file.display());
        }
        tracing::info!(path = %file.display(), "already formatted");
    } else {
        write_stdout(&formatted)?;
    }
    Ok(())
}

fn show_grammar() -> Result<()> {
    let lang = language();
    let mut text = format!(
        "language: {}\nversion: {}\nabi version: {}\nfile types: {}\nnode kinds:\n",
        lang.name(),
        lang.version(),
        lang.abi_version(),
        lang.file_types().join(", ")
    );
    for kind in lang.node_kinds() {
        if kind.named {
            text.push_str(&format!("  {:>3} {}\n", kind.id, kind.name));
        } else {
            text.push_str(&format!("  {:>3} \"{}\"\n", kind.id, kind.name));
        }
    }
    write_stdout(&text)
}
