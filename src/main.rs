//! CLI for citenote - Render citations, bibliographies and footnotes in HTML documents.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use citenote::{builtin_style, builtin_style_names, load_config, load_style, Config, Processor};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Render numbered citations, bibliographies and footnotes in HTML documents
#[derive(Parser)]
#[command(name = "citenote")]
#[command(version)]
#[command(after_help = "\
Examples:
  citenote render paper.html -o paper.out.html
  citenote render paper.html --config citenote.json
  cat paper.html | citenote render - --no-footnotes
  citenote styles bibliography")]
struct Cli {
    /// Log rendering details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render citations and footnotes in an HTML file
    #[command(after_help = "\
Markup:
  <p data-bib-key=\"key\">Reference text</p>   reference entry
  <span data-cite=\"key\"></span>              citation marker
  <div id=\"bibliography\"></div>              bibliography list target
  <span data-footnote>Footnote text</span>    footnote marker
  <div id=\"footnote\"></div>                  footnote list target")]
    Render {
        /// Input HTML file (use '-' for stdin)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Don't render the bibliography
        #[arg(long)]
        no_bib: bool,

        /// Don't render footnotes
        #[arg(long)]
        no_footnotes: bool,

        /// CSS file replacing the built-in bibliography stylesheet
        #[arg(long, value_name = "FILE")]
        bib_css: Option<PathBuf>,

        /// CSS file replacing the built-in footnote stylesheet
        #[arg(long, value_name = "FILE")]
        footnote_css: Option<PathBuf>,
    },

    /// List built-in stylesheets, or print one
    Styles {
        /// Stylesheet to print
        name: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// AppError: semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10: input file not found / unreadable
    InputFile(String),
    /// Exit 11: configuration file not found / invalid
    ConfigFile(String),
    /// Exit 12: stylesheet not found / unreadable
    Style(String),
    /// Exit 13: cannot write output file
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::ConfigFile(_) => 11,
            AppError::Style(_) => 12,
            AppError::OutputFile(_) => 13,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::ConfigFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: the file must be a JSON object with optional \"bibliography\" and \"footnote\" sections",
                    msg
                )
            }
            AppError::Style(msg) => {
                let names = builtin_style_names().join(", ");
                write!(
                    f,
                    "{}\n  available builtin styles: {}\n  hint: provide a path to a readable .css file",
                    msg, names
                )
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    citenote::logging::init(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            no_bib,
            no_footnotes,
            bib_css,
            footnote_css,
        } => {
            let options = RenderOptions {
                config: config.as_deref(),
                no_bib,
                no_footnotes,
                bib_css: bib_css.as_deref(),
                footnote_css: footnote_css.as_deref(),
            };
            render_command(&input, output.as_deref(), &options)?;
        }
        Commands::Styles { name } => {
            styles_command(name.as_deref())?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

struct RenderOptions<'a> {
    config: Option<&'a Path>,
    no_bib: bool,
    no_footnotes: bool,
    bib_css: Option<&'a Path>,
    footnote_css: Option<&'a Path>,
}

/// Builds the effective configuration: file, then command-line overrides.
fn resolve_config(options: &RenderOptions<'_>) -> Result<Config, AppError> {
    let mut config = match options.config {
        Some(path) => load_config(path)
            .map_err(|e| AppError::ConfigFile(format!("'{}': {}", path.display(), e)))?,
        None => Config::default(),
    };

    if options.no_bib {
        config.bibliography.enabled = false;
    }
    if options.no_footnotes {
        config.footnote.enabled = false;
    }
    if let Some(path) = options.bib_css {
        let css = load_style(path)
            .map_err(|e| AppError::Style(format!("'{}': {}", path.display(), e)))?;
        config.bibliography.stylesheet = Some(css);
    }
    if let Some(path) = options.footnote_css {
        let css = load_style(path)
            .map_err(|e| AppError::Style(format!("'{}': {}", path.display(), e)))?;
        config.footnote.stylesheet = Some(css);
    }

    Ok(config)
}

/// Render an HTML file.
fn render_command(
    input: &Path,
    output: Option<&Path>,
    options: &RenderOptions<'_>,
) -> Result<(), AppError> {
    // 1. Read the HTML file (support '-' for stdin)
    let html = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::InputFile(format!("failed to read from stdin: {}", e)))?;
        buf
    } else {
        fs::read_to_string(input)
            .map_err(|e| AppError::InputFile(format!("'{}': {}", input.display(), e)))?
    };

    // 2. Resolve configuration and stylesheets
    let config = resolve_config(options)?;

    // 3. Parse, render, serialize
    let (result, summary) = Processor::new(config).process_html(&html);

    // 4. Write to file or stdout
    if let Some(output_path) = output {
        fs::write(output_path, &result).map_err(|e| {
            AppError::OutputFile(format!("'{}': {}", output_path.display(), e))
        })?;
        eprintln!(
            "rendered {} citation(s) and {} footnote(s), wrote {}",
            summary.citations,
            summary.footnotes,
            output_path.display()
        );
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{}", result)
            .map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))?;
    }

    Ok(())
}

/// List built-in stylesheets, or print the named one for the default container.
fn styles_command(name: Option<&str>) -> Result<(), AppError> {
    let Some(name) = name else {
        for name in builtin_style_names() {
            println!("{}", name);
        }
        return Ok(());
    };

    let defaults = Config::default();
    let container_id = match name {
        "footnote" => defaults.footnote.container_id,
        _ => defaults.bibliography.container_id,
    };
    let css = builtin_style(name, &container_id)
        .ok_or_else(|| AppError::Style(format!("'{}' is not a builtin style name", name)))?;
    println!("{}", css);
    Ok(())
}
