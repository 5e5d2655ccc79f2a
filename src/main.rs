//! vita - resume renderer

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use vita::{ErrorKind, Format, PageSize, PdfConfig, RenderOptions, Renderer, Resume, SectionId};

#[derive(Parser)]
#[command(name = "vita")]
#[command(version, about = "Render JSON Resume documents to PDF and DOCX", long_about = None)]
#[command(after_help = "EXAMPLES:
    vita convert resume.json resume.pdf              Render with the default style
    vita convert resume.json cv.docx -s modern       Render DOCX in the modern style
    vita convert https://example.com/r.json out.pdf  Render a remote resume
    vita styles                                      List available styles")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress output messages
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render a resume to PDF or DOCX
    Convert(ConvertArgs),
    /// List available styles
    Styles,
    /// Show the supported resume sections
    Schema,
    /// Check that a resume parses and summarize its sections
    Validate {
        /// Resume JSON file or http(s) URL
        #[arg(value_name = "INPUT")]
        input: String,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Resume JSON file or http(s) URL
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (.pdf or .docx)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output format (pdf or docx); inferred from OUTPUT when omitted
    #[arg(short, long)]
    format: Option<String>,

    /// Style name
    #[arg(short, long, default_value = "professional")]
    style: String,

    /// Paper size (letter or a4)
    #[arg(short, long, default_value = "letter")]
    page_size: PageSize,

    /// Do not search system font directories (PDF)
    #[arg(long)]
    no_system_fonts: bool,

    /// Additional font directory (PDF); may be repeated
    #[arg(long, value_name = "DIR")]
    font_dir: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Vita(#[from] vita::Error),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Vita(err) => match err.kind() {
                ErrorKind::UnknownStyle => 2,
                ErrorKind::UnsupportedFormat => 3,
                ErrorKind::DateFormat => 4,
                ErrorKind::FontUnavailable | ErrorKind::Render => 5,
                ErrorKind::Input => 6,
            },
            CliError::Read { .. } | CliError::Fetch { .. } => 6,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .try_init();

    let result = match cli.command {
        Command::Convert(args) => convert(&args, cli.quiet),
        Command::Styles => {
            show_styles();
            Ok(())
        }
        Command::Schema => {
            show_schema();
            Ok(())
        }
        Command::Validate { input } => validate(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn convert(args: &ConvertArgs, quiet: bool) -> Result<(), CliError> {
    let format = match &args.format {
        Some(name) => name.parse::<Format>()?,
        None => Format::from_path(&args.output)?,
    };

    let renderer = Renderer::new().with_options(RenderOptions {
        page_size: args.page_size,
        pdf: PdfConfig {
            system_fonts: !args.no_system_fonts,
            font_dirs: args.font_dir.clone(),
            ..PdfConfig::default()
        },
        ..RenderOptions::default()
    });
    // Fail on an unknown style before reading or fetching anything.
    renderer.styles().resolve(&args.style)?;

    let resume = load(&args.input)?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(vita::Error::from)?;
    }
    renderer.render(&resume, &args.style, format, &args.output)?;

    if !quiet {
        println!(
            "Generated {} ({format}, style: {})",
            args.output.display(),
            args.style
        );
    }
    Ok(())
}

fn show_styles() {
    let styles = vita::StyleRegistry::builtin();
    println!("Available styles:");
    for style in styles.iter() {
        println!("  {:<14} {}", style.name, style.description);
    }
}

fn show_schema() {
    println!("Supported sections (JSON Resume):");
    for id in SectionId::ALL {
        println!("  {:<14} {}", id.key(), id.description());
    }
    println!();
    println!("Dates use ISO 8601: YYYY, YYYY-MM or YYYY-MM-DD.");
    println!("Schema reference: https://jsonresume.org/schema");
}

fn validate(input: &str) -> Result<(), CliError> {
    let resume = load(input)?;
    println!("Valid resume: {}", resume.name().unwrap_or("(no name)"));
    for (section, count) in resume.section_counts() {
        println!("  {:<14} {count}", section.key());
    }
    Ok(())
}

/// Read a resume from a local path or an http(s) URL.
fn load(input: &str) -> Result<Resume, CliError> {
    let bytes = if input.starts_with("http://") || input.starts_with("https://") {
        fetch(input)?
    } else {
        std::fs::read(Path::new(input)).map_err(|source| CliError::Read {
            path: input.to_string(),
            source,
        })?
    };
    Ok(Resume::from_slice(&bytes)?)
}

fn fetch(url: &str) -> Result<Vec<u8>, CliError> {
    let fetch_error = |source| CliError::Fetch {
        url: url.to_string(),
        source,
    };
    log::debug!("fetching {url}");
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("vita/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(fetch_error)?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(fetch_error)?;
    let bytes = response.bytes().map_err(fetch_error)?;
    Ok(bytes.to_vec())
}
