//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use docforge_core::{DocumentKind, DocumentRequest, Generator, Settings, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "docforge")]
#[command(author, version, about = "Business documents from DOCX templates", long_about = None)]
struct Cli {
    /// Configuration file (defaults to docforge.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the document types that can be generated
    Types,

    /// Print the placeholder values a request fills in
    Placeholders {
        /// Request file (TOML)
        request: PathBuf,
    },

    /// Fill the template for a request and write the DOCX only
    Fill {
        /// Request file (TOML)
        request: PathBuf,

        /// Output DOCX file (defaults to the generated name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the DOCX and PDF for a request
    Generate {
        /// Request file (TOML)
        request: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
}

/// Run the CLI application
///
/// Parses arguments, installs logging and dispatches to the command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Types => types_command(),
        Commands::Placeholders { request } => placeholders_command(&request, &settings)?,
        Commands::Fill { request, output } => {
            fill_command(&request, output.as_deref(), settings)?;
        }
        Commands::Generate { request, output } => {
            generate_command(&request, &output, settings)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` directives are kept, the global level is
/// `warn` or `debug` with `-v`.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load settings from `--config`, else `docforge.toml` if present, else defaults
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            path
        }
        None if Path::new(CONFIG_FILE).is_file() => Path::new(CONFIG_FILE),
        None => return Ok(Settings::default()),
    };
    Settings::load(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn load_request(path: &Path) -> Result<DocumentRequest> {
    if !path.exists() {
        anyhow::bail!("Request file not found: {}", path.display());
    }
    DocumentRequest::load(path)
        .with_context(|| format!("Failed to read request: {}", path.display()))
}

/// Execute the types command
pub fn types_command() {
    for kind in DocumentKind::ALL {
        println!("{:<34} {}", kind.slug(), kind.label());
        println!("{:<34} template: {}", "", kind.template());
    }
}

/// Execute the placeholders command
pub fn placeholders_command(request: &Path, settings: &Settings) -> Result<()> {
    let request = load_request(request)?;
    let generator = Generator::from_settings(settings.clone());

    println!("{}", request.kind());
    for (placeholder, value) in generator.placeholders(&request).iter() {
        println!("  {} = {}", placeholder, value);
    }
    Ok(())
}

/// Execute the fill command
///
/// Returns the path of the written DOCX.
pub fn fill_command(request: &Path, output: Option<&Path>, settings: Settings) -> Result<PathBuf> {
    let request = load_request(request)?;
    let generator = Generator::from_settings(settings);

    let (name, docx) = generator.fill(&request).context("Generation failed")?;
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(name),
    };
    fs::write(&output_path, &docx)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    println!("Created: {}", output_path.display());
    Ok(output_path)
}

/// Execute the generate command
///
/// Nothing is written to `output_dir` unless both files were produced.
/// Returns the paths of the DOCX and PDF.
pub fn generate_command(
    request: &Path,
    output_dir: &Path,
    settings: Settings,
) -> Result<(PathBuf, PathBuf)> {
    let request = load_request(request)?;
    let generator = Generator::from_settings(settings);

    let generated = generator.generate(&request).context("Generation failed")?;
    let (docx, pdf) = generated.write_to(output_dir).with_context(|| {
        format!("Failed to write output directory: {}", output_dir.display())
    })?;

    println!("Created: {}", docx.display());
    println!("Created: {}", pdf.display());
    Ok((docx, pdf))
}
