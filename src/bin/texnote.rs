//! texnote CLI - writing-quality notes for LaTeX documents

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, IsTerminal, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use texnote::{
    review_document, utils::error::format_warnings, BasicAnalyzer, CommandAnalyzer, CommandModel,
    LanguageAnalyzer, LanguageModel, NoopModel, ReviewOptions,
};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
const LOG_ENV: &str = "TEXNOTE_LOG";

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "texnote")]
#[command(version)]
#[command(about = "Annotate a LaTeX document with writing-quality notes", long_about = None)]
struct Cli {
    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (defaults to <name>-revisado-<date>.tex next to the
    /// input, or stdout when reading stdin)
    #[arg(short, long)]
    output: Option<String>,

    /// TOML file with review options
    #[arg(short, long)]
    config: Option<String>,

    /// Command of the linguistic analyzer (reads JSON on stdin, writes JSON
    /// on stdout)
    #[arg(long)]
    analyzer_cmd: Option<String>,

    /// Command of the language model (reads JSON on stdin, writes text on
    /// stdout)
    #[arg(long)]
    llm_cmd: Option<String>,

    /// Skip the language model review
    #[arg(long)]
    no_review: bool,

    /// Write a JSON report of marks and warnings to this path
    #[arg(long)]
    report: Option<String>,

    /// Disable colored warnings
    #[arg(long)]
    no_color: bool,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut options = match cli.config {
        Some(ref path) => match ReviewOptions::load(Path::new(path)) {
            Ok(options) => options,
            Err(err) => {
                eprintln!("✗ {}: {}", path, err);
                std::process::exit(2);
            }
        },
        None => ReviewOptions::default(),
    }
    .with_env_overrides();
    if cli.analyzer_cmd.is_some() {
        options.analyzer_cmd = cli.analyzer_cmd.clone();
    }
    if cli.llm_cmd.is_some() {
        options.llm_cmd = cli.llm_cmd.clone();
    }
    if cli.no_review {
        options.review = false;
    }

    let input = match cli.input_file {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let analyzer: Box<dyn LanguageAnalyzer> = match options.analyzer_cmd {
        Some(ref cmd) => Box::new(CommandAnalyzer::new(cmd.clone())),
        None => Box::new(BasicAnalyzer),
    };
    let model: Box<dyn LanguageModel> = match options.llm_cmd {
        Some(ref cmd) => Box::new(CommandModel::new(cmd.clone())),
        None => Box::new(NoopModel),
    };

    let output = match review_document(&input, &options, analyzer.as_ref(), model.as_ref()) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("✗ {}", err);
            std::process::exit(1);
        }
    };

    if !output.warnings.is_empty() {
        let color = !cli.no_color && io::stderr().is_terminal();
        eprint!("{}", format_warnings(&output.warnings, color));
    }

    if let Some(ref path) = cli.report {
        let report = serde_json::to_string_pretty(&output.report())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, report)?;
        eprintln!("✓ Report written to: {}", path);
    }

    let target = cli
        .output
        .map(PathBuf::from)
        .or_else(|| cli.input_file.as_deref().map(|p| default_output_path(Path::new(p))));
    match target {
        Some(path) => {
            let mut file = fs::File::create(&path)?;
            file.write_all(output.text.as_bytes())?;
            eprintln!("✓ Output written to: {}", path.display());
        }
        None => {
            io::stdout().write_all(output.text.as_bytes())?;
        }
    }
    Ok(())
}

/// `<stem>-revisado-<YYYY-MM-DD>.tex` next to the input, with a `v<N>`
/// suffix when that file already exists
#[cfg(feature = "cli")]
fn default_output_path(input: &Path) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "documento".to_string());
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tex".to_string());
    let dir = input.parent().unwrap_or_else(|| Path::new(""));

    let base = format!("{}-revisado-{}", stem, today);
    let mut candidate = dir.join(format!("{}.{}", base, extension));
    let mut version = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{}v{}.{}", base, version, extension));
        version += 1;
    }
    candidate
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texnote --features cli");
    eprintln!("  texnote [OPTIONS] [INPUT_FILE]");
}
