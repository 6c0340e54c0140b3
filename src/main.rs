use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use medscan_lib::config::{self, ParserConfig};
use medscan_lib::{
    noop_recognizer, RawDocument, RecordParser, StructuringError, TokenConfidence,
};

#[derive(Parser)]
#[command(name = "medscan")]
#[command(about = "Extract structured fields from OCR'd medical record text")]
#[command(version)]
struct Cli {
    /// OCR text file, or `-` to read stdin
    input: PathBuf,

    /// JSON array of {"text", "confidence"} OCR tokens
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// JSON parser config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the quick regex-only fallback pass
    #[arg(long)]
    no_quick: bool,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

fn read_input(path: &Path) -> Result<String, StructuringError> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn read_tokens(path: &Path) -> Result<Vec<TokenConfidence>, StructuringError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| StructuringError::JsonParsing(e.to_string()))
}

fn run(cli: &Cli) -> Result<String, StructuringError> {
    let mut parser_config = match &cli.config {
        Some(path) => ParserConfig::load(path)?,
        None => ParserConfig::default(),
    };
    if cli.no_quick {
        parser_config.quick_fallback = false;
    }

    let mut document = RawDocument::new(&read_input(&cli.input)?);
    if let Some(path) = &cli.tokens {
        document = document.with_tokens(read_tokens(path)?);
    }

    let parser = RecordParser::from_config(&parser_config, noop_recognizer());
    tracing::debug!(strategies = ?parser.strategy_names(), "Parser ready");
    let result = parser.parse(&document);

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    json.map_err(|e| StructuringError::JsonParsing(e.to_string()))
}

fn main() -> ExitCode {
    medscan_lib::init_tracing();
    let cli = Cli::parse();
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match run(&cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Parse failed");
            eprintln!("medscan: {e}");
            ExitCode::FAILURE
        }
    }
}
