//! Application entry point: SmartBin CLI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (`RUST_LOG`, default `info`).
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] (explicit `--config` path, or the platform default
//!    which falls back to defaults on first run).
//! 4. Apply command-line overrides (language, verbosity, API key, audio).
//! 5. Run the sub-command.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use smartbin::{
    app::{default_audio_path, render_report, render_result, save_audio},
    classify::{Language, ResponseParser, Verbosity},
    config::{AppConfig, AppPaths},
    pipeline::{Analyzer, ImageUpload},
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "smartbin",
    version,
    about = "Which bin does it go in? Photo-based waste segregation for Indian municipal bins."
)]
struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify a photo of a waste item.
    Classify(ClassifyArgs),

    /// Parse a saved model reply (stdin when FILE is omitted).
    Parse {
        file: Option<PathBuf>,

        #[arg(short, long, value_parser = parse_language)]
        language: Option<Language>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List supported languages.
    Languages,

    /// Write a default settings file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// JPEG, PNG or WebP photo.
    image: PathBuf,

    /// Target language: code, name or label (e.g. `hi`, `Kannada`).
    #[arg(short, long, value_parser = parse_language)]
    language: Option<Language>,

    /// Reply format requested from the model: terse or detailed.
    #[arg(long)]
    verbosity: Option<Verbosity>,

    /// Where to write the spoken instruction (MP3).
    #[arg(long)]
    audio_out: Option<PathBuf>,

    /// Skip speech synthesis.
    #[arg(long)]
    no_audio: bool,

    /// API key for the hosted model.
    #[arg(long, env = "SMARTBIN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn parse_language(s: &str) -> Result<Language, String> {
    Language::find(s).ok_or_else(|| {
        let known: Vec<_> = Language::ALL.iter().map(|l| l.code()).collect();
        format!("unknown language '{s}' (supported: {})", known.join(", "))
    })
}

// ---------------------------------------------------------------------------
// Sub-commands
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => Ok(AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        })),
    }
}

async fn classify(mut config: AppConfig, args: ClassifyArgs) -> Result<()> {
    if let Some(language) = args.language {
        config.language = language;
    }
    if let Some(verbosity) = args.verbosity {
        config.verbosity = verbosity;
    }
    if args.no_audio {
        config.speech.enabled = false;
    }
    // --api-key / SMARTBIN_API_KEY, then settings.toml, then GOOGLE_API_KEY.
    if let Some(key) = args.api_key.filter(|key| !key.trim().is_empty()) {
        config.model.api_key = Some(key);
    } else if config.model.credential().is_none() {
        config.model.api_key = std::env::var("GOOGLE_API_KEY").ok();
    }

    let analyzer = Analyzer::from_config(&config)?;
    let upload = ImageUpload::from_path(&args.image)?;
    log::info!(
        "Analyzing {} ({}, {} bytes) for {}",
        args.image.display(),
        upload.mime_type,
        upload.bytes.len(),
        config.language
    );

    let report = analyzer
        .analyze(&upload, |stage| {
            if stage.is_busy() {
                eprintln!("… {}", stage.label());
            }
        })
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    let path = args.audio_out.unwrap_or_else(|| {
        default_audio_path(&AppPaths::new().audio_dir, &report.result.target_language_code)
    });
    if let Some(saved) = save_audio(&report, &path)? {
        eprintln!("Audio saved to {}", saved.display());
    }
    Ok(())
}

fn parse_reply(
    config: &AppConfig,
    file: Option<&Path>,
    language: Option<Language>,
    json: bool,
) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read stdin")?;
            buf
        }
    };

    let parser = ResponseParser::new(language.unwrap_or(config.language));
    let result = parser.parse(&raw);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_result(&result));
    }
    Ok(())
}

fn list_languages() {
    for language in Language::ALL {
        println!("{:<4}{}", language.code(), language.label());
    }
}

fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppPaths::new().settings_file);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AppConfig::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command line
    let cli = Cli::parse();

    match cli.command {
        Command::Classify(args) => {
            let config = load_config(cli.config.as_deref())?;
            classify(config, args).await
        }
        Command::Parse {
            file,
            language,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            parse_reply(&config, file.as_deref(), language, json)
        }
        Command::Languages => {
            list_languages();
            Ok(())
        }
        Command::InitConfig { force } => init_config(cli.config.as_deref(), force),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
