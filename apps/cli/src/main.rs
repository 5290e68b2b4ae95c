mod args;

use anyhow::{Context, Result};
use args::ConfigArgs;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use subburn_application::CaptionPipeline;
use subburn_layout::EstimatedMeasure;
use subburn_storage::Database;
use subburn_stt::{HttpTranscriptSource, TranscriptRequest, DEFAULT_BASE_URL};
use subburn_transcript::{Config, Preset, PresetRepository, TranscriptResponse};
use tracing_subscriber::EnvFilter;

/// Timed, positioned subtitle tokens from speech transcripts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Preset database (defaults to the user data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out a transcript JSON file
    Render {
        transcript: PathBuf,
        /// Sentence transcript to fuse with `transcript` as the word transcript
        #[arg(long)]
        sentence: Option<PathBuf>,
        /// Text file with one sentence per line, timed against `transcript`
        #[arg(long, conflicts_with = "sentence")]
        resplit: Option<PathBuf>,
    },

    /// Send audio to the transcription service and lay out the result
    Transcribe {
        audio: PathBuf,
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        server: String,
        /// Key for the service's sentence re-splitting pass
        #[arg(long)]
        gemini_api_key: Option<String>,
    },

    /// Check whether the transcription service is up
    Health {
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        server: String,
    },

    /// Named config presets
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PresetCommands {
    /// Store the current flags under a name
    Save { name: String },
    Show { name: String },
    List,
    Delete { name: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,subburn=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Render {
            transcript,
            sentence,
            resplit,
        } => {
            let config = resolve_config(&cli)?;
            let measure = EstimatedMeasure::new(config.font_size);
            let pipeline = CaptionPipeline::new(config, &measure)?;

            let response = read_transcript(transcript)?;
            let plan = match (sentence, resplit) {
                (Some(path), _) => pipeline.render_fused(&response, &read_transcript(path)?)?,
                (None, Some(path)) => {
                    pipeline.render_resplit(&response, &read_sentences(path)?)?
                }
                (None, None) => pipeline.render_response(&response)?,
            };
            print_json(&plan)
        }
        Commands::Transcribe {
            audio,
            server,
            gemini_api_key,
        } => {
            let config = resolve_config(&cli)?;
            let measure = EstimatedMeasure::new(config.font_size);
            let mut request = TranscriptRequest::new(audio, config.level);
            request.gemini_api_key = gemini_api_key.clone();

            let pipeline = CaptionPipeline::new(config, &measure)?;
            let source = HttpTranscriptSource::new(server.as_str())?;
            let plan = pipeline
                .transcribe(&source, &request)
                .with_context(|| format!("transcribing {}", audio.display()))?;
            print_json(&plan)
        }
        Commands::Health { server } => {
            let source = HttpTranscriptSource::new(server.as_str())?;
            let health = source
                .health()
                .with_context(|| format!("service at {server} is not reachable"))?;
            print_json(&health)
        }
        Commands::Preset { command } => run_preset(&cli, command),
    }
}

fn run_preset(cli: &Cli, command: &PresetCommands) -> Result<()> {
    let db = open_db(cli.db.as_deref())?;
    match command {
        PresetCommands::Save { name } => {
            let config = resolve_config_with(&db, &cli.config)?;
            let preset = Preset::new(name.as_str(), config);
            db.save(&preset)
                .with_context(|| format!("saving preset {name:?}"))?;
            tracing::info!(name = %preset.name, "preset_saved");
            print_json(&preset)
        }
        PresetCommands::Show { name } => {
            let preset = db.get(name).with_context(|| format!("loading preset {name:?}"))?;
            print_json(&preset)
        }
        PresetCommands::List => print_json(&db.list()?),
        PresetCommands::Delete { name } => {
            db.delete(name)
                .with_context(|| format!("deleting preset {name:?}"))?;
            tracing::info!(name = %name, "preset_deleted");
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    if cli.config.preset.is_none() {
        return Ok(cli.config.apply(Config::default()));
    }
    let db = open_db(cli.db.as_deref())?;
    resolve_config_with(&db, &cli.config)
}

fn resolve_config_with(db: &Database, args: &ConfigArgs) -> Result<Config> {
    let base = match &args.preset {
        Some(name) => {
            db.get(name)
                .with_context(|| format!("loading preset {name:?}"))?
                .config
        }
        None => Config::default(),
    };
    Ok(args.apply(base))
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("subburn")
        .join("presets.db")
}

fn open_db(path: Option<&Path>) -> Result<Database> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_db_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Database::open(&path).with_context(|| format!("opening preset database {}", path.display()))
}

fn read_transcript(path: &Path) -> Result<TranscriptResponse> {
    let body =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    TranscriptResponse::parse(&body).with_context(|| format!("parsing {}", path.display()))
}

fn read_sentences(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
