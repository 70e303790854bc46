use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use narravox_app::export::export;
use narravox_app::pipeline::{Pipeline, SegmentReport};
use narravox_audio::wav;
use narravox_foundation::Settings;
use narravox_script::read_document;
use narravox_tts::presets_for_language;
use narravox_tts_espeak::EspeakEngine;

#[derive(Parser)]
#[command(name = "narravox", about = "Generate speech audio from scripts and documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate dialogue audio from a speaker-tagged script
    Dialogue {
        /// Dialogue script path
        script: PathBuf,
        /// Output audio file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Silence between lines (ms)
        #[arg(long, default_value_t = 500)]
        silence: u32,
    },
    /// Generate narration audio from a text/markdown file
    Narrate {
        /// Input file path
        input: PathBuf,
        /// Output audio file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Voice name to use
        #[arg(long)]
        voice: Option<String>,
        /// Silence between sections (ms)
        #[arg(long, default_value_t = 1000)]
        silence: u32,
        /// Generate separate files per section
        #[arg(long)]
        split_chapters: bool,
    },
    /// Build an audio track with optional background music
    Track {
        /// Dialogue script path
        script: PathBuf,
        /// Output audio file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Background music file (WAV)
        #[arg(long)]
        bgm: Option<PathBuf>,
        /// BGM volume shift (dB)
        #[arg(long, default_value_t = -15.0)]
        bgm_volume: f64,
        /// Gap between lines (ms)
        #[arg(long, default_value_t = 300)]
        gap: u64,
    },
    /// Convert a plain document to a single narration
    Convert {
        /// Input document path (.txt, .md)
        input: PathBuf,
        /// Output audio file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Voice name to use
        #[arg(long)]
        voice: Option<String>,
    },
    /// List preset voices
    Voices {
        /// Language code
        #[arg(long, default_value = "ja-JP")]
        lang: String,
    },
}

fn init_logging() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_skipped(skipped: &[SegmentReport]) {
    for report in skipped {
        let line = report
            .line_number
            .map(|n| format!(" (line {})", n))
            .unwrap_or_default();
        eprintln!(
            "warning: segment {}{} [{}] skipped: {}",
            report.index, line, report.label, report.error
        );
    }
}

fn make_pipeline(settings: Settings) -> Pipeline {
    Pipeline::new(settings, Box::new(EspeakEngine::new()))
}

/// Default output path: configured output directory, input stem, `.mp3`.
fn default_output(settings: &Settings, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    settings.output_dir.join(format!("{stem}.mp3"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    match cli.command {
        Command::Dialogue {
            script,
            output,
            silence,
        } => {
            let output = output.unwrap_or_else(|| default_output(&settings, &script));
            let text = read_document(&script)?;
            let mut pipeline = make_pipeline(settings.clone());
            pipeline.ensure_ready().await?;

            let result = pipeline.run_dialogue(&text, silence).await?;
            print_skipped(&result.skipped);
            let outcome = export(&result.audio, &output).await?;
            println!(
                "Saved: {} ({} segments{})",
                outcome.path.display(),
                result.synthesized,
                if outcome.fell_back { ", WAV fallback" } else { "" }
            );
        }
        Command::Narrate {
            input,
            output,
            voice,
            silence,
            split_chapters,
        } => {
            let output = output.unwrap_or_else(|| default_output(&settings, &input));
            let text = read_document(&input)?;
            let mut pipeline = make_pipeline(settings.clone());
            pipeline.ensure_ready().await?;

            let result = pipeline
                .run_narration(&text, voice.as_deref(), silence, split_chapters)
                .await?;
            print_skipped(&result.skipped);

            if let Some(combined) = &result.combined {
                let outcome = export(combined, &output).await?;
                println!("Saved: {}", outcome.path.display());
            }
            for (i, (title, audio)) in result.chapters.iter().enumerate() {
                let stem = output
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("narration");
                let chapter_path = output.with_file_name(format!(
                    "{}_{:02}_{}.{}",
                    stem,
                    i,
                    title,
                    output.extension().and_then(|e| e.to_str()).unwrap_or("mp3")
                ));
                let outcome = export(audio, &chapter_path).await?;
                println!("Saved: {}", outcome.path.display());
            }
        }
        Command::Track {
            script,
            output,
            bgm,
            bgm_volume,
            gap,
        } => {
            let output = output.unwrap_or_else(|| default_output(&settings, &script));
            let text = read_document(&script)?;
            let bgm_audio = bgm
                .map(|path| wav::read_wav(&path).context("reading background music"))
                .transpose()?;
            let mut pipeline = make_pipeline(settings.clone());
            pipeline.ensure_ready().await?;

            let result = pipeline
                .run_track(&text, gap, bgm_audio.as_ref(), bgm_volume)
                .await?;
            print_skipped(&result.skipped);
            let outcome = export(&result.audio, &output).await?;
            println!("Saved: {}", outcome.path.display());
        }
        Command::Convert {
            input,
            output,
            voice,
        } => {
            let output = output.unwrap_or_else(|| default_output(&settings, &input));
            let text = read_document(&input)?;
            let mut pipeline = make_pipeline(settings.clone());
            pipeline.ensure_ready().await?;

            let result = pipeline
                .run_narration(&text, voice.as_deref(), 1000, false)
                .await?;
            print_skipped(&result.skipped);
            let combined = result.combined.context("missing combined narration output")?;
            let outcome = export(&combined, &output).await?;
            println!("Saved: {}", outcome.path.display());
        }
        Command::Voices { lang } => {
            for voice in presets_for_language(&lang) {
                println!(
                    "{}\t{}\trate {:.2}\tpitch {:.1}",
                    voice.name, voice.language_code, voice.speaking_rate, voice.pitch
                );
            }
        }
    }

    Ok(())
}
