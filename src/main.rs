use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use prose_miner::config::Lexicon;
use prose_miner::domain::{ChapterText, EntityRecord, ExtractionReport};
use prose_miner::{ingest, logging, tagger, ExtractionPipeline};

#[derive(Parser)]
#[command(name = "prose_miner")]
#[command(about = "Manuscript named-entity extraction and resolution")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and resolve entities from manuscript text
    Analyze {
        /// Chapter files in reading order, or a single manuscript with --split
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Language of the manuscript
        #[arg(long, default_value = "en")]
        language: String,
        /// Split a single manuscript file into chapters before analysis
        #[arg(long)]
        split: bool,
        /// TOML file overriding the built-in word lists
        #[arg(long)]
        lexicon: Option<PathBuf>,
        /// Emit the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Show how a manuscript would be split into chapters
    SplitPreview {
        /// Manuscript file (.txt or .md)
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            paths,
            language,
            split,
            lexicon,
            json,
        } => {
            println!("🔎 Analyzing manuscript...");

            let chapters = load_chapters(&paths, split)?;
            info!(chapters = chapters.len(), language = %language, "starting analysis");

            let lexicon = match lexicon {
                Some(path) => Lexicon::load(&path)?,
                None => Lexicon::default(),
            };
            let tagger = tagger::for_language(&language)?;
            let pipeline = ExtractionPipeline::with_lexicon(lexicon);

            match pipeline.analyze(tagger.as_ref(), &chapters) {
                Ok(report) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        print_report(&report);
                    }
                }
                Err(e) => {
                    error!("Analysis failed: {}", e);
                    println!("❌ Analysis failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::SplitPreview { path } => {
            println!("📖 Splitting manuscript...");

            let text = ingest::read_manuscript(&path)?;
            let splits = ingest::split_chapters(&text);

            println!("\n📊 Proposed chapters: {}", splits.len());
            for (i, split) in splits.iter().enumerate() {
                println!("\n{}. {} ({} words)", i + 1, split.title, split.word_count);
                println!("   {}", split.preview.replace('\n', " "));
            }
        }
    }
    Ok(())
}

/// Build the ordered chapter batch: either each path is one chapter, or a
/// single manuscript gets split heuristically.
fn load_chapters(paths: &[PathBuf], split: bool) -> anyhow::Result<Vec<ChapterText>> {
    if split {
        if paths.len() != 1 {
            bail!("--split takes exactly one manuscript file");
        }
        let text = ingest::read_manuscript(&paths[0])?;
        let splits = ingest::split_chapters(&text);
        return Ok(ingest::to_chapter_texts(&splits));
    }

    let mut chapters = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        let content = ingest::read_manuscript(path)?;
        chapters.push(ChapterText { index, content });
    }
    Ok(chapters)
}

fn print_report(report: &ExtractionReport) {
    println!("\n📊 Extraction Results:");
    println!("   Confident: {}", report.confident.len());
    println!("   Needs review: {}", report.low_confidence.len());

    if !report.confident.is_empty() {
        println!("\n✅ Confident entities:");
        for record in &report.confident {
            print_record(record);
        }
    }
    if !report.low_confidence.is_empty() {
        println!("\n⚠️  Needs review:");
        for record in &report.low_confidence {
            print_record(record);
        }
    }
}

fn print_record(record: &EntityRecord) {
    let kind = record
        .suggested_kind
        .map(|k| k.as_str())
        .unwrap_or("unknown");
    let aliases = if record.aliases.is_empty() {
        String::new()
    } else {
        format!(" (aka {})", record.aliases.join(", "))
    };
    println!(
        "   - {} [{}] ×{} in {} chapter(s){}",
        record.name, kind, record.frequency, record.chapter_count, aliases
    );
}
