//! Manuscript ingestion: reading a whole-book file and splitting it into
//! ordered chapters the extraction pipeline can consume.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::domain::ChapterText;
use crate::error::{MinerError, Result};

/// Chapter-like headings: optional markdown marker, a structural keyword,
/// an optional spelled-out or numeric ordinal, then the title remainder.
static CHAPTER_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:#{1,2}\s+)?(?:chapter|prologue|epilogue|part|act|book)\b\s*(?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|\d+)?[\s:.\-—]*(.*)$",
    )
    .unwrap()
});

/// Scene/section delimiter lines.
static DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\*{3,}|-{3,}|#{3,}|={3,})\s*$").unwrap());

/// Consecutive blank lines treated as an implicit chapter break.
const BLANK_LINE_THRESHOLD: usize = 4;

const PREVIEW_CHARS: usize = 150;

/// One proposed chapter from the heuristic split, with enough metadata for a
/// split preview the author can confirm or reject.
#[derive(Debug, Clone)]
pub struct ChapterSplit {
    pub title: String,
    pub content: String,
    pub preview: String,
    pub word_count: usize,
}

/// Read a manuscript file. Plain text and markdown are supported; anything
/// else needs converting before import.
pub fn read_manuscript(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "txt" | "md" => Ok(fs::read_to_string(path)?),
        other => Err(MinerError::UnsupportedFormat(format!(".{other}"))),
    }
}

/// Split manuscript text into chapters using a waterfall of heuristics:
/// heading lines, delimiter lines, then large blank-line gaps. When nothing
/// matches, the whole text becomes a single untitled section.
pub fn split_chapters(text: &str) -> Vec<ChapterSplit> {
    let mut splits: Vec<ChapterSplit> = Vec::new();
    let mut current_title = String::new();
    let mut current_lines: Vec<&str> = Vec::new();
    let mut blank_count = 0usize;

    let flush = |splits: &mut Vec<ChapterSplit>, title: &str, lines: &[&str]| {
        let content = lines.join("\n").trim().to_string();
        if content.is_empty() && title.is_empty() {
            return;
        }
        let title = if title.is_empty() {
            format!("Section {}", splits.len() + 1)
        } else {
            title.to_string()
        };
        splits.push(ChapterSplit {
            preview: content.chars().take(PREVIEW_CHARS).collect(),
            word_count: content.split_whitespace().count(),
            title,
            content,
        });
    };

    for line in text.lines() {
        let stripped = line.trim();

        if !stripped.is_empty() && CHAPTER_HEADING_RE.is_match(stripped) {
            flush(&mut splits, &current_title, &current_lines);
            let heading = stripped.trim_start_matches('#').trim();
            current_title = if heading.is_empty() {
                format!("Chapter {}", splits.len() + 1)
            } else {
                heading.to_string()
            };
            current_lines.clear();
            blank_count = 0;
            continue;
        }

        if DELIMITER_RE.is_match(stripped) {
            if !current_lines.is_empty() {
                flush(&mut splits, &current_title, &current_lines);
                current_title.clear();
                current_lines.clear();
            }
            blank_count = 0;
            continue;
        }

        if stripped.is_empty() {
            blank_count += 1;
            if blank_count >= BLANK_LINE_THRESHOLD && !current_lines.is_empty() {
                flush(&mut splits, &current_title, &current_lines);
                current_title.clear();
                current_lines.clear();
                blank_count = 0;
                continue;
            }
        } else {
            blank_count = 0;
        }

        current_lines.push(line);
    }

    flush(&mut splits, &current_title, &current_lines);

    info!(chapters = splits.len(), "manuscript split complete");
    splits
}

/// Convert confirmed splits into the ordered chapter texts the pipeline
/// consumes, indexed by position.
pub fn to_chapter_texts(splits: &[ChapterSplit]) -> Vec<ChapterText> {
    splits
        .iter()
        .enumerate()
        .map(|(index, split)| ChapterText {
            index,
            content: split.content.clone(),
        })
        .collect()
}
