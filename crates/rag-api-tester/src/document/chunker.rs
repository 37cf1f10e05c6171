use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Packing bound used when no explicit size is configured.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 500;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence end pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub filename: String,
    pub chunk_index: usize,
    pub estimated_tokens: usize,
}

/// Paragraph-first splitter. Paragraphs that fit the bound pass through
/// verbatim; oversized ones are repacked sentence by sentence.
pub struct TextChunker {
    max_chunk_chars: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_CHARS)
    }
}

impl TextChunker {
    pub fn new(max_chunk_chars: usize) -> Self {
        Self { max_chunk_chars }
    }

    /// Chunk a decoded document into bounded passages.
    ///
    /// Never fails: text without split points still comes back as a single
    /// oversized chunk, and blank input yields an empty list.
    pub fn chunk(&self, text: &str, filename: &str) -> Vec<Chunk> {
        debug!("Chunking {}: {} chars", filename, char_len(text));

        let mut chunks = Vec::new();

        for paragraph in PARAGRAPH_BREAK.split(text) {
            if paragraph.trim().is_empty() {
                continue;
            }

            if char_len(paragraph) <= self.max_chunk_chars {
                push_chunk(&mut chunks, paragraph.trim().to_string(), filename);
            } else {
                self.pack_sentences(&mut chunks, paragraph, filename);
            }
        }

        debug!("Created {} chunks", chunks.len());

        chunks
    }

    /// Greedy sentence packing for paragraphs over the bound. The length
    /// check uses the raw fragment, so a joined chunk can run a few chars
    /// past the bound before it is flushed.
    fn pack_sentences(&self, chunks: &mut Vec<Chunk>, paragraph: &str, filename: &str) {
        let mut current = String::new();

        for fragment in SENTENCE_END.split(paragraph) {
            let trimmed = fragment.trim();
            if trimmed.is_empty() {
                continue;
            }

            if !current.is_empty() && char_len(&current) + char_len(fragment) > self.max_chunk_chars
            {
                push_chunk(chunks, terminate(&current), filename);
                current = trimmed.to_string();
            } else if current.is_empty() {
                current.push_str(trimmed);
            } else {
                current.push_str(". ");
                current.push_str(trimmed);
            }
        }

        if !current.is_empty() {
            push_chunk(chunks, terminate(&current), filename);
        }
    }
}

fn push_chunk(chunks: &mut Vec<Chunk>, content: String, filename: &str) {
    let estimated_tokens = char_len(&content).div_ceil(4);
    chunks.push(Chunk {
        id: format!("chunk_{}", chunks.len() + 1),
        metadata: ChunkMetadata {
            filename: filename.to_string(),
            chunk_index: chunks.len(),
            estimated_tokens,
        },
        content,
    });
}

/// Trim and close the accumulated text with a period unless it already
/// ends in terminal punctuation.
fn terminate(accumulated: &str) -> String {
    let trimmed = accumulated.trim();
    if trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
