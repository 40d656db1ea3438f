use serde::{Deserialize, Serialize};

/// Separators tried in order: paragraph, line, sentence, word, character.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    pub content: String,
    /// Byte offset of the chunk within the fetched content.
    pub offset: usize,
    pub chunk_index: usize,
}

impl ContentChunk {
    pub fn new(content: impl Into<String>, offset: usize, chunk_index: usize) -> Self {
        Self {
            content: content.into(),
            offset,
            chunk_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: ContentChunk,
    pub score: f32,
}

/// Recursive, boundary-aware splitter producing overlapping chunks.
///
/// Text is cut on the coarsest separator present. Pieces that still exceed
/// `chunk_size` are split again with the next finer separator. Adjacent
/// pieces are then merged back up to `chunk_size` bytes, carrying up to
/// `chunk_overlap` bytes of the previous chunk into the next one.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap: chunk_overlap.min(chunk_size.saturating_sub(1)),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split(&self, content: &str) -> Vec<ContentChunk> {
        let separators: Vec<&str> = self.separators.iter().map(String::as_str).collect();
        let texts = self.split_recursive(content, &separators);

        let mut chunks = Vec::with_capacity(texts.len());
        let mut cursor = 0;
        for (chunk_index, text) in texts.into_iter().enumerate() {
            let offset = match content[cursor..].find(&text) {
                Some(pos) => cursor + pos,
                None => content.find(&text).unwrap_or(cursor),
            };
            cursor = offset + text.chars().next().map_or(1, char::len_utf8);
            cursor = cursor.min(content.len());
            chunks.push(ContentChunk::new(text, offset, chunk_index));
        }
        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let Some(position) = separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s))
        else {
            return self.merge(&[text]);
        };
        let separator = separators[position];
        let finer = &separators[position + 1..];

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split_inclusive(separator).collect()
        };

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for piece in pieces {
            if piece.len() <= self.chunk_size {
                pending.push(piece);
                continue;
            }
            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }
            if finer.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }
        chunks
    }

    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: std::collections::VecDeque<&str> = std::collections::VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = piece.len();
            if total + len > self.chunk_size && !window.is_empty() {
                push_joined(&mut chunks, &window);
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    let Some(first) = window.pop_front() else {
                        break;
                    };
                    total = total.saturating_sub(first.len());
                }
            }
            window.push_back(piece);
            total += len;
        }
        push_joined(&mut chunks, &window);
        chunks
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

fn push_joined(chunks: &mut Vec<String>, window: &std::collections::VecDeque<&str>) {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_is_one_chunk() {
        let splitter = TextSplitter::default();
        let chunks = splitter.split("Batman is a superhero.");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Batman is a superhero.");
        assert_eq!(chunks[0].offset, 0);
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn test_empty_content() {
        let splitter = TextSplitter::default();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("  \n\n  ").is_empty());
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let splitter = TextSplitter::new(30, 0);
        let content = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        let chunks = splitter.split(content);

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(
            texts,
            vec!["First paragraph.", "Second paragraph.", "Third paragraph."]
        );
        assert_eq!(chunks[1].offset, content.find("Second").unwrap());
        assert_eq!(chunks[2].chunk_index, 2);
    }

    #[test]
    fn test_falls_back_to_words_for_long_sentences() {
        let splitter = TextSplitter::new(20, 0);
        let content = "alpha beta gamma delta epsilon zeta eta theta";
        let chunks = splitter.split(content);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.content.len() <= 20, "{:?} too long", chunk.content);
            assert_eq!(&content[chunk.offset..chunk.offset + chunk.content.len()], chunk.content);
        }
    }

    #[test]
    fn test_overlap_repeats_tail_words() {
        let splitter = TextSplitter::new(20, 10);
        let chunks = splitter.split("one two three four five six seven eight nine ten");

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let last_word = pair[0].content.split(' ').last().unwrap();
            assert!(
                pair[1].content.contains(last_word),
                "{:?} does not overlap {:?}",
                pair[1].content,
                pair[0].content
            );
        }
    }

    #[test]
    fn test_character_fallback_respects_utf8() {
        let splitter = TextSplitter::new(4, 0);
        let chunks = splitter.split("ééééé");

        assert!(chunks.iter().all(|c| c.content.len() <= 4));
        let rebuilt: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(rebuilt, "ééééé");
    }

    #[test]
    fn test_overlap_clamped_below_size() {
        let splitter = TextSplitter::new(10, 50);
        assert_eq!(splitter.chunk_overlap(), 9);
    }
}
