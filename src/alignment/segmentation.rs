use crate::alignment::normalization::normalize_word;
use crate::types::{Chunk, ScriptToken};

const SENTENCE_TERMINALS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

fn is_sentence_terminal(c: char) -> bool {
    SENTENCE_TERMINALS.contains(&c)
}

/// Split on runs of terminal punctuation, keeping the run on the sentence
/// it closes. Trailing text without a terminal is its own sentence.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = collapsed.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if !is_sentence_terminal(c) {
            continue;
        }
        while let Some(&next) = chars.peek() {
            if !is_sentence_terminal(next) {
                break;
            }
            current.push(next);
            chars.next();
        }
        push_trimmed(&mut sentences, &current);
        current.clear();
    }
    push_trimmed(&mut sentences, &current);
    sentences
}

fn push_trimmed(out: &mut Vec<String>, sentence: &str) {
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Greedy word-boundary chunking. Lengths are in chars; a single word wider
/// than `max_chars` stays whole in a chunk of its own.
pub fn split_into_chunks(sentence: &str, max_chars: usize) -> Vec<String> {
    if sentence.chars().count() <= max_chars {
        return vec![sentence.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in sentence.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
            continue;
        }
        if current_len + 1 + word_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Sentences, then display chunks, with token bookkeeping.
///
/// Script tokens are the whitespace-separated words of the chunks in order,
/// so `chunk.token_range()` always indexes the returned token list.
pub fn segment(text: &str, max_chars: usize) -> (Vec<Chunk>, Vec<ScriptToken>) {
    let mut chunks = Vec::new();
    let mut tokens = Vec::new();

    for sentence in split_into_sentences(text) {
        for chunk_text in split_into_chunks(&sentence, max_chars) {
            let start_token = tokens.len();
            tokens.extend(chunk_text.split_whitespace().map(|surface| ScriptToken {
                surface: surface.to_string(),
                normalized: normalize_word(surface),
            }));
            chunks.push(Chunk {
                token_count: tokens.len() - start_token,
                start_token,
                text: chunk_text,
            });
        }
    }

    (chunks, tokens)
}
