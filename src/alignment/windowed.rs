use crate::alignment::edit_distance::{edit_distance, max_char_len, within_fuzzy_threshold};
use crate::alignment::normalization::normalize_window_target;
use crate::config::WindowConfig;
use crate::types::AsrWord;

/// Outcome of matching one chunk against the ASR stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMatch {
    pub start_time: Option<f64>,
    /// Cursor for the next chunk; unchanged when nothing matched.
    pub new_cursor: usize,
    pub matched: bool,
    pub chunk_word_count: usize,
    pub matched_index: Option<usize>,
}

/// Best ASR index for `target` inside `[search_start, search_start + lookahead)`.
///
/// An exact match wins immediately; otherwise the smallest accepted edit
/// distance, earliest index on ties.
///
/// Acceptance uses the shared fuzzy rule `max(min_fuzzy_distance,
/// fuzzy_ratio * longer length)`, not a bound on the target length alone
/// (`len(target) / 3`), so a long candidate is judged a little more
/// leniently than a target-only bound would.
pub fn find_best_match(
    target: &str,
    asr_normalized: &[String],
    search_start: usize,
    window: &WindowConfig,
    fuzzy_ratio: f64,
) -> Option<usize> {
    if target.is_empty() || search_start >= asr_normalized.len() {
        return None;
    }
    let search_end = search_start
        .saturating_add(window.lookahead_words)
        .min(asr_normalized.len());

    let mut best: Option<(usize, usize)> = None;
    for (idx, candidate) in asr_normalized
        .iter()
        .enumerate()
        .take(search_end)
        .skip(search_start)
    {
        if candidate.is_empty() {
            continue;
        }
        if candidate == target {
            return Some(idx);
        }
        let distance = edit_distance(target, candidate);
        let accepted = within_fuzzy_threshold(
            distance,
            max_char_len(target, candidate),
            fuzzy_ratio,
            window.min_fuzzy_distance,
        );
        if accepted && best.map_or(true, |(_, d)| distance < d) {
            best = Some((idx, distance));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Locate a chunk's start in the ASR stream by trying its leading words.
///
/// The search floor `cursor + prev_chunk_word_count / 2` keeps short common
/// words from re-matching inside the span the previous chunk consumed.
pub fn match_chunk(
    chunk_words: &[&str],
    asr_words: &[AsrWord],
    asr_normalized: &[String],
    cursor: usize,
    prev_chunk_word_count: usize,
    window: &WindowConfig,
    fuzzy_ratio: f64,
) -> ChunkMatch {
    let chunk_word_count = chunk_words.len();
    let min_search_idx = cursor + prev_chunk_word_count / 2;

    for (word_offset, word) in chunk_words
        .iter()
        .take(window.candidate_words)
        .enumerate()
    {
        let target = normalize_window_target(word);
        let Some(idx) = find_best_match(&target, asr_normalized, min_search_idx, window, fuzzy_ratio)
        else {
            continue;
        };

        // Unmatched leading words are presumed spoken just before the hit.
        let start_idx = if word_offset > 0 && idx > 0 { idx - 1 } else { idx };
        tracing::debug!(
            word = *word,
            word_offset,
            matched_index = idx,
            asr_word = asr_words[idx].word.as_str(),
            "windowed: chunk anchored"
        );
        return ChunkMatch {
            start_time: Some(asr_words[start_idx].start),
            new_cursor: idx + 1,
            matched: true,
            chunk_word_count,
            matched_index: Some(idx),
        };
    }

    ChunkMatch {
        start_time: None,
        new_cursor: cursor,
        matched: false,
        chunk_word_count,
        matched_index: None,
    }
}
