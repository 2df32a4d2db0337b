use crate::alignment::edit_distance::{edit_distance, max_char_len, within_fuzzy_threshold};
use crate::alignment::normalization::normalize_word;
use crate::config::ScoringConfig;
use crate::types::{Alignment, AsrWord};

/// Needleman-Wunsch alignment of raw script words against ASR words.
pub fn global_align(script_words: &[String], asr_words: &[AsrWord], scoring: &ScoringConfig) -> Alignment {
    let script_norm: Vec<String> = script_words.iter().map(|w| normalize_word(w)).collect();
    let asr_norm: Vec<String> = asr_words.iter().map(|w| normalize_word(&w.word)).collect();
    align_normalized(&script_norm, &asr_norm, scoring)
}

/// Needleman-Wunsch alignment over already-normalized tokens.
///
/// Tokens that normalize to the empty string (pure punctuation) take no part
/// in the DP: script-side ones stay unaligned and ASR-side ones are never
/// referenced. Mismatched diagonal steps are still recorded as aligned.
pub fn align_normalized(script_norm: &[String], asr_norm: &[String], scoring: &ScoringConfig) -> Alignment {
    let mut indices = vec![None; script_norm.len()];

    let script_pos: Vec<usize> = (0..script_norm.len())
        .filter(|&i| !script_norm[i].is_empty())
        .collect();
    let asr_pos: Vec<usize> = (0..asr_norm.len())
        .filter(|&j| !asr_norm[j].is_empty())
        .collect();
    let n = script_pos.len();
    let m = asr_pos.len();
    if n == 0 || m == 0 {
        return Alignment { indices };
    }

    let pair_score = |i: usize, j: usize| -> i32 {
        match_score(&script_norm[script_pos[i]], &asr_norm[asr_pos[j]], scoring)
    };

    let width = m + 1;
    let mut score = vec![0i32; (n + 1) * width];
    for i in 1..=n {
        score[i * width] = i as i32 * scoring.gap_penalty;
    }
    for j in 1..=m {
        score[j] = j as i32 * scoring.gap_penalty;
    }

    for i in 1..=n {
        let row = i * width;
        let prev_row = (i - 1) * width;
        for j in 1..=m {
            let diagonal = score[prev_row + j - 1] + pair_score(i - 1, j - 1);
            let skip_asr = score[row + j - 1] + scoring.gap_penalty;
            let skip_script = score[prev_row + j] + scoring.gap_penalty;
            score[row + j] = diagonal.max(skip_asr).max(skip_script);
        }
    }

    // Tie-break order: diagonal, then skip ASR word, then skip script word.
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        let current = score[i * width + j];
        if current == score[(i - 1) * width + j - 1] + pair_score(i - 1, j - 1) {
            indices[script_pos[i - 1]] = Some(asr_pos[j - 1]);
            i -= 1;
            j -= 1;
        } else if current == score[i * width + j - 1] + scoring.gap_penalty {
            j -= 1;
        } else {
            i -= 1;
        }
    }

    let alignment = Alignment { indices };
    tracing::debug!(
        script_words = script_norm.len(),
        asr_words = asr_norm.len(),
        aligned = alignment.aligned_count(),
        final_score = score[n * width + m],
        "global alignment complete"
    );
    alignment
}

/// Diagonal score for one token pair: exact, fuzzy, or mismatch.
pub fn match_score(a: &str, b: &str, scoring: &ScoringConfig) -> i32 {
    if a == b {
        return scoring.match_score;
    }
    let max_len = max_char_len(a, b);
    if max_len == 0 {
        return scoring.mismatch_penalty;
    }
    let distance = edit_distance(a, b);
    if within_fuzzy_threshold(distance, max_len, scoring.fuzzy_ratio, 0) {
        scoring.match_score - distance as i32
    } else {
        scoring.mismatch_penalty
    }
}
