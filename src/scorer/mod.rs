//! Lexicon-based sentiment scorer.
//!
//! Pure bag-of-words scoring against fixed weighted word lists. Same text in,
//! bit-identical result out — no I/O, no state, total on any input.

pub mod language;
pub mod lexicon;

use crate::model::{Emotions, SentimentResult, round3};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Cache entries scored with a different version are invalid.
pub const ALGORITHM_VERSION: &str = "1.0.0";

const KEY_PHRASE_LIMIT: usize = 5;

static SECTION_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid section marker pattern"));
static REPEAT_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*x\d+\)").expect("valid repeat marker pattern"));
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation pattern"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Score a lyric text. Deterministic and total; empty or unscorable input
/// yields [`SentimentResult::zero`].
pub fn score(text: &str) -> SentimentResult {
    let cleaned = clean_lyrics(text);
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let scoring: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|word| word.chars().count() > 2)
        .collect();
    let word_count = scoring.len();

    if word_count == 0 {
        return SentimentResult::zero();
    }

    let language = language::detect(text);

    let mut raw = [0.0f64; 6];
    let mut emotion_hits = 0u32;
    let mut high_energy = 0.0f64;
    let mut low_energy = 0.0f64;

    for word in &scoring {
        for (slot, list) in raw.iter_mut().zip(lexicon::EMOTIONS.all()) {
            if list.contains(word) {
                *slot += list.weight;
                emotion_hits += 1;
            }
        }
        if lexicon::ENERGY.high.contains(word) {
            high_energy += lexicon::ENERGY.high.weight;
        }
        if lexicon::ENERGY.low.contains(word) {
            low_energy += lexicon::ENERGY.low.weight;
        }
    }

    let count = word_count as f64;
    let normalize = |total: f64| (total / count * 10.0).min(1.0);
    let emotions = Emotions {
        joy: normalize(raw[0]),
        sadness: normalize(raw[1]),
        anger: normalize(raw[2]),
        fear: normalize(raw[3]),
        surprise: normalize(raw[4]),
        disgust: normalize(raw[5]),
    };

    // Surprise carries no valence sign.
    let valence = ((emotions.joy - emotions.sadness - emotions.anger - emotions.fear
        - emotions.disgust)
        * 2.0)
        .clamp(-1.0, 1.0);
    let energy = (0.5 + (high_energy - low_energy) / count * 5.0).clamp(0.0, 1.0);
    let confidence = (f64::from(emotion_hits) / count * 5.0).min(1.0);

    SentimentResult {
        valence: round3(valence),
        energy: round3(energy),
        emotions: emotions.rounded(),
        language: language.to_string(),
        confidence: round3(confidence),
        word_count: word_count as u32,
        key_phrases: extract_key_phrases(&tokens),
    }
}

/// Strip section headers, `(... xN)` repeat markers and punctuation, collapse
/// whitespace, lower-case.
fn clean_lyrics(lyrics: &str) -> String {
    let text = SECTION_MARKERS.replace_all(lyrics, " ");
    let text = REPEAT_MARKERS.replace_all(&text, " ");
    let text = PUNCTUATION.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_lowercase()
}

/// All 2-word windows where both tokens are longer than 3 chars, and all
/// 3-word windows where the outer tokens are longer than 3 and the middle one
/// longer than 2, ranked by frequency. Ties keep first-encountered order.
fn extract_key_phrases(tokens: &[&str]) -> Vec<String> {
    let lengths: Vec<usize> = tokens.iter().map(|t| t.chars().count()).collect();
    let mut phrases: Vec<String> = Vec::new();

    for i in 0..tokens.len().saturating_sub(1) {
        if lengths[i] > 3 && lengths[i + 1] > 3 {
            phrases.push(format!("{} {}", tokens[i], tokens[i + 1]));
        }
        if i + 2 < tokens.len() && lengths[i] > 3 && lengths[i + 1] > 2 && lengths[i + 2] > 3 {
            phrases.push(format!("{} {} {}", tokens[i], tokens[i + 1], tokens[i + 2]));
        }
    }

    let mut ranked: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for phrase in phrases {
        match index.get(&phrase) {
            Some(&at) => ranked[at].1 += 1,
            None => {
                index.insert(phrase.clone(), ranked.len());
                ranked.push((phrase, 1));
            }
        }
    }

    // Stable sort, so equal counts stay in first-encountered order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(KEY_PHRASE_LIMIT)
        .map(|(phrase, _)| phrase)
        .collect()
}
