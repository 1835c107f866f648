//! Shared data types for tracks, sentiment results and the mood timeline.

use serde::{Deserialize, Serialize};

/// A liked track as handed in by the caller. Immutable once given to the
/// pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// Artist display string (already joined by the upstream provider).
    pub artists: String,
    /// RFC 3339 timestamp of when the track was saved.
    pub added_at: String,
}

/// Per-emotion scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Emotions {
    pub joy: f64,
    pub sadness: f64,
    pub anger: f64,
    pub fear: f64,
    pub surprise: f64,
    pub disgust: f64,
}

impl Emotions {
    pub fn add(&mut self, other: &Emotions) {
        self.joy += other.joy;
        self.sadness += other.sadness;
        self.anger += other.anger;
        self.fear += other.fear;
        self.surprise += other.surprise;
        self.disgust += other.disgust;
    }

    pub fn divided(&self, divisor: f64) -> Emotions {
        Emotions {
            joy: self.joy / divisor,
            sadness: self.sadness / divisor,
            anger: self.anger / divisor,
            fear: self.fear / divisor,
            surprise: self.surprise / divisor,
            disgust: self.disgust / divisor,
        }
    }

    /// Round every score to 3 decimal places.
    pub fn rounded(&self) -> Emotions {
        Emotions {
            joy: round3(self.joy),
            sadness: round3(self.sadness),
            anger: round3(self.anger),
            fear: round3(self.fear),
            surprise: round3(self.surprise),
            disgust: round3(self.disgust),
        }
    }
}

/// Output of the lexicon scorer for one text.
///
/// All float fields are rounded to 3 decimal places before the value leaves
/// the scorer, so results compare bit-identical across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    /// Overall positivity in `[-1, 1]`.
    pub valence: f64,
    /// Arousal level in `[0, 1]`, `0.5` is neutral.
    pub energy: f64,
    pub emotions: Emotions,
    /// Two-letter language code from the stop-word heuristic.
    pub language: String,
    pub confidence: f64,
    pub word_count: u32,
    /// Up to 5 most frequent 2-3 word phrases, most frequent first.
    pub key_phrases: Vec<String>,
}

impl SentimentResult {
    /// The defined result for text with no scorable tokens.
    pub fn zero() -> Self {
        Self {
            valence: 0.0,
            energy: 0.5,
            emotions: Emotions::default(),
            language: "en".to_string(),
            confidence: 0.0,
            word_count: 0,
            key_phrases: Vec::new(),
        }
    }
}

/// Where a lyric text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsSource {
    Cache,
    Provider,
    Mock,
}

/// A track merged with its resolved sentiment.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedTrack {
    #[serde(flatten)]
    pub track: Track,
    pub sentiment: SentimentResult,
}

/// One point of the weekly mood timeline. `week` is the ISO date of the
/// Sunday starting that week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodPoint {
    pub week: String,
    pub valence: f64,
    pub energy: f64,
    pub emotions: Emotions,
    pub track_count: usize,
}

/// Pipeline stage reported through the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingLyrics,
    AnalyzingSentiment,
    AggregatingData,
    Complete,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::FetchingLyrics => "fetching_lyrics",
            Stage::AnalyzingSentiment => "analyzing_sentiment",
            Stage::AggregatingData => "aggregating_data",
            Stage::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingProgress {
    pub current: usize,
    pub total: usize,
    pub current_track: String,
    pub stage: Stage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub total_tracks: usize,
    pub cached_lyrics: usize,
    pub cached_sentiment: usize,
    pub new_analysis: usize,
    pub processing_time_ms: u64,
}

/// Cache-wide numbers reported alongside a pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCacheStats {
    pub hit_rate: f64,
    pub total_size: usize,
    pub entry_count: usize,
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodResponse {
    pub timeline: Vec<MoodPoint>,
    pub tracks: Vec<AnalyzedTrack>,
    pub processing_stats: ProcessingStats,
    pub cache_stats: RunCacheStats,
}

/// Round to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round3_rounds_to_three_decimals() {
        assert_eq!(round3(0.123456), 0.123);
        assert_eq!(round3(1.2345678), 1.235);
        assert_eq!(round3(-0.1234), -0.123);
        assert_eq!(round3(0.0), 0.0);
    }

    #[test]
    fn zero_result_shape() {
        let z = SentimentResult::zero();
        assert_eq!(z.valence, 0.0);
        assert_eq!(z.energy, 0.5);
        assert_eq!(z.emotions, Emotions::default());
        assert_eq!(z.language, "en");
        assert_eq!(z.word_count, 0);
        assert!(z.key_phrases.is_empty());
    }

    #[test]
    fn sentiment_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(SentimentResult::zero()).unwrap();
        assert!(json.get("wordCount").is_some());
        assert!(json.get("keyPhrases").is_some());
    }

    #[test]
    fn lyrics_source_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LyricsSource::Provider).unwrap(),
            "\"provider\""
        );
        assert_eq!(serde_json::to_string(&LyricsSource::Mock).unwrap(), "\"mock\"");
    }
}
