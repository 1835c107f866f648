//! Sequential track analysis pipeline.
//!
//! Drives per-track processing in input order: cached sentiment, otherwise
//! lyric fetch + scoring + write-through to the cache, then folds everything
//! into the weekly mood timeline. One track is in flight at a time, which
//! bounds outbound request concurrency to 1 and gives the remote source
//! natural backpressure.

pub mod timeline;

use crate::cache::CacheStore;
use crate::cache::kv::KvStore;
use crate::lyrics::{LyricsBackend, LyricsProvider};
use crate::model::{
    AnalyzedTrack, MoodResponse, ProcessingProgress, ProcessingStats, RunCacheStats, Stage, Track,
};
use crate::scorer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Delay after each per-track cache write, yielding control back to the
/// runtime between tracks. Not a correctness requirement.
const YIELD_DELAY: Duration = Duration::from_millis(10);

/// Shared flag to abort a running analysis.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The run was aborted; no partial results are returned.
    #[error("analysis cancelled")]
    Cancelled,
}

pub struct Pipeline<S: KvStore, B: LyricsBackend> {
    cache: CacheStore<S>,
    provider: LyricsProvider<B>,
}

impl<S: KvStore, B: LyricsBackend> Pipeline<S, B> {
    pub fn new(cache: CacheStore<S>, provider: LyricsProvider<B>) -> Self {
        Self { cache, provider }
    }

    /// Analyze `tracks` in order and aggregate the results into a weekly
    /// timeline. Remote and cache failures are absorbed; the only error a
    /// caller sees is [`PipelineError::Cancelled`].
    pub async fn analyze_tracks(
        &mut self,
        tracks: &[Track],
        mut on_progress: impl FnMut(ProcessingProgress),
        cancel: &CancelToken,
    ) -> Result<MoodResponse, PipelineError> {
        let started = Instant::now();
        let total = tracks.len();
        let mut cached_lyrics = 0;
        let mut cached_sentiment = 0;
        let mut new_analysis = 0;
        let mut enriched: Vec<AnalyzedTrack> = Vec::with_capacity(total);

        for (index, track) in tracks.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("analysis cancelled after {index} of {total} tracks");
                return Err(PipelineError::Cancelled);
            }

            let label = format!("{} - {}", track.name, track.artists);
            on_progress(ProcessingProgress {
                current: index + 1,
                total,
                current_track: label.clone(),
                stage: Stage::FetchingLyrics,
            });

            if let Some(sentiment) = self.cache.get_sentiment(&track.id) {
                cached_sentiment += 1;
                enriched.push(AnalyzedTrack {
                    track: track.clone(),
                    sentiment,
                });
                continue;
            }

            on_progress(ProcessingProgress {
                current: index + 1,
                total,
                current_track: label,
                stage: Stage::AnalyzingSentiment,
            });

            let lyrics = self
                .provider
                .get_lyrics(&mut self.cache, &track.id, &track.name, &track.artists)
                .await;
            if lyrics.cached {
                cached_lyrics += 1;
            }

            let sentiment = scorer::score(&lyrics.lyrics);
            self.cache.put_sentiment(&track.id, &sentiment);
            new_analysis += 1;
            debug!(
                "analyzed {} ({} words, source {:?}, url {:?})",
                track.id, sentiment.word_count, lyrics.source, lyrics.url
            );

            enriched.push(AnalyzedTrack {
                track: track.clone(),
                sentiment,
            });

            tokio::time::sleep(YIELD_DELAY).await;
        }

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        on_progress(ProcessingProgress {
            current: total,
            total,
            current_track: String::new(),
            stage: Stage::AggregatingData,
        });

        let timeline = timeline::build(&enriched);

        on_progress(ProcessingProgress {
            current: total,
            total,
            current_track: String::new(),
            stage: Stage::Complete,
        });

        let stats = self.cache.stats();
        info!(
            "analyzed {total} tracks in {:?} ({cached_sentiment} cached, {new_analysis} new)",
            started.elapsed()
        );

        Ok(MoodResponse {
            timeline,
            tracks: enriched,
            processing_stats: ProcessingStats {
                total_tracks: total,
                cached_lyrics,
                cached_sentiment,
                new_analysis,
                processing_time_ms: started.elapsed().as_millis() as u64,
            },
            cache_stats: RunCacheStats {
                hit_rate: stats.hit_rate,
                total_size: stats.total_size,
                entry_count: stats.lyrics_count + stats.sentiment_count,
            },
        })
    }
}
