//! Local cache for fetched lyrics and computed sentiment.
//!
//! Two logical tables (lyrics, sentiment) live as serialized JSON maps in a
//! key-value store, together with running hit/miss counters. Entries carry a
//! creation timestamp and (for sentiment) the scorer version; anything
//! expired or version-mismatched is treated as absent and lazily deleted.
//!
//! The cache is a performance layer, never a correctness dependency: every
//! store failure is logged and absorbed, returning a miss or doing nothing.

pub mod kv;

use crate::model::{LyricsSource, SentimentResult};
use crate::scorer::ALGORITHM_VERSION;
use kv::KvStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

const LYRICS_KEY: &str = "vibelines_lyrics_cache";
const SENTIMENT_KEY: &str = "vibelines_sentiment_cache";
const STATS_KEY: &str = "vibelines_cache_stats";

/// Limits and expiry for the cache tables.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Per-table entry ceiling; oldest entries beyond it are evicted.
    pub max_entries: usize,
    /// Per-table serialized size ceiling; exceeding it evicts the oldest 30%.
    pub max_bytes: usize,
    /// Entry lifetime in milliseconds.
    pub expiry_ms: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_bytes: 50 * 1024 * 1024,
            expiry_ms: 30 * 24 * 60 * 60 * 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLyrics {
    pub track_id: String,
    pub track_name: String,
    pub artist: String,
    pub lyrics: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genius_url: Option<String>,
    /// Unix milliseconds at write time.
    pub timestamp: i64,
    pub source: LyricsSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSentiment {
    pub track_id: String,
    pub sentiment: SentimentResult,
    pub timestamp: i64,
    /// Scorer version at write time; mismatches invalidate the entry.
    pub version: String,
}

trait Timestamped {
    fn timestamp(&self) -> i64;
}

impl Timestamped for CachedLyrics {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Timestamped for CachedSentiment {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Persisted hit/miss counters, so rates survive restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub total_requests: u64,
}

/// Aggregate view over both tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub lyrics_count: usize,
    pub sentiment_count: usize,
    pub total_size: usize,
    pub oldest_entry: i64,
    pub newest_entry: i64,
    pub hit_rate: f64,
    pub miss_rate: f64,
}

/// Transportable dump of the whole cache. Import accepts any subset of the
/// optional parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheExport {
    #[serde(default)]
    pub lyrics: Option<HashMap<String, CachedLyrics>>,
    #[serde(default)]
    pub sentiment: Option<HashMap<String, CachedSentiment>>,
    #[serde(default)]
    pub stats: Option<CacheCounters>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub export_date: Option<String>,
}

pub struct CacheStore<S: KvStore> {
    store: S,
    config: CacheConfig,
    counters: CacheCounters,
}

impl<S: KvStore> CacheStore<S> {
    /// Open the cache over `store`, loading persisted counters and pruning
    /// expired or version-mismatched entries once.
    pub fn new(store: S, config: CacheConfig) -> Self {
        let mut cache = Self {
            store,
            config,
            counters: CacheCounters::default(),
        };
        cache.counters = cache.load_counters();
        cache.cleanup_expired();
        cache
    }

    #[allow(dead_code)]
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, CacheConfig::default())
    }

    fn now_ms() -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }

    fn expired(&self, timestamp: i64, now: i64) -> bool {
        now - timestamp > self.config.expiry_ms
    }

    // --- lyrics table ---

    /// Look up cached lyrics. Expired entries are deleted and count as a
    /// miss.
    pub fn get_lyrics(&mut self, track_id: &str) -> Option<CachedLyrics> {
        let mut table: HashMap<String, CachedLyrics> = self.load_table(LYRICS_KEY);

        let Some(entry) = table.get(track_id).cloned() else {
            self.record_miss();
            return None;
        };

        if self.expired(entry.timestamp, Self::now_ms()) {
            table.remove(track_id);
            self.persist_table(LYRICS_KEY, &table);
            self.record_miss();
            return None;
        }

        self.record_hit();
        Some(entry)
    }

    pub fn put_lyrics(
        &mut self,
        track_id: &str,
        track_name: &str,
        artist: &str,
        lyrics: &str,
        genius_url: Option<&str>,
        source: LyricsSource,
    ) {
        let mut table: HashMap<String, CachedLyrics> = self.load_table(LYRICS_KEY);
        table.insert(
            track_id.to_string(),
            CachedLyrics {
                track_id: track_id.to_string(),
                track_name: track_name.to_string(),
                artist: artist.to_string(),
                lyrics: lyrics.to_string(),
                genius_url: genius_url.map(str::to_string),
                timestamp: Self::now_ms(),
                source,
            },
        );
        self.enforce_limits(&mut table);
        self.persist_table(LYRICS_KEY, &table);
    }

    // --- sentiment table ---

    /// Look up a cached sentiment result. Expired or version-mismatched
    /// entries are deleted and count as a miss.
    pub fn get_sentiment(&mut self, track_id: &str) -> Option<SentimentResult> {
        let mut table: HashMap<String, CachedSentiment> = self.load_table(SENTIMENT_KEY);

        let Some(entry) = table.get(track_id).cloned() else {
            self.record_miss();
            return None;
        };

        if self.expired(entry.timestamp, Self::now_ms()) || entry.version != ALGORITHM_VERSION {
            table.remove(track_id);
            self.persist_table(SENTIMENT_KEY, &table);
            self.record_miss();
            return None;
        }

        self.record_hit();
        Some(entry.sentiment)
    }

    pub fn put_sentiment(&mut self, track_id: &str, sentiment: &SentimentResult) {
        let mut table: HashMap<String, CachedSentiment> = self.load_table(SENTIMENT_KEY);
        table.insert(
            track_id.to_string(),
            CachedSentiment {
                track_id: track_id.to_string(),
                sentiment: sentiment.clone(),
                timestamp: Self::now_ms(),
                version: ALGORITHM_VERSION.to_string(),
            },
        );
        self.enforce_limits(&mut table);
        self.persist_table(SENTIMENT_KEY, &table);
    }

    // --- statistics ---

    pub fn stats(&self) -> CacheStats {
        let lyrics: HashMap<String, CachedLyrics> = self.load_table(LYRICS_KEY);
        let sentiment: HashMap<String, CachedSentiment> = self.load_table(SENTIMENT_KEY);

        let timestamps: Vec<i64> = lyrics
            .values()
            .map(|e| e.timestamp)
            .chain(sentiment.values().map(|e| e.timestamp))
            .collect();

        let total_size = serialized_size(&lyrics) + serialized_size(&sentiment);
        let total = self.counters.total_requests;

        CacheStats {
            lyrics_count: lyrics.len(),
            sentiment_count: sentiment.len(),
            total_size,
            oldest_entry: timestamps.iter().copied().min().unwrap_or(0),
            newest_entry: timestamps.iter().copied().max().unwrap_or(0),
            hit_rate: rate(self.counters.hits, total),
            miss_rate: rate(self.counters.misses, total),
        }
    }

    #[allow(dead_code)]
    pub fn counters(&self) -> CacheCounters {
        self.counters
    }

    // --- export / import ---

    pub fn export(&self) -> anyhow::Result<String> {
        let export_date = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let blob = CacheExport {
            lyrics: Some(self.load_table(LYRICS_KEY)),
            sentiment: Some(self.load_table(SENTIMENT_KEY)),
            stats: Some(self.counters),
            version: Some(ALGORITHM_VERSION.to_string()),
            export_date: Some(export_date),
        };
        Ok(serde_json::to_string(&blob)?)
    }

    /// Apply whichever parts of an exported blob are present. The blob is
    /// parsed in full before any write, so a malformed blob changes nothing.
    pub fn import(&mut self, data: &str) -> bool {
        let blob: CacheExport = match serde_json::from_str(data) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("cache import rejected: {e}");
                return false;
            }
        };

        if let Some(lyrics) = blob.lyrics {
            self.persist_table(LYRICS_KEY, &lyrics);
        }
        if let Some(sentiment) = blob.sentiment {
            self.persist_table(SENTIMENT_KEY, &sentiment);
        }
        if let Some(stats) = blob.stats {
            self.counters = stats;
            self.persist_counters();
        }
        true
    }

    /// Drop both tables and the counters.
    pub fn clear(&mut self) {
        for key in [LYRICS_KEY, SENTIMENT_KEY, STATS_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("failed to clear cache key {key}: {e:#}");
            }
        }
        self.counters = CacheCounters::default();
    }

    // --- internals ---

    fn load_table<T: DeserializeOwned>(&self, key: &str) -> HashMap<String, T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                warn!("failed to read cache table {key}: {e:#}");
                return HashMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(table) => table,
            Err(e) => {
                warn!("failed to parse cache table {key}: {e}");
                HashMap::new()
            }
        }
    }

    fn persist_table<T: Serialize>(&self, key: &str, table: &HashMap<String, T>) {
        let raw = match serde_json::to_string(table) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to serialize cache table {key}: {e}");
                return;
            }
        };
        if let Err(e) = self.store.put(key, &raw) {
            warn!("failed to write cache table {key}: {e:#}");
        }
    }

    /// Count ceiling first, then serialized-size ceiling. Both run on every
    /// write.
    fn enforce_limits<T: Timestamped + Serialize>(&self, table: &mut HashMap<String, T>) {
        if table.len() > self.config.max_entries {
            let excess = table.len() - self.config.max_entries;
            remove_oldest(table, excess);
        }

        if serialized_size(table) > self.config.max_bytes {
            let count = (table.len() as f64 * 0.3).floor() as usize;
            remove_oldest(table, count);
        }
    }

    fn cleanup_expired(&mut self) {
        let now = Self::now_ms();

        let mut lyrics: HashMap<String, CachedLyrics> = self.load_table(LYRICS_KEY);
        let before = lyrics.len();
        lyrics.retain(|_, entry| !self.expired(entry.timestamp, now));
        if lyrics.len() != before {
            self.persist_table(LYRICS_KEY, &lyrics);
        }

        let mut sentiment: HashMap<String, CachedSentiment> = self.load_table(SENTIMENT_KEY);
        let before = sentiment.len();
        sentiment
            .retain(|_, entry| !self.expired(entry.timestamp, now) && entry.version == ALGORITHM_VERSION);
        if sentiment.len() != before {
            self.persist_table(SENTIMENT_KEY, &sentiment);
        }
    }

    fn record_hit(&mut self) {
        self.counters.hits += 1;
        self.counters.total_requests += 1;
        self.persist_counters();
    }

    fn record_miss(&mut self) {
        self.counters.misses += 1;
        self.counters.total_requests += 1;
        self.persist_counters();
    }

    fn load_counters(&self) -> CacheCounters {
        let raw = match self.store.get(STATS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheCounters::default(),
            Err(e) => {
                warn!("failed to read cache counters: {e:#}");
                return CacheCounters::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("failed to parse cache counters: {e}");
            CacheCounters::default()
        })
    }

    fn persist_counters(&self) {
        let raw = match serde_json::to_string(&self.counters) {
            Ok(raw) => raw,
            Err(_) => return,
        };
        if let Err(e) = self.store.put(STATS_KEY, &raw) {
            warn!("failed to write cache counters: {e:#}");
        }
    }
}

fn rate(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

fn serialized_size<T: Serialize>(table: &HashMap<String, T>) -> usize {
    serde_json::to_string(table).map(|s| s.len()).unwrap_or(0)
}

/// Remove the `count` oldest entries by timestamp, key order breaking ties.
fn remove_oldest<T: Timestamped>(table: &mut HashMap<String, T>, count: usize) {
    let mut by_age: Vec<(String, i64)> = table
        .iter()
        .map(|(key, entry)| (key.clone(), entry.timestamp()))
        .collect();
    by_age.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    for (key, _) in by_age.into_iter().take(count) {
        table.remove(&key);
    }
}
