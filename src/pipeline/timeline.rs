//! Weekly aggregation of per-track sentiment.
//!
//! Tracks are bucketed by the Sunday (UTC) starting the week of their
//! `added_at` date. Weeks with no tracks produce no point; the timeline is
//! sparse, never interpolated.

use crate::model::{AnalyzedTrack, Emotions, MoodPoint, round3};
use std::collections::BTreeMap;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};
use tracing::warn;

/// Fold analyzed tracks into one point per non-empty week, sorted ascending
/// by week key.
pub fn build(tracks: &[AnalyzedTrack]) -> Vec<MoodPoint> {
    let mut buckets: BTreeMap<String, Vec<&AnalyzedTrack>> = BTreeMap::new();

    for track in tracks {
        let Some(week) = week_key(&track.track.added_at) else {
            warn!(
                "skipping track {} in timeline: unparseable added_at {:?}",
                track.track.id, track.track.added_at
            );
            continue;
        };
        buckets.entry(week).or_default().push(track);
    }

    buckets
        .into_iter()
        .map(|(week, bucket)| {
            let count = bucket.len() as f64;
            let mut valence = 0.0;
            let mut energy = 0.0;
            let mut emotions = Emotions::default();
            for track in &bucket {
                valence += track.sentiment.valence;
                energy += track.sentiment.energy;
                emotions.add(&track.sentiment.emotions);
            }
            MoodPoint {
                week,
                valence: round3(valence / count),
                energy: round3(energy / count),
                emotions: emotions.divided(count).rounded(),
                track_count: bucket.len(),
            }
        })
        .collect()
}

/// ISO date of the Sunday starting the week `added_at` falls in, or `None`
/// when the timestamp does not parse.
fn week_key(added_at: &str) -> Option<String> {
    let date = parse_date(added_at)?;
    let back = i64::from(date.weekday().number_days_from_sunday());
    let sunday = date.checked_sub(Duration::days(back))?;
    let format = format_description!("[year]-[month]-[day]");
    sunday.format(&format).ok()
}

fn parse_date(added_at: &str) -> Option<Date> {
    if let Ok(stamp) = OffsetDateTime::parse(added_at, &Rfc3339) {
        return Some(stamp.to_offset(time::UtcOffset::UTC).date());
    }
    // Accept bare dates too; saved-track exports sometimes omit the time.
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(added_at, &format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SentimentResult, Track};

    fn track(id: &str, added_at: &str, valence: f64, joy: f64) -> AnalyzedTrack {
        let mut sentiment = SentimentResult::zero();
        sentiment.valence = valence;
        sentiment.energy = 0.5;
        sentiment.emotions.joy = joy;
        AnalyzedTrack {
            track: Track {
                id: id.to_string(),
                name: format!("Track {id}"),
                artists: "Artist".to_string(),
                added_at: added_at.to_string(),
            },
            sentiment,
        }
    }

    #[test]
    fn tracks_in_the_same_week_average_into_one_point() {
        // Monday and Wednesday of the week starting Sunday 2024-01-07.
        let tracks = vec![
            track("a", "2024-01-08T12:00:00Z", 0.2, 0.1),
            track("b", "2024-01-10T08:30:00Z", 0.6, 0.3),
        ];

        let timeline = build(&tracks);
        assert_eq!(timeline.len(), 1);
        let point = &timeline[0];
        assert_eq!(point.week, "2024-01-07");
        assert_eq!(point.valence, 0.4);
        assert_eq!(point.energy, 0.5);
        assert_eq!(point.emotions.joy, 0.2);
        assert_eq!(point.track_count, 2);
    }

    #[test]
    fn weeks_sort_ascending_regardless_of_input_order() {
        let tracks = vec![
            track("late", "2024-03-20T00:00:00Z", 0.1, 0.0),
            track("early", "2024-01-08T00:00:00Z", 0.2, 0.0),
            track("middle", "2024-02-14T00:00:00Z", 0.3, 0.0),
        ];

        let weeks: Vec<String> = build(&tracks).into_iter().map(|p| p.week).collect();
        assert_eq!(weeks, vec!["2024-01-07", "2024-02-11", "2024-03-17"]);
    }

    #[test]
    fn a_sunday_keys_its_own_week() {
        let timeline = build(&[track("a", "2024-01-07T00:00:00Z", 0.0, 0.0)]);
        assert_eq!(timeline[0].week, "2024-01-07");
    }

    #[test]
    fn empty_weeks_produce_no_points() {
        let tracks = vec![
            track("a", "2024-01-08T00:00:00Z", 0.2, 0.0),
            track("b", "2024-03-20T00:00:00Z", 0.6, 0.0),
        ];
        assert_eq!(build(&tracks).len(), 2);
    }

    #[test]
    fn means_round_to_three_decimals() {
        let tracks = vec![
            track("a", "2024-01-08T00:00:00Z", 0.1, 0.0),
            track("b", "2024-01-09T00:00:00Z", 0.2, 0.0),
            track("c", "2024-01-10T00:00:00Z", 0.3, 0.0),
        ];
        // (0.1 + 0.2 + 0.3) / 3 has no exact binary representation.
        assert_eq!(build(&tracks)[0].valence, 0.2);
    }

    #[test]
    fn bare_dates_are_accepted() {
        let timeline = build(&[track("a", "2024-01-10", 0.5, 0.0)]);
        assert_eq!(timeline[0].week, "2024-01-07");
    }

    #[test]
    fn unparseable_dates_are_skipped() {
        let tracks = vec![
            track("bad", "not-a-date", 0.5, 0.0),
            track("good", "2024-01-08T00:00:00Z", 0.2, 0.0),
        ];
        let timeline = build(&tracks);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].track_count, 1);
    }

    #[test]
    fn empty_input_yields_empty_timeline() {
        assert!(build(&[]).is_empty());
    }
}
