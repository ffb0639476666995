//! Per-person keyframe accumulation.
//!
//! Groups a stream of per-frame observations by identity index. Each
//! identity owns one [`PersonTrack`] whose keyframes stay in the order they
//! were observed; the accumulator never re-sorts.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use fancam_models::{PersonIndex, PersonObservation, ResultPage, TrackingKeyframe};

use crate::normalizer::normalize;

/// Accumulated keyframes for one identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonTrack {
    index: PersonIndex,
    keyframes: Vec<TrackingKeyframe>,
}

impl PersonTrack {
    pub fn new(index: PersonIndex) -> Self {
        Self {
            index,
            keyframes: Vec::new(),
        }
    }

    pub fn index(&self) -> PersonIndex {
        self.index
    }

    pub fn keyframes(&self) -> &[TrackingKeyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    fn push(&mut self, keyframe: TrackingKeyframe) {
        self.keyframes.push(keyframe);
    }
}

/// Counters describing what the accumulator has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccumulatorStats {
    pub people_count: u32,
    pub total_observed: u64,
    pub total_with_bounding_box: u64,
    pub skipped_invalid: u64,
    pub filtered_out: u64,
    pub keyframes: u64,
}

/// Groups observations into per-person tracks.
///
/// State only grows while a job is processed. Mutation requires `&mut self`;
/// callers sharing one accumulator across tasks must serialize access.
#[derive(Debug, Default)]
pub struct TrackAccumulator {
    tracks: HashMap<PersonIndex, PersonTrack>,
    max_index: Option<PersonIndex>,
    only_index: Option<PersonIndex>,
    total_observed: u64,
    total_with_bounding_box: u64,
    skipped_invalid: u64,
    filtered_out: u64,
}

impl TrackAccumulator {
    /// Create an accumulator that tracks every identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator that only builds a track for `index`.
    ///
    /// Observations of other identities are still counted as observed.
    pub fn with_filter(index: Option<PersonIndex>) -> Self {
        Self {
            only_index: index,
            ..Self::default()
        }
    }

    /// Record one observation.
    pub fn observe(&mut self, observation: &PersonObservation) {
        self.total_observed += 1;

        if let Some(only) = self.only_index {
            if observation.index != only {
                self.filtered_out += 1;
                return;
            }
        }

        let Some(bbox) = observation.bounding_box.as_ref() else {
            return;
        };

        let keyframe = match normalize(observation.timestamp, bbox) {
            Ok(kf) => kf,
            Err(e) => {
                self.skipped_invalid += 1;
                warn!(
                    person = %observation.index,
                    timestamp = observation.timestamp,
                    "Skipping observation: {}", e
                );
                return;
            }
        };

        debug!(
            person = %observation.index,
            timestamp = keyframe.timestamp,
            left = keyframe.left,
            width = keyframe.width,
            "Tracked person"
        );

        self.total_with_bounding_box += 1;
        self.tracks
            .entry(observation.index)
            .or_insert_with(|| PersonTrack::new(observation.index))
            .push(keyframe);

        if self.max_index.map_or(true, |max| observation.index > max) {
            self.max_index = Some(observation.index);
        }
    }

    /// Record every observation of a page, in order.
    pub fn observe_all(&mut self, observations: &[PersonObservation]) {
        for observation in observations {
            self.observe(observation);
        }
    }

    /// Record a whole result page, including detections without identity.
    pub fn observe_page(&mut self, page: &ResultPage) {
        self.observe_all(&page.observations);
        self.total_observed += page.unidentified;
    }

    /// Track for an identity, or an empty track if it was never observed.
    pub fn track_for(&self, index: PersonIndex) -> Cow<'_, PersonTrack> {
        match self.tracks.get(&index) {
            Some(track) => Cow::Borrowed(track),
            None => Cow::Owned(PersonTrack::new(index)),
        }
    }

    /// Tracks in ascending identity order.
    pub fn tracks(&self) -> impl Iterator<Item = &PersonTrack> {
        let mut tracks: Vec<&PersonTrack> = self.tracks.values().collect();
        tracks.sort_by_key(|t| t.index);
        tracks.into_iter()
    }

    /// Highest identity index seen plus one.
    ///
    /// Assumes identity indices are contiguous from zero, as the detection
    /// service assigns them. Zero when nothing was tracked.
    pub fn people_count(&self) -> u32 {
        self.max_index.map_or(0, |max| max.value().saturating_add(1))
    }

    pub fn total_observed(&self) -> u64 {
        self.total_observed
    }

    pub fn total_with_bounding_box(&self) -> u64 {
        self.total_with_bounding_box
    }

    pub fn skipped_invalid(&self) -> u64 {
        self.skipped_invalid
    }

    /// Number of keyframes across all tracks.
    pub fn keyframe_count(&self) -> u64 {
        self.tracks.values().map(|t| t.len() as u64).sum()
    }

    pub fn stats(&self) -> AccumulatorStats {
        AccumulatorStats {
            people_count: self.people_count(),
            total_observed: self.total_observed,
            total_with_bounding_box: self.total_with_bounding_box,
            skipped_invalid: self.skipped_invalid,
            filtered_out: self.filtered_out,
            keyframes: self.keyframe_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fancam_models::BoundingBox;

    fn seen(index: u32, timestamp: f64, left: f64) -> PersonObservation {
        PersonObservation::new(
            PersonIndex(index),
            timestamp,
            Some(BoundingBox::new(0.1, left, 0.2, 0.5)),
        )
    }

    fn unboxed(index: u32, timestamp: f64) -> PersonObservation {
        PersonObservation::new(PersonIndex(index), timestamp, None)
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = TrackAccumulator::new();
        assert_eq!(acc.people_count(), 0);
        assert_eq!(acc.total_observed(), 0);
        assert!(acc.track_for(PersonIndex(0)).is_empty());
        assert_eq!(acc.tracks().count(), 0);
    }

    #[test]
    fn test_observation_without_box_only_counts() {
        let mut acc = TrackAccumulator::new();
        acc.observe(&unboxed(4, 1.0));
        acc.observe(&unboxed(4, 2.0));

        assert_eq!(acc.total_observed(), 2);
        assert_eq!(acc.total_with_bounding_box(), 0);
        assert!(acc.track_for(PersonIndex(4)).is_empty());
        assert_eq!(acc.people_count(), 0);
    }

    #[test]
    fn test_unidentified_detections_count_as_observed() {
        let mut acc = TrackAccumulator::new();
        let page = ResultPage::new(vec![seen(0, 0.0, 0.1), unboxed(1, 0.0)], None).with_unidentified(2);
        acc.observe_page(&page);

        assert_eq!(acc.total_observed(), 4);
        assert_eq!(acc.total_with_bounding_box(), 1);
        assert_eq!(acc.people_count(), 1);
    }

    #[test]
    fn test_keyframes_keep_submission_order() {
        let mut acc = TrackAccumulator::new();
        acc.observe(&seen(1, 0.5, 0.1));
        acc.observe(&seen(0, 0.6, 0.9));
        acc.observe(&seen(1, 1.5, 0.2));
        acc.observe(&seen(1, 1.0, 0.3));

        let track = acc.track_for(PersonIndex(1));
        let lefts: Vec<f64> = track.keyframes().iter().map(|k| k.left).collect();
        assert_eq!(lefts, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_people_count_is_max_index_plus_one() {
        let mut acc = TrackAccumulator::new();
        acc.observe(&seen(2, 0.0, 0.1));
        assert_eq!(acc.people_count(), 3);

        acc.observe(&seen(0, 0.1, 0.1));
        assert_eq!(acc.people_count(), 3);

        acc.observe(&seen(5, 0.2, 0.1));
        assert_eq!(acc.people_count(), 6);

        // Unboxed observations never move the maximum.
        acc.observe(&unboxed(9, 0.3));
        assert_eq!(acc.people_count(), 6);
    }

    #[test]
    fn test_invalid_geometry_is_skipped() {
        let mut acc = TrackAccumulator::new();
        let bad = PersonObservation::new(
            PersonIndex(3),
            1.0,
            Some(BoundingBox {
                left: Some(0.3),
                ..Default::default()
            }),
        );
        acc.observe(&bad);

        assert_eq!(acc.total_observed(), 1);
        assert_eq!(acc.skipped_invalid(), 1);
        assert_eq!(acc.total_with_bounding_box(), 0);
        assert!(acc.track_for(PersonIndex(3)).is_empty());
        assert_eq!(acc.people_count(), 0);
    }

    #[test]
    fn test_filter_limits_tracks() {
        let mut acc = TrackAccumulator::with_filter(Some(PersonIndex(0)));
        acc.observe_all(&[seen(0, 0.0, 0.1), seen(1, 0.0, 0.2), seen(0, 0.1, 0.3)]);

        let stats = acc.stats();
        assert_eq!(stats.total_observed, 3);
        assert_eq!(stats.filtered_out, 1);
        assert_eq!(stats.keyframes, 2);
        assert_eq!(acc.people_count(), 1);
        assert!(acc.track_for(PersonIndex(1)).is_empty());
    }

    #[test]
    fn test_tracks_iterate_in_index_order() {
        let mut acc = TrackAccumulator::new();
        acc.observe_all(&[seen(3, 0.0, 0.1), seen(1, 0.0, 0.1), seen(2, 0.0, 0.1)]);

        let order: Vec<u32> = acc.tracks().map(|t| t.index().value()).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }
}
