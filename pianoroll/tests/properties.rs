// Behavioral properties of the multitrack container, exercised through the
// public API only.
//
// Covers padding to a common length, non-mutating stacking, binarization,
// the asymmetric transpose round trip, merging, downsampling, track removal
// and combined track/time slicing with aligned tempo and downbeats.

use pianoroll::{
    Error, ErrorKind, MergeMode, MergeRequest, Multitrack, Pianoroll, Track, TrackSelector,
};

/// Helper: a numeric track with velocity 100 at the given (step, pitch) cells.
fn track(steps: usize, notes: &[(usize, usize)]) -> Track {
    let mut roll = Pianoroll::zeros(steps);
    for &(step, pitch) in notes {
        roll.set(step, pitch, 100.0);
    }
    Track::new(roll)
}

/// Helper: a track whose step `i` sounds pitch `i % 128`, so each row is
/// identifiable after slicing or decimation.
fn ramp(steps: usize) -> Track {
    let notes: Vec<(usize, usize)> = (0..steps).map(|i| (i, i % 128)).collect();
    track(steps, &notes)
}

fn uneven() -> Multitrack {
    Multitrack::new().with_tracks(vec![
        track(5, &[(1, 60)]),
        track(12, &[(11, 20)]),
        track(0, &[]),
        track(9, &[(0, 100), (8, 101)]),
    ])
}

#[test]
fn pad_to_same_equalizes_lengths() {
    let mut mt = uneven();
    let max = mt.max_length();
    mt.pad_to_same();
    assert!(mt.tracks.iter().all(|t| t.len() == max));
    assert_eq!(mt.max_length(), max);
}

#[test]
fn stacking_does_not_mutate() {
    let mt = uneven();
    let before = mt.clone();
    let stacked = mt.stacked_pianoroll();
    assert_eq!(stacked.shape(), (12, 128, 4));
    assert_eq!(mt, before);
    assert_eq!(stacked.get(11, 20, 1), 100.0);
    assert_eq!(stacked.get(8, 101, 3), 100.0);
}

#[test]
fn binarize_always_yields_binarized() {
    for threshold in [-1.0, 0.0, 50.0, 100.0, 1000.0] {
        let mut mt = uneven();
        mt.binarize(threshold);
        assert!(mt.is_binarized(), "threshold {threshold}");
    }
}

#[test]
fn transpose_round_trip_is_lossy_at_the_edges() {
    let mut mt = Multitrack::new().with_tracks(vec![track(2, &[(0, 60), (1, 126)])]);
    mt.transpose(5).transpose(-5);
    let roll = &mt.tracks[0].pianoroll;
    assert!(roll.is_active(0, 60));
    assert!(!roll.is_active(1, 126));
    assert!(!roll.is_active(1, 121));
}

#[test]
fn merge_any_of_active_and_silent_track() {
    let mut mt = Multitrack::new().with_tracks(vec![track(4, &[(0, 60)]), track(4, &[])]);
    mt.merge_tracks(MergeRequest {
        mode: "any".parse().unwrap(),
        ..MergeRequest::default()
    })
    .unwrap();
    let merged = &mt.tracks[2].pianoroll;
    assert!(merged.is_binary());
    for step in 0..4 {
        for pitch in 0..128 {
            assert_eq!(merged.is_active(step, pitch), step == 0 && pitch == 60);
        }
    }
}

#[test]
fn unknown_merge_mode_is_rejected() {
    let err = "average".parse::<MergeMode>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn downsample_keeps_every_other_row() {
    let mut mt = Multitrack::new()
        .with_resolution(24)
        .with_tracks(vec![ramp(11)]);
    mt.downsample(2).unwrap();
    assert_eq!(mt.resolution, 12);
    let roll = &mt.tracks[0].pianoroll;
    assert_eq!(roll.len(), 6);
    for (row, original) in [0, 2, 4, 6, 8, 10].into_iter().enumerate() {
        assert!(roll.is_active(row, original));
    }
}

#[test]
fn downsample_by_non_factor_fails() {
    let mut mt = Multitrack::new()
        .with_resolution(24)
        .with_tracks(vec![ramp(10)]);
    let err = mt.downsample(5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert_eq!(mt.resolution, 24);
    assert_eq!(mt.tracks[0].len(), 10);
}

#[test]
fn remove_first_of_three_tracks() {
    let mut mt = Multitrack::new().with_tracks(vec![
        track(1, &[]).with_name("zero"),
        track(1, &[]).with_name("one"),
        track(1, &[]).with_name("two"),
    ]);
    mt.remove_tracks([0usize]);
    let names: Vec<&str> = mt.tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["one", "two"]);
}

#[test]
fn slice_tracks_and_time_together() {
    let tempo: Vec<f64> = (0..30).map(|i| 100.0 + f64::from(i)).collect();
    let downbeat: Vec<bool> = (0..30).map(|i| i % 4 == 0).collect();
    let mt = Multitrack::new()
        .with_tempo(tempo)
        .with_downbeat(downbeat)
        .with_tracks(vec![
            ramp(30).with_name("a"),
            ramp(30).with_name("b"),
            ramp(30).with_name("c"),
        ]);

    let sub = mt.slice(TrackSelector::Many(vec![0, 2]), 10..20).unwrap();
    assert_eq!(sub.len(), 2);
    assert_eq!(sub.tracks[0].name, "a");
    assert_eq!(sub.tracks[1].name, "c");
    for t in &sub.tracks {
        assert_eq!(t.len(), 10);
        for row in 0..10 {
            assert!(t.pianoroll.is_active(row, row + 10));
        }
    }
    let sub_tempo = sub.tempo.as_ref().unwrap();
    assert_eq!(sub_tempo.len(), 10);
    assert_eq!(sub_tempo[0], 110.0);
    assert_eq!(sub_tempo[9], 119.0);
    assert_eq!(sub.downbeat_steps(), vec![2, 6]);
    assert_eq!(sub.resolution, mt.resolution);
}

#[test]
fn slice_with_missing_track_fails() {
    let mt = uneven();
    let err = mt.slice(TrackSelector::Many(vec![1, 9]), ..).unwrap_err();
    assert!(matches!(err, Error::TrackIndex { index: 9, len: 4 }));
    assert_eq!(err.kind(), ErrorKind::Structure);
}

#[test]
fn trim_then_merge_matches_active_length() {
    let mut mt = uneven();
    mt.trim_trailing_silence();
    assert_eq!(mt.max_length(), 12);
    let merged = mt.merged_pianoroll(MergeMode::Sum);
    assert_eq!(merged.len(), 12);
    assert_eq!(merged.active_length(), 12);
    assert_eq!(mt.active_pitch_range().unwrap(), (20, 101));
}
