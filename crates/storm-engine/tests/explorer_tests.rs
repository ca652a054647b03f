//! Tests for the explorer session: time windows, group and storm playback.

use std::time::Duration;

use projection::ProjectionFit;
use storm_common::{RangeError, StormError, YearRange};
use storm_engine::{
    EngineError, ExplorerConfig, HeatmapView, PlaybackEvent, StormCategory, StormExplorer,
};
use test_utils::fixtures::{self, canvas};
use test_utils::yearly_observations;

// ============================================================================
// Helper functions
// ============================================================================

fn test_config() -> ExplorerConfig {
    let (width, height) = canvas::SMALL;
    ExplorerConfig {
        canvas_width: width,
        canvas_height: height,
        projection_fit: ProjectionFit::centered(),
        simplify_tolerance: 0.0,
        ..Default::default()
    }
}

fn storm_explorer() -> StormExplorer {
    StormExplorer::new(test_config(), &fixtures::landmass_regions(), fixtures::storm_dataset())
        .unwrap()
}

fn yearly_explorer() -> StormExplorer {
    StormExplorer::new(
        test_config(),
        &fixtures::landmass_regions(),
        yearly_observations(1950, 1999, 2),
    )
    .unwrap()
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

// ============================================================================
// Construction tests
// ============================================================================

#[test]
fn test_new_shows_all_groups_over_full_range() {
    let explorer = storm_explorer();
    let (width, height) = canvas::SMALL;

    assert_eq!(explorer.range(), YearRange::new(1851, 2024));
    assert_eq!(explorer.view(), HeatmapView::AllGroups);
    assert_eq!(explorer.frame().len(), width * height * 4);
    assert!(explorer.mask().count_inside() > 0);
    assert!(explorer.frequency().max() > 0);

    let summary = explorer.summary();
    assert_eq!(summary.observations, 19);
    assert_eq!(summary.unique_storms, 4);
    assert_eq!(summary.groups.len(), 5);
    assert_eq!(summary.combined.map(|g| g.len()), Some(19));
}

#[test]
fn test_new_rejects_empty_boundary() {
    let result = StormExplorer::new(test_config(), &[], fixtures::storm_dataset());
    assert!(matches!(
        result,
        Err(EngineError::Data(StormError::EmptyBoundary))
    ));
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = ExplorerConfig {
        canvas_width: 0,
        ..test_config()
    };
    let result = StormExplorer::new(config, &fixtures::landmass_regions(), Vec::new());
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_mask_is_built_once() {
    let mut explorer = yearly_explorer();
    explorer.set_time_range(1960, 1980).unwrap();
    explorer.go_to_group(1).unwrap();
    let stats = explorer.mask_stats();
    assert_eq!(stats.misses, 1);
}

// ============================================================================
// Frame tests
// ============================================================================

#[test]
fn test_pixels_outside_mask_stay_transparent() {
    let explorer = yearly_explorer();
    let mask = explorer.mask();
    let frame = explorer.frame();
    let grid = explorer.frequency();

    for (idx, px) in frame.chunks_exact(4).enumerate() {
        if !mask.is_inside_index(idx) {
            assert_eq!(px, &[0, 0, 0, 0]);
            assert_eq!(grid.as_slice()[idx], 0);
        }
    }
}

#[test]
fn test_empty_window_renders_transparent_frame() {
    let mut explorer = storm_explorer();
    let summary = explorer.set_time_range(1920, 1935).unwrap();

    assert_eq!(summary.observations, 0);
    assert!(summary.groups.is_empty());
    assert_eq!(explorer.frequency().max(), 0);
    assert!(explorer.frame().chunks_exact(4).all(|px| px[3] == 0));

    assert_eq!(explorer.step_group(1).unwrap(), None);
    assert!(!explorer.start_group_playback(secs(0)));
}

// ============================================================================
// Time range tests
// ============================================================================

#[test]
fn test_set_time_range_validation() {
    let mut explorer = storm_explorer();

    assert!(matches!(
        explorer.set_time_range(2000, 2005),
        Err(EngineError::InvalidRange(RangeError::TooNarrow { .. }))
    ));
    assert!(matches!(
        explorer.set_time_range(2005, 1995),
        Err(EngineError::InvalidRange(RangeError::Inverted { .. }))
    ));
    assert!(matches!(
        explorer.set_time_range(1840, 1900),
        Err(EngineError::InvalidRange(RangeError::StartTooEarly { .. }))
    ));
    assert_eq!(explorer.range(), YearRange::new(1851, 2024));

    let summary = explorer.set_time_range(1851, 2024).unwrap();
    assert_eq!(summary.range, YearRange::new(1851, 2024));
}

#[test]
fn test_rejected_range_leaves_state_unchanged() {
    let mut explorer = storm_explorer();
    explorer.set_time_range(1990, 2010).unwrap();
    explorer.go_to_group(2).unwrap();
    let before = explorer.frame().to_vec();

    assert!(explorer.set_time_range(2010, 1990).is_err());
    assert_eq!(explorer.range(), YearRange::new(1990, 2010));
    assert_eq!(explorer.view(), HeatmapView::Group(2));
    assert_eq!(explorer.current_group(), 2);
    assert_eq!(explorer.frame(), before.as_slice());
}

#[test]
fn test_set_time_range_resets_group_playback() {
    let mut explorer = yearly_explorer();
    explorer.start_group_playback(secs(0));
    explorer.tick(secs(2));
    assert_eq!(explorer.current_group(), 1);

    let summary = explorer.set_time_range(1960, 1990).unwrap();
    assert!(!explorer.is_group_playing());
    assert_eq!(explorer.current_group(), 0);
    assert_eq!(explorer.view(), HeatmapView::AllGroups);
    assert_eq!(summary.observations, 62);
    assert_eq!(summary.unique_storms, 31);

    let lens: Vec<usize> = summary.groups.iter().map(|g| g.len()).collect();
    assert_eq!(lens, vec![13, 13, 12, 12, 12]);
}

// ============================================================================
// Group playback tests
// ============================================================================

#[test]
fn test_group_playback_cycles_and_wraps() {
    let mut explorer = yearly_explorer();
    assert!(explorer.toggle_group_playback(secs(0)));

    let mut shown = Vec::new();
    for t in 1..=10 {
        for event in explorer.tick(secs(t)) {
            if let PlaybackEvent::GroupShown { index, years } = event {
                assert!(years.is_some());
                shown.push(index);
            }
        }
    }

    assert_eq!(shown, vec![1, 2, 3, 4, 0]);
    assert_eq!(explorer.view(), HeatmapView::Group(0));
    assert!(explorer.is_group_playing());
}

#[test]
fn test_group_labels_follow_partition() {
    let explorer = yearly_explorer();
    let groups = explorer.groups();
    assert_eq!(groups.groups()[0].years, Some(YearRange::new(1950, 1959)));
    assert_eq!(groups.groups()[4].years, Some(YearRange::new(1990, 1999)));
    assert_eq!(groups.combined().unwrap().label(), "1950 - 1999");
}

#[test]
fn test_go_to_group_stops_playback() {
    let mut explorer = yearly_explorer();
    explorer.start_group_playback(secs(0));

    explorer.go_to_group(3).unwrap();
    assert!(!explorer.is_group_playing());
    assert_eq!(explorer.view(), HeatmapView::Group(3));
    assert!(explorer.tick(secs(10)).is_empty());

    assert!(matches!(
        explorer.go_to_group(5),
        Err(EngineError::GroupOutOfRange { index: 5, count: 5 })
    ));
}

#[test]
fn test_step_group_wraps_both_ways() {
    let mut explorer = yearly_explorer();
    assert_eq!(explorer.step_group(-1).unwrap(), Some(4));
    assert_eq!(explorer.step_group(1).unwrap(), Some(0));
    assert_eq!(explorer.step_group(1).unwrap(), Some(1));
}

#[test]
fn test_single_group_uses_uniform_weight() {
    let mut explorer = yearly_explorer();
    let weighted_max = explorer.frequency().max();

    explorer.go_to_group(4).unwrap();
    let single_max = explorer.frequency().max();

    assert!(single_max > 0);
    assert!(single_max < weighted_max);
}

// ============================================================================
// Storm playback tests
// ============================================================================

#[test]
fn test_select_storm() {
    let mut explorer = storm_explorer();
    assert_eq!(explorer.select_storm("KATRINA", 2005).unwrap(), 9);
    assert_eq!(explorer.selected_storm().unwrap().to_string(), "KATRINA - 2005");

    let frame = explorer.storm_frame().unwrap();
    assert_eq!(frame.step, 0);
    assert_eq!(frame.date, "08/23/2005");
    assert_eq!(frame.category, StormCategory::TropicalDepression);

    assert_eq!(explorer.select_storm_query("KATRINA - 1999").unwrap(), 4);
}

#[test]
fn test_select_missing_storm() {
    let mut explorer = storm_explorer();
    assert!(matches!(
        explorer.select_storm("Nonexistent", 1900),
        Err(EngineError::StormNotFound { year: 1900, .. })
    ));
    assert!(matches!(
        explorer.select_storm_query("KATRINA"),
        Err(EngineError::InvalidQuery { .. })
    ));
    assert!(explorer.storm_frame().is_none());
}

#[test]
fn test_select_storm_name_is_case_sensitive() {
    let mut explorer = storm_explorer();
    assert!(matches!(
        explorer.select_storm("katrina", 2005),
        Err(EngineError::StormNotFound { year: 2005, .. })
    ));
    assert!(matches!(
        explorer.select_storm_query("Katrina - 2005"),
        Err(EngineError::StormNotFound { .. })
    ));
    assert!(explorer.selected_storm().is_none());
}

#[test]
fn test_storm_playback_halts_at_last_step() {
    let mut explorer = storm_explorer();
    explorer.select_storm("KATRINA", 2005).unwrap();
    assert!(explorer.toggle_storm_playback(secs(0)));

    let mut events = Vec::new();
    for t in 1..=12 {
        events.extend(explorer.tick(secs(t)));
    }

    let steps: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::StormStepped { step } => Some(*step),
            _ => None,
        })
        .collect();
    assert_eq!(steps, (1..=8).collect::<Vec<_>>());
    assert_eq!(events.last(), Some(&PlaybackEvent::StormFinished { step: 8 }));
    assert!(!explorer.is_storm_playing());

    let frame = explorer.storm_frame().unwrap();
    assert_eq!(frame.step, 8);
    assert_eq!(frame.trail.len(), 9);
    assert!(!explorer.start_storm_playback(secs(20)));
}

#[test]
fn test_seeking_to_last_step_stops_running_playback() {
    let mut explorer = storm_explorer();
    explorer.select_storm("KATRINA", 2005).unwrap();
    assert!(explorer.start_storm_playback(secs(0)));
    assert_eq!(explorer.step_storm(9).unwrap().step, 8);

    let mut events = Vec::new();
    for t in 1..=5 {
        events.extend(explorer.tick(secs(t)));
    }

    assert_eq!(events, vec![PlaybackEvent::StormFinished { step: 8 }]);
    assert!(!explorer.is_storm_playing());
    assert_eq!(explorer.storm_frame().unwrap().step, 8);
}

#[test]
fn test_step_storm_clamps() {
    let mut explorer = storm_explorer();
    assert!(explorer.step_storm(1).is_none());

    explorer.select_storm("ANDREW", 1992).unwrap();
    assert_eq!(explorer.step_storm(-1).unwrap().step, 0);
    assert_eq!(explorer.step_storm(1).unwrap().step, 1);
    assert_eq!(explorer.step_storm(5).unwrap().step, 2);
    assert!(!explorer.is_storm_playing());
}

#[test]
fn test_reselecting_rewinds_storm_playback() {
    let mut explorer = storm_explorer();
    explorer.select_storm("KATRINA", 2005).unwrap();
    explorer.start_storm_playback(secs(0));
    explorer.tick(secs(1));

    explorer.select_storm("KATRINA", 2005).unwrap();
    assert!(!explorer.is_storm_playing());
    assert_eq!(explorer.storm_frame().unwrap().step, 0);
}

#[test]
fn test_playback_machines_are_independent() {
    let mut explorer = storm_explorer();
    explorer.select_storm("KATRINA", 2005).unwrap();
    explorer.start_group_playback(secs(0));
    explorer.start_storm_playback(secs(0));

    let events = explorer.tick(secs(1));
    assert_eq!(events, vec![PlaybackEvent::StormStepped { step: 1 }]);

    explorer.stop_group_playback();
    let events = explorer.tick(secs(2));
    assert_eq!(events, vec![PlaybackEvent::StormStepped { step: 2 }]);
    assert!(explorer.is_storm_playing());
}

#[test]
fn test_storm_names() {
    let explorer = storm_explorer();
    assert_eq!(
        explorer.storm_names(),
        vec!["ANDREW - 1992", "KATRINA - 1999", "KATRINA - 2005"]
    );
}
