#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! Integration tests for loading and live parameter changes.

use std::time::Duration;

use stitch_codec::{Color, HEADER_LEN, SENTINEL};
use stitch_geom::Topology;
use stitch_live::{
    load, load_with, ConfigError, ControllerConfig, FileSource, LoadError, LoadOptions,
    MemorySource,
};

const RIGHT: [u8; 3] = [0x01, 0x00, 0x03];
const UP_JUMP: [u8; 3] = [0x80, 0x00, 0x83];
const STOP: [u8; 3] = [0x00, 0x00, 0xC3];

fn dst(color_changes: u32, records: &[[u8; 3]]) -> Vec<u8> {
    let mut bytes = vec![b' '; HEADER_LEN];
    let tag = format!("LA:sample\rCO:{color_changes:>4}\r");
    bytes[..tag.len()].copy_from_slice(tag.as_bytes());
    for r in records {
        bytes.extend_from_slice(r);
    }
    bytes.extend_from_slice(&SENTINEL);
    bytes
}

fn seeded() -> ControllerConfig {
    ControllerConfig {
        jitter_seed: Some(7),
        palette_seed: Some(9),
        ..ControllerConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn load_builds_initial_geometry_with_defaults() {
    let source = MemorySource::new(dst(2, &[RIGHT, STOP, RIGHT, STOP, RIGHT]));
    let view = load(&source, &LoadOptions::default()).await.unwrap();

    assert!(view.quads());
    assert_eq!(view.thread_thickness(), 2.0);
    assert_eq!(view.jump_thread_thickness(), 0.01);
    assert_eq!(view.palette().len(), 3);
    assert_eq!(view.header().label.as_deref(), Some("sample"));

    let installed = view.installed();
    assert_eq!(installed.generation, 0);
    assert_eq!(installed.geometry.vertex_count(), 5 * 4);
    assert_eq!(installed.summary.color_stops, 2);
}

#[tokio::test(start_paused = true)]
async fn burst_of_changes_coalesces_into_one_rebuild() {
    let view = load_with(
        &MemorySource::new(dst(0, &[RIGHT, UP_JUMP, RIGHT])),
        &LoadOptions::default(),
        seeded(),
    )
    .await
    .unwrap();

    view.set_thread_thickness(3.0).unwrap();
    view.set_jump_thread_thickness(0.5).unwrap();
    view.set_quads(false);
    view.set_quads(true);

    // Nothing happens inside the triggering turn.
    assert!(view.is_stale());
    assert_eq!(view.installed().generation, 0);

    let installed = view.settle().await;
    assert_eq!(installed.generation, 1);
    assert_eq!(view.rebuild_count(), 1);
    assert!(!view.is_stale());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(view.rebuild_count(), 1);

    // First quad of the rebuilt geometry uses the new thickness.
    assert_eq!(installed.geometry.positions[1], 3.0);
}

#[tokio::test(start_paused = true)]
async fn later_changes_trigger_a_second_rebuild() {
    let view = load_with(&MemorySource::new(dst(0, &[RIGHT, RIGHT])), &LoadOptions::default(), seeded())
        .await
        .unwrap();
    view.set_quads(false);
    assert_eq!(view.settle().await.geometry.topology, Topology::LineStrip);
    view.set_quads(true);
    let installed = view.settle().await;
    assert_eq!(installed.geometry.topology, Topology::TriangleList);
    assert_eq!(installed.generation, 2);
    assert_eq!(view.rebuild_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn draw_range_scales_without_rebuilding() {
    // 50 segments -> 100 triangles.
    let view = load_with(
        &MemorySource::new(dst(0, &[RIGHT; 50])),
        &LoadOptions::default(),
        seeded(),
    )
    .await
    .unwrap();
    assert_eq!(view.installed().geometry.triangle_count(), 100);

    view.set_draw_range_fraction(0.5).unwrap();
    assert!(!view.is_stale());

    let frame = view.frame();
    assert_eq!(frame.draw_range.count, 150);
    assert_eq!(frame.geometry.visible_triangles(frame.draw_range), 50);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(view.rebuild_count(), 0);
    assert_eq!(view.frame().generation, 0);
}

#[tokio::test(start_paused = true)]
async fn invalid_values_leave_state_untouched() {
    let view = load(&MemorySource::new(dst(0, &[RIGHT])), &LoadOptions::default())
        .await
        .unwrap();

    assert!(matches!(
        view.set("threadThickness", "thick"),
        Err(ConfigError::InvalidNumber { .. })
    ));
    assert!(matches!(
        view.set("threadThickness", "-1"),
        Err(ConfigError::OutOfRange { .. })
    ));
    assert!(matches!(view.set("drawRange", "1.5"), Err(ConfigError::OutOfRange { .. })));
    assert!(matches!(view.set("palette", "red,notacolor"), Err(ConfigError::Color(_))));
    assert!(matches!(view.set("width", "1"), Err(ConfigError::UnknownKey(_))));

    assert_eq!(view.thread_thickness(), 2.0);
    assert!(!view.is_stale());
}

#[tokio::test(start_paused = true)]
async fn string_setters_coerce_values() {
    let view = load(&MemorySource::new(dst(0, &[RIGHT])), &LoadOptions::default())
        .await
        .unwrap();
    view.set("thread-thickness", " 4.5 ").unwrap();
    view.set("quads", "off").unwrap();
    view.set("drawRange", "0.25").unwrap();
    assert_eq!(view.thread_thickness(), 4.5);
    assert!(!view.quads());
    assert_eq!(view.draw_range_fraction(), 0.25);
}

#[tokio::test(start_paused = true)]
async fn setting_palette_rebuilds_it_from_scratch() {
    let view = load_with(
        &MemorySource::new(dst(3, &[RIGHT, STOP, RIGHT])),
        &LoadOptions::default(),
        seeded(),
    )
    .await
    .unwrap();
    let generated = view.palette();
    assert_eq!(generated.len(), 4);

    // Unrelated changes keep the generated entries.
    view.set_thread_thickness(1.0).unwrap();
    view.settle().await;
    assert_eq!(view.palette(), generated);

    let red = Color::new(1.0, 0.0, 0.0);
    view.set_palette(Some(vec![red]));
    let palette = view.palette();
    assert_eq!(palette.len(), 4);
    assert_eq!(palette[0], red);
    assert_ne!(palette[1..], generated[1..]);

    let installed = view.settle().await;
    assert_eq!(&installed.geometry.colors[..3], &[1.0, 0.0, 0.0]);
}

#[tokio::test(start_paused = true)]
async fn frozen_palette_and_seed_reproduce_geometry() {
    let bytes = dst(2, &[RIGHT, STOP, UP_JUMP, RIGHT, STOP, RIGHT]);
    let first = load_with(&MemorySource::new(bytes.clone()), &LoadOptions::default(), seeded())
        .await
        .unwrap();
    let options = LoadOptions {
        palette: Some(first.palette()),
        ..LoadOptions::default()
    };
    let config = ControllerConfig {
        palette_seed: None,
        ..seeded()
    };
    let second = load_with(&MemorySource::new(bytes), &options, config).await.unwrap();
    assert_eq!(first.installed().geometry, second.installed().geometry);
}

#[tokio::test(start_paused = true)]
async fn malformed_buffer_still_loads() {
    let view = load(&MemorySource::new(b"not a dst file".to_vec()), &LoadOptions::default())
        .await
        .unwrap();
    assert_eq!(view.installed().geometry.vertex_count(), 0);
    assert!(!view.installed().summary.anomalies.is_empty());
    assert_eq!(view.palette().len(), 1);
}

#[tokio::test]
async fn file_source_reads_and_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design.dst");
    std::fs::write(&path, dst(0, &[RIGHT, RIGHT])).unwrap();

    let view = load(&FileSource::new(&path), &LoadOptions::default()).await.unwrap();
    assert_eq!(view.installed().summary.events, 2);

    let missing = load(&FileSource::new(dir.path().join("nope.dst")), &LoadOptions::default()).await;
    assert!(matches!(missing, Err(LoadError::Retrieval(_))));
}

#[tokio::test]
async fn invalid_options_fail_before_fetching() {
    let options = LoadOptions {
        thread_thickness: Some(-2.0),
        ..LoadOptions::default()
    };
    let result = load(&FileSource::new("/definitely/not/here.dst"), &options).await;
    assert!(matches!(result, Err(LoadError::Config(_))));
}

#[tokio::test(start_paused = true)]
async fn decimal_draw_range_truncates_like_the_typed_value() {
    // 10 line vertices.
    let options = LoadOptions {
        quads: Some(false),
        ..LoadOptions::default()
    };
    let view = load(&MemorySource::new(dst(0, &[RIGHT; 10])), &options).await.unwrap();
    view.set("drawRange", "0.7").unwrap();
    assert_eq!(view.frame().draw_range.count, 7);
    view.set("drawRange", "0.3").unwrap();
    assert_eq!(view.frame().draw_range.count, 3);

    // 10 quads -> 60 indices.
    let view = load(&MemorySource::new(dst(0, &[RIGHT; 10])), &LoadOptions::default())
        .await
        .unwrap();
    view.set("drawRange", "0.7").unwrap();
    let frame = view.frame();
    assert_eq!(frame.draw_range.count, 42);
    assert_eq!(frame.geometry.visible_triangles(frame.draw_range), 14);
    assert_eq!(view.rebuild_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn palette_frozen_through_json_reproduces_geometry() {
    let bytes = dst(3, &[RIGHT, STOP, RIGHT, STOP, UP_JUMP, RIGHT, STOP, RIGHT]);
    let first = load_with(&MemorySource::new(bytes.clone()), &LoadOptions::default(), seeded())
        .await
        .unwrap();

    let json = serde_json::json!({ "palette": first.palette() }).to_string();
    let options = LoadOptions::from_json(&json).unwrap();
    let config = ControllerConfig {
        palette_seed: Some(12345),
        ..seeded()
    };
    let second = load_with(&MemorySource::new(bytes), &options, config).await.unwrap();

    assert_eq!(second.palette(), first.palette());
    assert_eq!(second.installed().geometry.colors, first.installed().geometry.colors);
    assert_eq!(second.installed().geometry, first.installed().geometry);
}
