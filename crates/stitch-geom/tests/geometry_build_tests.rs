#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! Integration tests: DST bytes through walker and synthesizer.

use rand::rngs::StdRng;
use rand::SeedableRng;
use stitch_codec::{ColorSource, Palette, HEADER_LEN, SENTINEL};
use stitch_geom::{build, GeometryParams, Topology};

const RIGHT: [u8; 3] = [0x01, 0x00, 0x03];
const UP_JUMP: [u8; 3] = [0x80, 0x00, 0x83];
const STOP: [u8; 3] = [0x00, 0x00, 0xC3];

const QUADS: GeometryParams = GeometryParams {
    quads: true,
    thread_thickness: 2.0,
    jump_thread_thickness: 0.01,
};
const LINES: GeometryParams = GeometryParams { quads: false, ..QUADS };

fn dst(records: &[[u8; 3]]) -> Vec<u8> {
    let mut bytes = vec![b' '; HEADER_LEN];
    bytes[..7].copy_from_slice(b"CO:   2");
    for r in records {
        bytes.extend_from_slice(r);
    }
    bytes
}

fn palette() -> Palette {
    Palette::resolve(&[], 2, &mut StdRng::seed_from_u64(11))
}

#[test]
fn two_record_line_scenario() {
    let bytes = dst(&[RIGHT, UP_JUMP, SENTINEL]);
    let p = palette();
    let out = build(&bytes, ColorSource::Palette(&p), &LINES, 0);
    assert_eq!(out.geometry.topology, Topology::LineStrip);
    assert_eq!(out.geometry.positions, vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
    assert_eq!(out.geometry.colors[..3], out.geometry.colors[3..]);
    assert!(out.geometry.indices.is_empty());
}

#[test]
fn quad_counts_follow_event_count() {
    let records = [RIGHT, RIGHT, UP_JUMP, STOP, RIGHT, STOP, RIGHT, SENTINEL, RIGHT];
    let bytes = dst(&records);
    let p = palette();
    let quads = build(&bytes, ColorSource::Palette(&p), &QUADS, 0);
    let events = quads.summary.events;
    assert_eq!(events, 7);
    assert_eq!(quads.geometry.vertex_count(), events * 4);
    assert_eq!(quads.geometry.indices.len(), events * 6);
    assert_eq!(quads.geometry.uvs.len(), events * 8);

    let lines = build(&bytes, ColorSource::Palette(&p), &LINES, 0);
    assert_eq!(lines.geometry.vertex_count(), events);
    assert!(lines.geometry.indices.is_empty());
}

#[test]
fn same_inputs_give_bit_identical_buffers() {
    let bytes = dst(&[RIGHT, STOP, UP_JUMP, RIGHT, STOP, RIGHT, SENTINEL]);
    let p = palette();
    let a = build(&bytes, ColorSource::Palette(&p), &QUADS, 1234);
    let b = build(&bytes, ColorSource::Palette(&p), &QUADS, 1234);
    assert_eq!(a, b);
    let bytes_a: Vec<u8> = a.geometry.uv_bytes().to_vec();
    assert_eq!(bytes_a, b.geometry.uv_bytes());
}

#[test]
fn header_only_file_builds_empty_geometry() {
    let bytes = dst(&[]);
    let p = palette();
    let out = build(&bytes, ColorSource::Palette(&p), &QUADS, 0);
    assert_eq!(out.geometry.vertex_count(), 0);
    assert!(out.geometry.bounds().is_none());
    assert!(!out.summary.anomalies.is_empty());
}

#[test]
fn bounds_include_ribbon_width() {
    let bytes = dst(&[RIGHT, RIGHT, RIGHT, SENTINEL]);
    let p = palette();
    let out = build(&bytes, ColorSource::Palette(&p), &QUADS, 0);
    let b = out.geometry.bounds().unwrap();
    assert_eq!(b.min().to_array(), [0.0, -2.0, 0.0]);
    assert_eq!(b.max().to_array(), [3.0, 2.0, 0.0]);
}
