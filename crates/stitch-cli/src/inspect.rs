// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `stitchview inspect`

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stitch_codec::{ColorSource, EndReason, Header, Palette};
use stitch_geom::{build, GeometryParams};
use stitch_live::{ByteSource, FileSource};

pub async fn run(file: &Path, seed: Option<u64>) -> Result<()> {
    let bytes = FileSource::new(file)
        .fetch()
        .await
        .with_context(|| format!("inspect {}", file.display()))?;

    let header = Header::parse(&bytes);
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let palette = Palette::resolve(&[], header.color_change_count, &mut rng);
    let lines = GeometryParams {
        quads: false,
        thread_thickness: 0.0,
        jump_thread_thickness: 0.0,
    };
    let out = build(&bytes, ColorSource::Palette(&palette), &lines, 0);
    let summary = &out.summary;

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["File".to_owned(), file.display().to_string()]);
    table.add_row(vec!["Size (bytes)".to_owned(), bytes.len().to_string()]);
    table.add_row(vec!["Label".to_owned(), header.label.clone().unwrap_or_else(|| "-".into())]);
    table.add_row(vec![
        "Declared stitches".to_owned(),
        header.stitch_count.map_or_else(|| "-".into(), |n| n.to_string()),
    ]);
    table.add_row(vec!["Color changes".to_owned(), header.color_change_count.to_string()]);
    if let Some(e) = header.extents {
        table.add_row(vec![
            "Declared extents".to_owned(),
            format!("+X {} -X {} +Y {} -Y {}", e.plus_x, e.minus_x, e.plus_y, e.minus_y),
        ]);
    }
    table.add_row(vec!["Stitch events".to_owned(), summary.events.to_string()]);
    table.add_row(vec!["Jumps".to_owned(), summary.jumps.to_string()]);
    table.add_row(vec!["Color stops".to_owned(), summary.color_stops.to_string()]);
    table.add_row(vec![
        "Ended by".to_owned(),
        match summary.end {
            Some(EndReason::Sentinel) => "end marker".to_owned(),
            Some(EndReason::EndOfBuffer) | None => "end of buffer".to_owned(),
        },
    ]);
    if let Some(bounds) = out.geometry.bounds() {
        // Device units are 0.1 mm.
        let size = bounds.size() * 0.1;
        table.add_row(vec!["Size (mm)".to_owned(), format!("{:.1} x {:.1}", size.x, size.y)]);
    }
    for anomaly in header.anomalies.iter().chain(&summary.anomalies) {
        table.add_row(vec!["Anomaly".to_owned(), anomaly.to_string()]);
    }

    println!("{table}");
    Ok(())
}
