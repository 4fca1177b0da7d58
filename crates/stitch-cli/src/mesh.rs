// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `stitchview mesh`

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use comfy_table::Table;
use serde::Serialize;
use stitch_geom::{DrawRange, GeometryBuffers, MODEL_SCALE};
use stitch_live::{load_with, parse_palette, ControllerConfig, FileSource, LoadOptions};
use tracing::info;

#[derive(Args, Debug)]
pub struct MeshArgs {
    /// DST file to read.
    file: PathBuf,
    /// JSON options file (`quads`, `threadThickness`, `jumpThreadThickness`, `palette`).
    #[arg(long)]
    options: Option<PathBuf>,
    /// Emit a polyline instead of a quad ribbon.
    #[arg(long)]
    lines: bool,
    /// Thread thickness in device units.
    #[arg(long)]
    thread_thickness: Option<f32>,
    /// Thickness of segments after jumps and color stops.
    #[arg(long)]
    jump_thread_thickness: Option<f32>,
    /// Comma-separated palette, e.g. `black,#ff8800`.
    #[arg(long)]
    palette: Option<String>,
    /// Live parameter change applied after loading (repeatable), e.g. `quads=false`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    sets: Vec<String>,
    /// Visible fraction of the stitch sequence.
    #[arg(long, default_value_t = 1.0)]
    draw_range: f64,
    /// Seed for UV jitter and generated palette entries.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the full buffers as JSON instead of a summary table.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct MeshReport<'a> {
    generation: u64,
    palette: Vec<String>,
    draw_range: DrawRange,
    visible_triangles: usize,
    model_scale: f32,
    geometry: &'a GeometryBuffers,
}

fn options_from(args: &MeshArgs) -> Result<LoadOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read options {}", path.display()))?;
            LoadOptions::from_json(&text).with_context(|| format!("parse options {}", path.display()))?
        }
        None => LoadOptions::default(),
    };
    if args.lines {
        options.quads = Some(false);
    }
    if let Some(t) = args.thread_thickness {
        options.thread_thickness = Some(t);
    }
    if let Some(t) = args.jump_thread_thickness {
        options.jump_thread_thickness = Some(t);
    }
    if let Some(list) = &args.palette {
        options.palette = parse_palette(list).context("parse --palette")?;
    }
    Ok(options)
}

pub async fn run(args: MeshArgs) -> Result<()> {
    let options = options_from(&args)?;
    let config = ControllerConfig {
        jitter_seed: args.seed,
        palette_seed: args.seed,
        ..ControllerConfig::default()
    };
    let view = load_with(&FileSource::new(&args.file), &options, config)
        .await
        .with_context(|| format!("load {}", args.file.display()))?;

    for set in &args.sets {
        let (key, value) = set
            .split_once('=')
            .ok_or_else(|| anyhow!("--set expects KEY=VALUE, got {set:?}"))?;
        view.set(key.trim(), value).with_context(|| format!("--set {set}"))?;
    }
    view.set_draw_range_fraction(args.draw_range).context("--draw-range")?;
    let installed = view.settle().await;
    info!(generation = installed.generation, "mesh ready");

    let frame = view.frame();
    let geometry = frame.geometry.as_ref();
    let report = MeshReport {
        generation: frame.generation,
        palette: view.palette().iter().map(ToString::to_string).collect(),
        draw_range: frame.draw_range,
        visible_triangles: geometry.visible_triangles(frame.draw_range),
        model_scale: MODEL_SCALE,
        geometry,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Topology".to_owned(), format!("{:?}", geometry.topology)]);
    table.add_row(vec!["Vertices".to_owned(), geometry.vertex_count().to_string()]);
    table.add_row(vec!["Triangles".to_owned(), geometry.triangle_count().to_string()]);
    table.add_row(vec![
        "Draw range".to_owned(),
        format!("{} of {}", frame.draw_range.count, geometry.element_count()),
    ]);
    table.add_row(vec!["Visible triangles".to_owned(), report.visible_triangles.to_string()]);
    table.add_row(vec!["Palette".to_owned(), report.palette.join(" ")]);
    if let Some(bounds) = geometry.bounds() {
        let scaled = bounds.scaled(MODEL_SCALE);
        table.add_row(vec![
            "Bounds (scene units)".to_owned(),
            format!("{:?} .. {:?}", scaled.min().to_array(), scaled.max().to_array()),
        ]);
    }
    table.add_row(vec!["Rebuilds".to_owned(), view.rebuild_count().to_string()]);
    println!("{table}");
    Ok(())
}
