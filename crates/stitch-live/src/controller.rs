// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Live parameter controller.
//!
//! Setters only record the new value and mark the geometry stale. A single
//! background task owns regeneration: it wakes on the first change, waits out
//! the debounce window so changes arriving together collapse, snapshots the
//! parameters, rebuilds, and installs the new buffers by replacing the shared
//! handle. Draw range never goes through that path; it is applied per frame.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use stitch_codec::{Color, ColorSource, Header, Palette, WalkSummary};
use stitch_geom::{build, DrawRange, GeometryBuffers};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::error::ConfigError;
use crate::options::{
    check_draw_range, check_jump_thread_thickness, check_thread_thickness, parse_bool,
    parse_number, parse_palette, ControllerConfig, ParamKey, RenderParameters,
};

/// A geometry build that has been handed to consumers.
#[derive(Clone, Debug)]
pub struct Installed {
    /// 0 for the initial build, +1 per rebuild.
    pub generation: u64,
    /// The buffers. Replaced, never mutated.
    pub geometry: Arc<GeometryBuffers>,
    /// What the walk saw while building them.
    pub summary: Arc<WalkSummary>,
}

/// What a renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Current buffers.
    pub geometry: Arc<GeometryBuffers>,
    /// Slice to draw this frame.
    pub draw_range: DrawRange,
    /// Generation of `geometry`.
    pub generation: u64,
}

struct State {
    params: RenderParameters,
    palette: Palette,
    palette_rng: StdRng,
    stale: bool,
    rebuilding: bool,
    rebuilds: u64,
}

struct Shared {
    bytes: Vec<u8>,
    header: Header,
    jitter_seed: u64,
    state: Mutex<State>,
    wake: Notify,
    installed: watch::Sender<Installed>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Owns one decoded DST file and keeps its geometry in sync with the live
/// [`RenderParameters`].
///
/// Dropping the controller stops its rebuild task.
pub struct LiveController {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl LiveController {
    /// Parses `bytes`, builds the initial geometry synchronously, and starts
    /// the rebuild task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(bytes: Vec<u8>, params: RenderParameters, config: ControllerConfig) -> Self {
        let header = Header::parse(&bytes);
        let mut palette_rng = match config.palette_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let jitter_seed = config.jitter_seed.unwrap_or_else(rand::random);
        let palette = resolve(&params, &header, &mut palette_rng);

        let initial = build(&bytes, ColorSource::Palette(&palette), &params.geometry(), jitter_seed);
        info!(
            color_changes = header.color_change_count,
            events = initial.summary.events,
            vertices = initial.geometry.vertex_count(),
            "initial geometry built"
        );
        let (installed, _) = watch::channel(Installed {
            generation: 0,
            geometry: Arc::new(initial.geometry),
            summary: Arc::new(initial.summary),
        });

        let shared = Arc::new(Shared {
            bytes,
            header,
            jitter_seed,
            state: Mutex::new(State {
                params,
                palette,
                palette_rng,
                stale: false,
                rebuilding: false,
                rebuilds: 0,
            }),
            wake: Notify::new(),
            installed,
        });
        let task = tokio::spawn(run_rebuilds(Arc::clone(&shared), config.debounce));
        Self { shared, task }
    }

    /// Parsed header of the loaded file.
    pub fn header(&self) -> &Header {
        &self.shared.header
    }

    /// Snapshot of the current parameters.
    pub fn params(&self) -> RenderParameters {
        self.shared.lock().params.clone()
    }

    /// Quad ribbon (`true`) or polyline.
    pub fn quads(&self) -> bool {
        self.shared.lock().params.quads
    }

    /// Ribbon offset for ordinary stitches.
    pub fn thread_thickness(&self) -> f32 {
        self.shared.lock().params.thread_thickness
    }

    /// Ribbon offset after jumps and stops.
    pub fn jump_thread_thickness(&self) -> f32 {
        self.shared.lock().params.jump_thread_thickness
    }

    /// The resolved palette, generated entries included.
    pub fn palette(&self) -> Vec<Color> {
        self.shared.lock().palette.colors().to_vec()
    }

    /// Visible fraction of the stitch sequence.
    pub fn draw_range_fraction(&self) -> f64 {
        self.shared.lock().params.draw_range_fraction
    }

    /// Switches between quads and lines.
    pub fn set_quads(&self, on: bool) {
        self.mutate(|st| st.params.quads = on);
    }

    /// Sets the ordinary thread thickness.
    pub fn set_thread_thickness(&self, value: f32) -> Result<(), ConfigError> {
        let value = check_thread_thickness(value)?;
        self.mutate(|st| st.params.thread_thickness = value);
        Ok(())
    }

    /// Sets the thickness used after jumps and stops.
    pub fn set_jump_thread_thickness(&self, value: f32) -> Result<(), ConfigError> {
        let value = check_jump_thread_thickness(value)?;
        self.mutate(|st| st.params.jump_thread_thickness = value);
        Ok(())
    }

    /// Replaces the user palette; the resolved palette is rebuilt from scratch,
    /// so previously generated fill-ins are discarded.
    pub fn set_palette(&self, palette: Option<Vec<Color>>) {
        let header = &self.shared.header;
        self.mutate(|st| {
            st.params.palette = palette;
            st.palette = resolve(&st.params, header, &mut st.palette_rng);
        });
    }

    /// Sets the visible fraction. Takes effect on the next [`frame`](Self::frame)
    /// without rebuilding.
    pub fn set_draw_range_fraction(&self, value: f64) -> Result<(), ConfigError> {
        let value = check_draw_range(value)?;
        self.shared.lock().params.draw_range_fraction = value;
        Ok(())
    }

    /// String-keyed setter for panels and command lines. The value is parsed
    /// and validated before anything changes.
    pub fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key: ParamKey = key.parse()?;
        match key {
            ParamKey::Quads => self.set_quads(parse_bool(key, value)?),
            ParamKey::ThreadThickness => self.set_thread_thickness(parse_number(key, value)?)?,
            ParamKey::JumpThreadThickness => {
                self.set_jump_thread_thickness(parse_number(key, value)?)?;
            }
            ParamKey::Palette => self.set_palette(parse_palette(value)?),
            ParamKey::DrawRange => self.set_draw_range_fraction(parse_number(key, value)?)?,
        }
        Ok(())
    }

    /// Current geometry and the slice of it to draw.
    pub fn frame(&self) -> Frame {
        let installed = self.shared.installed.borrow().clone();
        let fraction = self.draw_range_fraction();
        Frame {
            draw_range: installed.geometry.draw_range(fraction),
            geometry: installed.geometry,
            generation: installed.generation,
        }
    }

    /// The most recently installed build.
    pub fn installed(&self) -> Installed {
        self.shared.installed.borrow().clone()
    }

    /// Receiver notified each time a rebuild is installed.
    pub fn subscribe(&self) -> watch::Receiver<Installed> {
        self.shared.installed.subscribe()
    }

    /// Whether a change is waiting to be rebuilt.
    pub fn is_stale(&self) -> bool {
        self.shared.lock().stale
    }

    /// Whether a rebuild is running right now.
    pub fn is_rebuilding(&self) -> bool {
        self.shared.lock().rebuilding
    }

    /// Rebuilds completed since load.
    pub fn rebuild_count(&self) -> u64 {
        self.shared.lock().rebuilds
    }

    /// Waits until no change is pending and no rebuild is running.
    pub async fn settle(&self) -> Installed {
        let mut rx = self.subscribe();
        loop {
            let busy = {
                let st = self.shared.lock();
                st.stale || st.rebuilding
            };
            if !busy || rx.changed().await.is_err() {
                break;
            }
        }
        self.installed()
    }

    fn mutate(&self, f: impl FnOnce(&mut State)) {
        {
            let mut st = self.shared.lock();
            f(&mut st);
            st.stale = true;
        }
        self.shared.wake.notify_one();
    }
}

impl Drop for LiveController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn resolve(params: &RenderParameters, header: &Header, rng: &mut StdRng) -> Palette {
    let user = params.palette.as_deref().unwrap_or_default();
    Palette::resolve(user, header.color_change_count, rng)
}

#[instrument(skip_all)]
async fn run_rebuilds(shared: Arc<Shared>, debounce: Duration) {
    loop {
        shared.wake.notified().await;
        // Defer past the triggering turn so simultaneous changes coalesce.
        if debounce.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(debounce).await;
        }

        let (params, palette) = {
            let mut st = shared.lock();
            if !st.stale {
                continue;
            }
            st.stale = false;
            st.rebuilding = true;
            (st.params.clone(), st.palette.clone())
        };

        let out = build(
            &shared.bytes,
            ColorSource::Palette(&palette),
            &params.geometry(),
            shared.jitter_seed,
        );
        let generation = shared.installed.borrow().generation + 1;
        let vertices = out.geometry.vertex_count();
        {
            // Install and clear the in-flight flag together so `settle` never
            // sees one without the other. Readers keep whatever Arc they
            // already hold; old buffers drop once the last of them lets go.
            let mut st = shared.lock();
            shared.installed.send_replace(Installed {
                generation,
                geometry: Arc::new(out.geometry),
                summary: Arc::new(out.summary),
            });
            st.rebuilding = false;
            st.rebuilds += 1;
        }
        info!(generation, vertices, quads = params.quads, "geometry rebuilt");
        debug!(?params, "rebuild parameters");
    }
}
