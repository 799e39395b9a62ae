//! Game state and the events it emits
//!
//! Everything the frame loop mutates lives in `GameState`. The simulation
//! never calls out to audio or the page; it leaves `GameEvent`s behind for
//! the front end to act on.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::assets::{ImageProvider, SoundKey};
use super::entity::Entity;
use super::geometry::{Position, Rect};
use super::obstacle::ObstacleManager;
use super::rhino::Rhino;
use super::skier::Skier;
use crate::consts::SOUND_VOLUME;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Things that happened during a tick that the outside world may care about
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    PlaySound { sound: SoundKey, volume: f32 },
    /// Start looping `sound`, replacing whatever was looping before
    PlayMusic { sound: SoundKey, volume: f32 },
    /// Skier speed changed (speed-up intent)
    SpeedChanged { speed: f32 },
    /// Rhino reached the skier
    SkierCaught,
    /// The post-death delay ran out; the session restarts this tick
    RestartRequested,
}

/// Visible area size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Camera rectangle centered on `focus`
    pub fn window_around(&self, focus: Position) -> Rect {
        Rect::centered(focus, self.width, self.height)
    }
}

impl From<&Settings> for Viewport {
    fn from(settings: &Settings) -> Self {
        Self::new(settings.display_width, settings.display_height)
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed of the current session
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub skier: Skier,
    pub rhino: Rhino,
    pub obstacles: ObstacleManager,
    /// Camera window this tick
    pub camera: Rect,
    /// Camera window last tick, for working out which edges advanced
    pub previous_camera: Rect,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Sessions started so far, including the first
    pub session: u32,
    /// Events not yet taken by the front end
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a session: skier at the origin, obstacles ahead, rhino behind
    pub fn new(
        seed: u64,
        viewport: Viewport,
        tuning: Tuning,
        images: &dyn ImageProvider,
    ) -> Self {
        let tuning = tuning.sanitized();
        let skier = Skier::new(Vec2::ZERO, &tuning);
        let rhino = Rhino::new(Vec2::new(0.0, -tuning.rhino_start_distance), &tuning);
        let camera = viewport.window_around(skier.position());

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            viewport,
            skier,
            rhino,
            obstacles: ObstacleManager::new(),
            camera,
            previous_camera: camera,
            time_ticks: 0,
            session: 1,
            events: vec![GameEvent::PlayMusic {
                sound: SoundKey::Run,
                volume: SOUND_VOLUME,
            }],
        };
        state.collect_events();
        state
            .obstacles
            .place_initial(&state.camera, images, &mut state.rng);
        state
    }

    /// Throw the session away and start over with a seed drawn from this one
    pub fn restart(&mut self, images: &dyn ImageProvider) {
        let seed = self.rng.next_u64();
        let session = self.session + 1;
        let mut events = std::mem::take(&mut self.events);
        *self = Self::new(seed, self.viewport, self.tuning.clone(), images);
        self.session = session;
        events.append(&mut self.events);
        self.events = events;
        log::info!("Session {} started with seed {}", session, seed);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move entity outboxes into the shared event list
    pub(crate) fn collect_events(&mut self) {
        self.events.extend(self.skier.drain_events());
        self.events.extend(self.rhino.drain_events());
    }

    /// Recenter the camera on the skier, remembering where it was
    pub(crate) fn follow_skier(&mut self) {
        self.previous_camera = self.camera;
        self.camera = self.viewport.window_around(self.skier.position());
    }
}
