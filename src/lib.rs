//! Downhill Chase - an endless skiing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (skier, obstacles, rhino, frame loop)
//! - `audio`: Sound playback behind the `SoundPlayer` seam
//! - `hud`: On-screen readouts
//! - `settings`: Display and audio preferences
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioManager, SoundPlayer};
pub use hud::SpeedReadout;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, speeds are pixels per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Skier speed at the start of a run and after crash recovery
    pub const STARTING_SPEED: f32 = 10.0;
    /// Diagonal movement divides speed by this on each axis
    pub const DIAGONAL_SPEED_REDUCER: f32 = std::f32::consts::SQRT_2;
    /// Speed added per speed-up key press
    pub const SPEED_UP_STEP: f32 = 1.0;

    /// Sprite animation frame length (seconds)
    pub const ANIMATION_FRAME_SECS: f32 = 0.25;
    /// How long a jump keeps the skier airborne (seconds)
    pub const JUMP_DURATION_SECS: f32 = 1.8;
    /// When the landing sprite replaces the jump sprite (seconds after take-off)
    pub const LANDING_SWAP_SECS: f32 = 2.0;
    /// Delay between the skier being eaten and the session restarting
    pub const RESTART_DELAY_SECS: f32 = 5.0;
    /// Volume used for every gameplay sound
    pub const SOUND_VOLUME: f32 = 0.5;

    /// Rhino pursuit speed, pixels per tick (must beat STARTING_SPEED)
    pub const RHINO_SPEED: f32 = 11.0;
    /// How far above the skier the rhino starts
    pub const RHINO_START_DISTANCE: f32 = 1500.0;

    /// Initial obstacles never spawn closer than this below the skier
    pub const STARTING_OBSTACLE_GAP: f32 = 100.0;
    /// Screen area per initial obstacle is REDUCER x REDUCER pixels
    pub const STARTING_OBSTACLE_REDUCER: f32 = 300.0;
    /// One in N chance per spawn roll to place an obstacle
    pub const NEW_OBSTACLE_CHANCE: u32 = 8;
    /// Camera edge travel that earns one spawn roll (one tick at base speed)
    pub const SPAWN_ROLL_DISTANCE: f32 = STARTING_SPEED;
    /// Extra clearance kept around every obstacle at placement
    pub const OBSTACLE_GAP: f32 = 50.0;
    /// Rejection sampling budget for a single placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 32;

    /// Default display size
    pub const GAME_WIDTH: f32 = 1280.0;
    pub const GAME_HEIGHT: f32 = 720.0;
}
