//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order for obstacles)
//! - No rendering or platform dependencies

pub mod assets;
pub mod entity;
pub mod geometry;
pub mod obstacle;
pub mod rhino;
pub mod skier;
pub mod state;
pub mod tick;
pub mod timer;

pub use assets::{ImageAtlas, ImageKey, ImageProvider, ImageSize, SoundKey};
pub use entity::{Entity, RenderItem, Sprite};
pub use geometry::{Position, Rect, direction_vector, intersect_rects, random_int};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleManager};
pub use rhino::{Rhino, RhinoState};
pub use skier::{Direction, Skier, SkierState};
pub use state::{GameEvent, GameState, Viewport};
pub use tick::{TickInput, render_list, tick};
pub use timer::ScheduledTask;
