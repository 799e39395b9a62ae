//! Static obstacles and the manager that scatters them down the slope
//!
//! Obstacles are placed by rejection sampling: pick a random spot, throw it
//! away if its bounds (plus a clearance gap) touch an existing obstacle, and
//! give up after a fixed number of attempts. Storage keeps insertion order so
//! "first collision wins" is reproducible for a given seed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::assets::{ImageKey, ImageProvider};
use super::entity::{Entity, Sprite};
use super::geometry::{Position, Rect, intersect_rects, random_int};
use crate::consts::*;

/// Distance beyond a camera edge where the spawn strip starts.
/// Larger than half of the biggest obstacle sprite so nothing pops in on screen.
const SPAWN_MARGIN: f32 = 50.0;
/// Depth of the spawn strip beyond the margin
const SPAWN_BAND: f32 = 100.0;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    TreeCluster,
    Rock1,
    Rock2,
    JumpRamp,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Tree,
        ObstacleKind::TreeCluster,
        ObstacleKind::Rock1,
        ObstacleKind::Rock2,
        ObstacleKind::JumpRamp,
    ];

    pub fn image(&self) -> ImageKey {
        match self {
            ObstacleKind::Tree => ImageKey::Tree,
            ObstacleKind::TreeCluster => ImageKey::TreeCluster,
            ObstacleKind::Rock1 => ImageKey::Rock1,
            ObstacleKind::Rock2 => ImageKey::Rock2,
            ObstacleKind::JumpRamp => ImageKey::JumpRamp,
        }
    }

    /// Ramps and rocks launch the skier instead of crashing them
    pub fn triggers_jump(&self) -> bool {
        matches!(
            self,
            ObstacleKind::JumpRamp | ObstacleKind::Rock1 | ObstacleKind::Rock2
        )
    }
}

/// A placed obstacle. Never moves once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    sprite: Sprite,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, position: Position) -> Self {
        Self {
            id,
            kind,
            sprite: Sprite::new(position, kind.image()),
        }
    }

    /// Hit box used against the skier: the upper half of the sprite only,
    /// so the skier crashes into the trunk rather than the shadow below it.
    pub fn collision_bounds(&self, images: &dyn ImageProvider) -> Option<Rect> {
        let size = self.image_size(images)?;
        let pos = self.position();
        Some(Rect::new(
            pos.x - size.width / 2.0,
            pos.y - size.height / 2.0,
            pos.x + size.width / 2.0,
            pos.y,
        ))
    }
}

impl Entity for Obstacle {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

/// Owns every obstacle currently alive on the slope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
    next_id: u32,
    /// Side-edge travel not yet spent on spawn rolls
    #[serde(default)]
    horizontal_travel: f32,
    /// Top/bottom-edge travel not yet spent on spawn rolls
    #[serde(default)]
    vertical_travel: f32,
}

impl ObstacleManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// All active obstacles in placement order
    #[inline]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Scatter the opening set of obstacles across the starting screen.
    ///
    /// Everything lands below the window center plus `STARTING_OBSTACLE_GAP`
    /// so the skier gets a clear run-in. Returns how many were placed.
    pub fn place_initial<R: Rng>(
        &mut self,
        window: &Rect,
        images: &dyn ImageProvider,
        rng: &mut R,
    ) -> usize {
        let count = ((window.width() / STARTING_OBSTACLE_REDUCER)
            * (window.height() / STARTING_OBSTACLE_REDUCER))
            .ceil()
            .max(0.0) as usize;
        let center_y = (window.top + window.bottom) / 2.0;
        let strip = Rect::new(
            window.left,
            center_y + STARTING_OBSTACLE_GAP,
            window.right,
            window.bottom,
        );

        let placed = (0..count)
            .filter(|_| self.place_random(&strip, images, rng).is_some())
            .count();
        log::info!("Placed {} of {} initial obstacles", placed, count);
        placed
    }

    /// Per-tick maintenance: spawn beyond every camera edge that moved
    /// outward, then drop obstacles left far behind.
    ///
    /// Each `SPAWN_ROLL_DISTANCE` of edge travel earns one spawn roll, so the
    /// slope gets the same obstacle density at any skier speed.
    pub fn update<R: Rng>(
        &mut self,
        window: &Rect,
        previous: &Rect,
        images: &dyn ImageProvider,
        rng: &mut R,
    ) {
        if window.left < previous.left {
            let rolls = earned_rolls(&mut self.horizontal_travel, previous.left - window.left);
            self.roll_spawns(&Self::left_strip(window), rolls, images, rng);
        } else if window.right > previous.right {
            let rolls = earned_rolls(&mut self.horizontal_travel, window.right - previous.right);
            self.roll_spawns(&Self::right_strip(window), rolls, images, rng);
        }

        if window.top < previous.top {
            let rolls = earned_rolls(&mut self.vertical_travel, previous.top - window.top);
            self.roll_spawns(&Self::top_strip(window), rolls, images, rng);
        } else if window.bottom > previous.bottom {
            let rolls = earned_rolls(&mut self.vertical_travel, window.bottom - previous.bottom);
            self.roll_spawns(&Self::bottom_strip(window), rolls, images, rng);
        }

        self.prune(window, window.height());
    }

    /// Remove obstacles more than `distance` above the top of `window`.
    /// Returns how many were removed.
    pub fn prune(&mut self, window: &Rect, distance: f32) -> usize {
        let cutoff = window.top - distance;
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.position().y >= cutoff);
        before - self.obstacles.len()
    }

    /// Roll the 1-in-N spawn chance `rolls` times, placing one obstacle in
    /// `strip` per success
    fn roll_spawns<R: Rng>(
        &mut self,
        strip: &Rect,
        rolls: u32,
        images: &dyn ImageProvider,
        rng: &mut R,
    ) {
        for _ in 0..rolls {
            let roll = random_int(rng, 1, NEW_OBSTACLE_CHANCE as i32);
            if roll == NEW_OBSTACLE_CHANCE as i32 {
                self.place_random(strip, images, rng);
            }
        }
    }

    /// Place a random obstacle somewhere in `area` (centers, not bounds).
    ///
    /// Returns the new id, or `None` when the retry budget ran out or the
    /// chosen kind has no image yet.
    pub fn place_random<R: Rng>(
        &mut self,
        area: &Rect,
        images: &dyn ImageProvider,
        rng: &mut R,
    ) -> Option<u32> {
        let index = random_int(rng, 0, ObstacleKind::ALL.len() as i32 - 1) as usize;
        let kind = ObstacleKind::ALL[index];

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = random_int(rng, area.left.ceil() as i32, area.right.floor() as i32) as f32;
            let y = random_int(rng, area.top.ceil() as i32, area.bottom.floor() as i32) as f32;
            if let Some(id) = self.place_at(kind, Position::new(x, y), images) {
                return Some(id);
            }
        }

        log::debug!(
            "No room for a {:?} after {} attempts, skipping spawn",
            kind,
            MAX_PLACEMENT_ATTEMPTS
        );
        None
    }

    /// Place `kind` at exactly `position` unless it would crowd a neighbour
    pub fn place_at(
        &mut self,
        kind: ObstacleKind,
        position: Position,
        images: &dyn ImageProvider,
    ) -> Option<u32> {
        let Some(size) = images.image_size(kind.image()) else {
            log::debug!("No image for {:?}, cannot place it", kind);
            return None;
        };
        let candidate = Rect::centered(position, size.width, size.height).expanded(OBSTACLE_GAP);
        if self.overlaps_any(&candidate, images) {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle::new(id, kind, position));
        Some(id)
    }

    fn overlaps_any(&self, candidate: &Rect, images: &dyn ImageProvider) -> bool {
        self.obstacles.iter().any(|o| {
            o.bounds(images)
                .is_some_and(|bounds| intersect_rects(candidate, &bounds))
        })
    }

    /// First obstacle, in placement order, whose hit box touches `bounds`
    pub fn first_collision(&self, bounds: &Rect, images: &dyn ImageProvider) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| {
            o.collision_bounds(images)
                .is_some_and(|hit_box| intersect_rects(bounds, &hit_box))
        })
    }

    /// Obstacles sorted top to bottom so lower sprites overlap higher ones
    pub fn draw_order(&self) -> Vec<&Obstacle> {
        let mut sorted: Vec<&Obstacle> = self.obstacles.iter().collect();
        sorted.sort_by(|a, b| a.position().y.total_cmp(&b.position().y));
        sorted
    }

    fn left_strip(window: &Rect) -> Rect {
        Rect::new(
            window.left - SPAWN_MARGIN - SPAWN_BAND,
            window.top,
            window.left - SPAWN_MARGIN,
            window.bottom,
        )
    }

    fn right_strip(window: &Rect) -> Rect {
        Rect::new(
            window.right + SPAWN_MARGIN,
            window.top,
            window.right + SPAWN_MARGIN + SPAWN_BAND,
            window.bottom,
        )
    }

    fn top_strip(window: &Rect) -> Rect {
        Rect::new(
            window.left,
            window.top - SPAWN_MARGIN - SPAWN_BAND,
            window.right,
            window.top - SPAWN_MARGIN,
        )
    }

    fn bottom_strip(window: &Rect) -> Rect {
        Rect::new(
            window.left,
            window.bottom + SPAWN_MARGIN,
            window.right,
            window.bottom + SPAWN_MARGIN + SPAWN_BAND,
        )
    }
}

/// Bank `advance` px of edge travel and spend it on whole spawn rolls
fn earned_rolls(travel: &mut f32, advance: f32) -> u32 {
    *travel += advance;
    let rolls = (*travel / SPAWN_ROLL_DISTANCE).floor().max(0.0);
    *travel -= rolls * SPAWN_ROLL_DISTANCE;
    rolls as u32
}
