//! The player-controlled skier
//!
//! Movement is a small state machine (skiing, crashed, dead) over a
//! five-position facing track. Jumping is an overlay on top of skiing with two
//! owned timers: one ends the jump, the other swaps in the landing sprite.

use serde::{Deserialize, Serialize};

use super::assets::{ImageKey, ImageProvider, SoundKey};
use super::entity::{Entity, Sprite};
use super::geometry::{Position, Rect};
use super::obstacle::{ObstacleKind, ObstacleManager};
use super::state::GameEvent;
use super::timer::ScheduledTask;
use crate::consts::{DIAGONAL_SPEED_REDUCER, SOUND_VOLUME};
use crate::tuning::Tuning;

/// Skier lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkierState {
    /// Moving down the hill
    Skiing,
    /// Stopped in an obstacle, waiting for a left/right turn
    Crashed,
    /// Eaten. No way back except a new session.
    Dead,
}

/// Where the skier is pointing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    LeftDown,
    Down,
    RightDown,
    Right,
    /// Reported while airborne; never stored as a facing
    Jump,
}

impl Direction {
    pub fn image(&self) -> ImageKey {
        match self {
            Direction::Left => ImageKey::SkierLeft,
            Direction::LeftDown => ImageKey::SkierLeftDown,
            Direction::Down => ImageKey::SkierDown,
            Direction::RightDown => ImageKey::SkierRightDown,
            Direction::Right => ImageKey::SkierRight,
            Direction::Jump => ImageKey::SkierJump,
        }
    }

    /// One step toward Left on the facing track
    pub fn step_left(&self) -> Self {
        match self {
            Direction::Right => Direction::RightDown,
            Direction::RightDown => Direction::Down,
            Direction::Down => Direction::LeftDown,
            Direction::LeftDown | Direction::Left => Direction::Left,
            Direction::Jump => Direction::Jump,
        }
    }

    /// One step toward Right on the facing track
    pub fn step_right(&self) -> Self {
        match self {
            Direction::Left => Direction::LeftDown,
            Direction::LeftDown => Direction::Down,
            Direction::Down => Direction::RightDown,
            Direction::RightDown | Direction::Right => Direction::Right,
            Direction::Jump => Direction::Jump,
        }
    }

    /// Facings a jump can start from
    pub fn is_downhill(&self) -> bool {
        matches!(
            self,
            Direction::LeftDown | Direction::Down | Direction::RightDown
        )
    }

    /// Per-tick displacement at `speed`. Diagonals keep the same net speed.
    pub fn displacement(&self, speed: f32) -> Position {
        let diagonal = speed / DIAGONAL_SPEED_REDUCER;
        match self {
            Direction::LeftDown => Position::new(-diagonal, diagonal),
            Direction::Down => Position::new(0.0, speed),
            Direction::RightDown => Position::new(diagonal, diagonal),
            Direction::Left | Direction::Right | Direction::Jump => Position::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skier {
    sprite: Sprite,
    state: SkierState,
    /// Position on the five-step track; the jump overlay doesn't touch it
    facing: Direction,
    speed: f32,
    is_jumping: bool,
    jump_end: ScheduledTask,
    landing_swap: ScheduledTask,
    restart: ScheduledTask,
    tuning: Tuning,
    /// Outbox drained by the frame loop
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Skier {
    pub fn new(position: Position, tuning: &Tuning) -> Self {
        Self {
            sprite: Sprite::new(position, ImageKey::SkierDown),
            state: SkierState::Skiing,
            facing: Direction::Down,
            speed: tuning.starting_speed,
            is_jumping: false,
            jump_end: ScheduledTask::idle(),
            landing_swap: ScheduledTask::idle(),
            restart: ScheduledTask::idle(),
            tuning: tuning.clone(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> SkierState {
        self.state
    }

    #[inline]
    pub fn is_skiing(&self) -> bool {
        self.state == SkierState::Skiing
    }

    #[inline]
    pub fn is_crashed(&self) -> bool {
        self.state == SkierState::Crashed
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == SkierState::Dead
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Reported direction: `Jump` while airborne, the facing otherwise
    pub fn direction(&self) -> Direction {
        if self.is_jumping {
            Direction::Jump
        } else {
            self.facing
        }
    }

    /// Time until the current jump ends, zero on the ground
    pub fn jump_time_remaining(&self) -> f32 {
        self.jump_end.remaining()
    }

    /// Take everything emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Teleport, used by scenario setup and tests
    pub fn set_position(&mut self, position: Position) {
        self.sprite.position = position;
    }

    fn set_direction(&mut self, direction: Direction) {
        self.facing = direction;
        if !self.is_jumping {
            self.sprite.image = direction.image();
        }
    }

    /// Advance one tick: move, check obstacles, run timers.
    ///
    /// Returns the kind of obstacle hit this tick, if any.
    pub fn update(
        &mut self,
        dt: f32,
        obstacles: &ObstacleManager,
        images: &dyn ImageProvider,
    ) -> Option<ObstacleKind> {
        let mut hit = None;
        if self.is_skiing() {
            self.move_skier();
            hit = self.check_if_hit_obstacle(obstacles, images);
        }
        self.advance_timers(dt);
        hit
    }

    fn move_skier(&mut self) {
        let step = match self.direction() {
            // Airborne skiers keep their take-off line
            Direction::Jump => self.facing.displacement(self.speed),
            direction => direction.displacement(self.speed),
        };
        self.sprite.position += step;
    }

    fn advance_timers(&mut self, dt: f32) {
        if self.landing_swap.advance(dt) && self.is_jumping {
            self.sprite.image = ImageKey::JumpRampBottom;
        }
        if self.jump_end.advance(dt) {
            self.land();
        }
        if self.restart.advance(dt) {
            log::info!("Restarting after the skier was eaten");
            self.events.push(GameEvent::RestartRequested);
        }
    }

    /// Turn one step left; at the end of the track, shuffle left instead.
    /// A crashed skier gets back up facing left.
    pub fn turn_left(&mut self) {
        match self.state {
            SkierState::Dead => return,
            SkierState::Crashed => self.recover_from_crash(Direction::Left),
            SkierState::Skiing => {}
        }

        // A recovered skier already faces Left, so it sidesteps right away
        if self.facing == Direction::Left {
            self.sprite.position.x -= self.tuning.starting_speed;
        } else {
            self.set_direction(self.facing.step_left());
        }
    }

    /// Mirror of `turn_left`
    pub fn turn_right(&mut self) {
        match self.state {
            SkierState::Dead => return,
            SkierState::Crashed => self.recover_from_crash(Direction::Right),
            SkierState::Skiing => {}
        }

        if self.facing == Direction::Right {
            self.sprite.position.x += self.tuning.starting_speed;
        } else {
            self.set_direction(self.facing.step_right());
        }
    }

    /// Climb back up a little, only possible while facing fully sideways
    pub fn turn_up(&mut self) {
        if !self.is_skiing() {
            return;
        }
        if matches!(self.facing, Direction::Left | Direction::Right) {
            self.sprite.position.y -= self.tuning.starting_speed;
        }
    }

    /// Point straight downhill. Can't be used to escape a crash.
    pub fn turn_down(&mut self) {
        if !self.is_skiing() {
            return;
        }
        self.set_direction(Direction::Down);
    }

    pub fn increase_speed(&mut self, amount: f32) {
        if !self.is_skiing() {
            return;
        }
        self.speed += amount;
        self.events.push(GameEvent::SpeedChanged { speed: self.speed });
    }

    /// Take off, or keep the current jump's deadline if already airborne.
    ///
    /// Returns true if a new jump started.
    pub fn jump(&mut self) -> bool {
        if !self.is_skiing() {
            return false;
        }
        if self.is_jumping {
            self.jump_end.reschedule_remaining();
            return false;
        }
        if !self.facing.is_downhill() {
            return false;
        }

        self.is_jumping = true;
        self.sprite.image = ImageKey::SkierJump;
        self.jump_end.schedule(self.tuning.jump_duration);
        self.landing_swap.schedule(self.tuning.landing_swap_delay);
        self.events.push(GameEvent::PlaySound {
            sound: SoundKey::Jump,
            volume: SOUND_VOLUME,
        });
        true
    }

    /// Jump timer expired: back on the snow with the facing sprite
    fn land(&mut self) {
        self.end_jump();
        if self.is_skiing() {
            self.sprite.image = self.facing.image();
        }
    }

    fn end_jump(&mut self) {
        self.is_jumping = false;
        self.jump_end.cancel();
        self.landing_swap.cancel();
    }

    /// Find the first obstacle under the skier and react to it
    pub fn check_if_hit_obstacle(
        &mut self,
        obstacles: &ObstacleManager,
        images: &dyn ImageProvider,
    ) -> Option<ObstacleKind> {
        let Some(bounds) = self.bounds(images) else {
            log::debug!("Skier image {} missing, skipping collision", self.image().as_str());
            return None;
        };
        let kind = obstacles.first_collision(&bounds, images)?.kind;

        if kind.triggers_jump() {
            self.jump();
        } else {
            self.crash();
        }
        Some(kind)
    }

    pub fn crash(&mut self) {
        if self.is_dead() {
            return;
        }
        self.end_jump();
        self.state = SkierState::Crashed;
        self.speed = 0.0;
        self.sprite.image = ImageKey::SkierCrash;
    }

    fn recover_from_crash(&mut self, direction: Direction) {
        self.state = SkierState::Skiing;
        self.speed = self.tuning.starting_speed;
        self.set_direction(direction);
    }

    /// Caught by the rhino. Plays the crash sound and arms the restart.
    pub fn die(&mut self) {
        if self.is_dead() {
            return;
        }
        self.end_jump();
        self.state = SkierState::Dead;
        self.speed = 0.0;
        self.restart.schedule(self.tuning.restart_delay);
        self.events.push(GameEvent::PlaySound {
            sound: SoundKey::Crash,
            volume: SOUND_VOLUME,
        });
    }
}

impl Entity for Skier {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Bottom edge sits a quarter height above center so a crash leaves the
    /// skier inside the obstacle instead of perched on top of it.
    fn bounds(&self, images: &dyn ImageProvider) -> Option<Rect> {
        let size = self.image_size(images)?;
        let pos = self.position();
        Some(Rect::new(
            pos.x - size.width / 2.0,
            pos.y - size.height / 2.0,
            pos.x + size.width / 2.0,
            pos.y - size.height / 4.0,
        ))
    }

    fn is_visible(&self) -> bool {
        !self.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{JUMP_DURATION_SECS, SIM_DT, STARTING_SPEED};
    use crate::sim::assets::ImageAtlas;
    use proptest::prelude::*;

    fn skier() -> Skier {
        Skier::new(Position::ZERO, &Tuning::default())
    }

    fn facing(direction: Direction) -> Skier {
        let mut s = skier();
        s.set_direction(direction);
        s
    }

    fn tick(s: &mut Skier, obstacles: &ObstacleManager, images: &ImageAtlas) -> Option<ObstacleKind> {
        s.update(SIM_DT, obstacles, images)
    }

    /// Obstacle placed so the skier, starting at the origin and heading down,
    /// overlaps it after the first move
    fn obstacles_with(kind: ObstacleKind, images: &ImageAtlas) -> ObstacleManager {
        let mut manager = ObstacleManager::new();
        manager
            .place_at(kind, Position::new(0.0, 5.0), images)
            .expect("placement");
        manager
    }

    #[test]
    fn test_starts_skiing_down() {
        let s = skier();
        assert_eq!(s.state(), SkierState::Skiing);
        assert_eq!(s.direction(), Direction::Down);
        assert_eq!(s.speed(), STARTING_SPEED);
        assert_eq!(s.image(), ImageKey::SkierDown);
        assert!(!s.is_jumping());
    }

    #[test]
    fn test_moves_down_at_speed() {
        let images = ImageAtlas::with_default_sizes();
        let mut s = skier();
        tick(&mut s, &ObstacleManager::new(), &images);
        assert_eq!(s.position(), Position::new(0.0, 10.0));
    }

    #[test]
    fn test_moves_diagonally_left() {
        let images = ImageAtlas::with_default_sizes();
        let mut s = facing(Direction::LeftDown);
        tick(&mut s, &ObstacleManager::new(), &images);
        assert!((s.position().x + 7.0711).abs() < 1e-3);
        assert!((s.position().y - 7.0711).abs() < 1e-3);
    }

    #[test]
    fn test_sideways_facing_does_not_move_per_tick() {
        let images = ImageAtlas::with_default_sizes();
        for direction in [Direction::Left, Direction::Right] {
            let mut s = facing(direction);
            tick(&mut s, &ObstacleManager::new(), &images);
            assert_eq!(s.position(), Position::ZERO);
        }
    }

    #[test]
    fn test_turn_left_then_right_round_trips() {
        let mut s = skier();
        s.turn_left();
        assert_eq!(s.direction(), Direction::LeftDown);
        assert_eq!(s.image(), ImageKey::SkierLeftDown);
        s.turn_right();
        assert_eq!(s.direction(), Direction::Down);
    }

    #[test]
    fn test_turning_past_end_shuffles_sideways() {
        let mut s = facing(Direction::Left);
        s.turn_left();
        assert_eq!(s.direction(), Direction::Left);
        assert_eq!(s.position(), Position::new(-STARTING_SPEED, 0.0));

        let mut s = facing(Direction::Right);
        s.turn_right();
        assert_eq!(s.direction(), Direction::Right);
        assert_eq!(s.position(), Position::new(STARTING_SPEED, 0.0));
    }

    #[test]
    fn test_turn_up_only_when_sideways() {
        let mut s = facing(Direction::Left);
        s.turn_up();
        assert_eq!(s.position(), Position::new(0.0, -STARTING_SPEED));

        let mut s = facing(Direction::LeftDown);
        s.turn_up();
        assert_eq!(s.position(), Position::ZERO);
    }

    #[test]
    fn test_turn_down_resets_facing() {
        let mut s = facing(Direction::Right);
        s.turn_down();
        assert_eq!(s.direction(), Direction::Down);
    }

    #[test]
    fn test_tree_collision_crashes() {
        let images = ImageAtlas::with_default_sizes();
        let obstacles = obstacles_with(ObstacleKind::Tree, &images);
        let mut s = skier();

        let hit = tick(&mut s, &obstacles, &images);
        assert_eq!(hit, Some(ObstacleKind::Tree));
        assert_eq!(s.state(), SkierState::Crashed);
        assert_eq!(s.speed(), 0.0);
        assert_eq!(s.image(), ImageKey::SkierCrash);

        // Stays put while crashed
        let before = s.position();
        tick(&mut s, &obstacles, &images);
        assert_eq!(s.position(), before);
    }

    #[test]
    fn test_crashed_ignores_up_and_down() {
        let mut s = skier();
        s.crash();
        let before = s.position();
        s.turn_up();
        s.turn_down();
        assert_eq!(s.state(), SkierState::Crashed);
        assert_eq!(s.speed(), 0.0);
        assert_eq!(s.position(), before);
        assert_eq!(s.image(), ImageKey::SkierCrash);
    }

    #[test]
    fn test_recover_from_crash() {
        let mut s = skier();
        s.crash();
        s.turn_left();
        assert_eq!(s.state(), SkierState::Skiing);
        assert_eq!(s.speed(), STARTING_SPEED);
        assert_eq!(s.direction(), Direction::Left);
        assert_eq!(s.position(), Position::new(-STARTING_SPEED, 0.0));

        let mut s = skier();
        s.crash();
        s.turn_right();
        assert_eq!(s.state(), SkierState::Skiing);
        assert_eq!(s.direction(), Direction::Right);
        assert_eq!(s.image(), ImageKey::SkierRight);
        assert_eq!(s.position(), Position::new(STARTING_SPEED, 0.0));
    }

    #[test]
    fn test_ramp_collision_jumps() {
        let images = ImageAtlas::with_default_sizes();
        let obstacles = obstacles_with(ObstacleKind::JumpRamp, &images);
        let mut s = skier();

        let hit = tick(&mut s, &obstacles, &images);
        assert_eq!(hit, Some(ObstacleKind::JumpRamp));
        assert_eq!(s.state(), SkierState::Skiing);
        assert!(s.is_jumping());
        assert_eq!(s.direction(), Direction::Jump);
        assert_eq!(s.image(), ImageKey::SkierJump);
        assert!(s.drain_events().contains(&GameEvent::PlaySound {
            sound: SoundKey::Jump,
            volume: SOUND_VOLUME,
        }));
    }

    #[test]
    fn test_rocks_trigger_jump() {
        let images = ImageAtlas::with_default_sizes();
        for kind in [ObstacleKind::Rock1, ObstacleKind::Rock2] {
            let obstacles = obstacles_with(kind, &images);
            let mut s = skier();
            tick(&mut s, &obstacles, &images);
            assert!(s.is_jumping(), "{:?}", kind);
            assert!(s.is_skiing());
        }
    }

    #[test]
    fn test_cannot_jump_facing_sideways() {
        let mut s = facing(Direction::Left);
        assert!(!s.jump());
        assert!(!s.is_jumping());
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_jump_ends_after_duration() {
        let images = ImageAtlas::with_default_sizes();
        let empty = ObstacleManager::new();
        let mut s = facing(Direction::RightDown);
        assert!(s.jump());

        let mut elapsed = 0.0;
        while s.is_jumping() {
            tick(&mut s, &empty, &images);
            elapsed += SIM_DT;
            assert!(elapsed < JUMP_DURATION_SECS + 0.1, "jump never ended");
        }
        assert!(elapsed >= JUMP_DURATION_SECS - SIM_DT);
        assert_eq!(s.direction(), Direction::RightDown);
        assert_eq!(s.image(), ImageKey::SkierRightDown);
    }

    #[test]
    fn test_airborne_skier_keeps_moving() {
        let images = ImageAtlas::with_default_sizes();
        let mut s = skier();
        s.jump();
        tick(&mut s, &ObstacleManager::new(), &images);
        assert_eq!(s.position(), Position::new(0.0, STARTING_SPEED));
    }

    #[test]
    fn test_retrigger_keeps_original_deadline() {
        let images = ImageAtlas::with_default_sizes();
        let empty = ObstacleManager::new();
        let mut s = skier();
        s.jump();
        s.drain_events();

        for _ in 0..30 {
            tick(&mut s, &empty, &images);
        }
        let before = s.jump_time_remaining();
        assert!(!s.jump());
        let after = s.jump_time_remaining();
        assert!((before - after).abs() < 1e-5);
        assert!(s.drain_events().is_empty(), "re-trigger must not replay the sound");
    }

    #[test]
    fn test_landing_swap_cancelled_by_landing() {
        let images = ImageAtlas::with_default_sizes();
        let empty = ObstacleManager::new();
        let mut s = skier();
        s.jump();
        // Well past both the jump end and the landing swap
        for _ in 0..180 {
            tick(&mut s, &empty, &images);
        }
        assert!(!s.is_jumping());
        assert_eq!(s.image(), ImageKey::SkierDown);
    }

    #[test]
    fn test_landing_swap_shows_while_airborne() {
        let images = ImageAtlas::with_default_sizes();
        let empty = ObstacleManager::new();
        let tuning = Tuning {
            jump_duration: 1.0,
            landing_swap_delay: 0.5,
            ..Tuning::default()
        };
        let mut s = Skier::new(Position::ZERO, &tuning);
        s.jump();
        for _ in 0..45 {
            tick(&mut s, &empty, &images);
        }
        assert!(s.is_jumping());
        assert_eq!(s.image(), ImageKey::JumpRampBottom);
    }

    #[test]
    fn test_crash_mid_jump_lands() {
        let mut s = skier();
        s.jump();
        s.crash();
        assert!(!s.is_jumping());
        assert_eq!(s.direction(), Direction::Down);
        assert_eq!(s.state(), SkierState::Crashed);
    }

    #[test]
    fn test_death_is_terminal() {
        let mut s = skier();
        s.die();
        assert_eq!(s.state(), SkierState::Dead);
        assert_eq!(s.speed(), 0.0);
        assert!(!s.is_visible());

        s.turn_left();
        s.turn_right();
        s.increase_speed(5.0);
        assert!(!s.jump());
        assert_eq!(s.state(), SkierState::Dead);
        assert_eq!(s.speed(), 0.0);
    }

    #[test]
    fn test_death_plays_crash_and_requests_restart() {
        let images = ImageAtlas::with_default_sizes();
        let empty = ObstacleManager::new();
        let tuning = Tuning {
            restart_delay: 0.5,
            ..Tuning::default()
        };
        let mut s = Skier::new(Position::ZERO, &tuning);
        s.die();
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::PlaySound {
                sound: SoundKey::Crash,
                volume: SOUND_VOLUME,
            }]
        );

        let mut restarted = false;
        for _ in 0..40 {
            s.update(SIM_DT, &empty, &images);
            restarted |= s.drain_events().contains(&GameEvent::RestartRequested);
        }
        assert!(restarted);
    }

    #[test]
    fn test_increase_speed_emits_event() {
        let mut s = skier();
        s.increase_speed(1.0);
        assert_eq!(s.speed(), STARTING_SPEED + 1.0);
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::SpeedChanged {
                speed: STARTING_SPEED + 1.0
            }]
        );
    }

    #[test]
    fn test_missing_image_skips_collision() {
        let images = ImageAtlas::with_default_sizes();
        let obstacles = obstacles_with(ObstacleKind::Tree, &images);
        let mut partial = images.clone();
        partial.remove(ImageKey::SkierDown);

        let mut s = skier();
        assert_eq!(tick(&mut s, &obstacles, &partial), None);
        assert!(s.is_skiing());
        assert_eq!(s.position(), Position::new(0.0, 10.0));
    }

    #[test]
    fn test_bounds_bottom_is_quarter_above_center() {
        let images = ImageAtlas::with_default_sizes();
        let s = skier();
        let size = images.image_size(ImageKey::SkierDown).unwrap();
        let bounds = s.bounds(&images).unwrap();
        assert_eq!(bounds.bottom, -size.height / 4.0);
        assert_eq!(bounds.top, -size.height / 2.0);
    }

    proptest! {
        #[test]
        fn prop_diagonal_matches_straight_speed(speed in 0.0f32..100.0) {
            for direction in [Direction::LeftDown, Direction::RightDown] {
                let step = direction.displacement(speed);
                prop_assert!((step.length() - speed).abs() < 1e-3);
            }
        }
    }
}
