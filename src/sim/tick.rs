//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically, plus the
//! draw list the front end paints after each frame.

use super::assets::ImageProvider;
use super::entity::{Entity, RenderItem};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left arrow
    pub turn_left: bool,
    /// Right arrow
    pub turn_right: bool,
    /// Up arrow
    pub turn_up: bool,
    /// Down arrow
    pub turn_down: bool,
    /// Space
    pub jump: bool,
    /// Speed-up key
    pub speed_up: bool,
    /// Start a fresh session immediately
    pub restart: bool,
}


/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, images: &dyn ImageProvider, dt: f32) {
    if input.restart {
        log::info!("Restart requested by player");
        state.restart(images);
        return;
    }

    apply_input(state, input);
    state.time_ticks += 1;

    if let Some(kind) = state.skier.update(dt, &state.obstacles, images) {
        log::debug!("Skier hit {:?} at tick {}", kind, state.time_ticks);
    }

    // Obstacles and the rhino see where the skier ended up this tick
    state.follow_skier();
    state
        .obstacles
        .update(&state.camera, &state.previous_camera, images, &mut state.rng);
    state.rhino.update(dt, &mut state.skier, images);

    state.collect_events();
    if state.events.contains(&GameEvent::RestartRequested) {
        state.restart(images);
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let skier = &mut state.skier;
    if input.turn_left {
        skier.turn_left();
    }
    if input.turn_right {
        skier.turn_right();
    }
    if input.turn_up {
        skier.turn_up();
    }
    if input.turn_down {
        skier.turn_down();
    }
    if input.jump {
        skier.jump();
    }
    if input.speed_up {
        skier.increase_speed(SPEED_UP_STEP);
    }
}

/// Everything to draw this frame, back to front, in screen coordinates.
///
/// Obstacles come first sorted by height on the slope, then the skier, then
/// the rhino so it is drawn over whatever it runs across. Entities whose
/// image is unknown are left out.
pub fn render_list(state: &GameState, images: &dyn ImageProvider) -> Vec<RenderItem> {
    let camera = &state.camera;
    let mut items: Vec<RenderItem> = state
        .obstacles
        .draw_order()
        .into_iter()
        .filter_map(|o| o.render_item(camera, images))
        .collect();
    items.extend(state.skier.render_item(camera, images));
    items.extend(state.rhino.render_item(camera, images));
    items
}
