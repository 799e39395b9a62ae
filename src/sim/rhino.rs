//! The rhino that chases the skier down the hill

use serde::{Deserialize, Serialize};

use super::assets::{ImageKey, ImageProvider, SoundKey};
use super::entity::{Entity, Sprite};
use super::geometry::{Position, direction_vector, intersect_rects};
use super::skier::Skier;
use super::state::GameEvent;
use super::timer::ScheduledTask;
use crate::consts::SOUND_VOLUME;
use crate::tuning::Tuning;

const RUN_FRAMES: [ImageKey; 2] = [ImageKey::RhinoRun1, ImageKey::RhinoRun2];
const EAT_FRAMES: [ImageKey; 4] = [
    ImageKey::RhinoEat1,
    ImageKey::RhinoEat2,
    ImageKey::RhinoEat3,
    ImageKey::RhinoEat4,
];
const CELEBRATE_FRAMES: [ImageKey; 2] = [ImageKey::RhinoCelebrate1, ImageKey::RhinoCelebrate2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RhinoState {
    /// Chasing the skier
    Running,
    /// Playing the eat sequence once
    Eating,
    /// Dancing until the session restarts
    Celebrating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rhino {
    sprite: Sprite,
    state: RhinoState,
    /// Index into the current state's frame list
    frame: usize,
    frame_timer: ScheduledTask,
    speed: f32,
    frame_length: f32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Rhino {
    pub fn new(position: Position, tuning: &Tuning) -> Self {
        let mut frame_timer = ScheduledTask::idle();
        frame_timer.schedule(tuning.animation_frame);
        Self {
            sprite: Sprite::new(position, RUN_FRAMES[0]),
            state: RhinoState::Running,
            frame: 0,
            frame_timer,
            speed: tuning.rhino_speed,
            frame_length: tuning.animation_frame,
            events: vec![GameEvent::PlaySound {
                sound: SoundKey::RhinoRun,
                volume: SOUND_VOLUME,
            }],
        }
    }

    #[inline]
    pub fn state(&self) -> RhinoState {
        self.state
    }

    pub fn set_position(&mut self, position: Position) {
        self.sprite.position = position;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Chase, check for the catch, animate.
    ///
    /// Returns true on the tick the skier gets caught.
    pub fn update(&mut self, dt: f32, skier: &mut Skier, images: &dyn ImageProvider) -> bool {
        let mut caught = false;
        if self.state == RhinoState::Running && !skier.is_dead() {
            self.chase(skier.position());
            if self.touches(skier, images) {
                self.catch(skier);
                caught = true;
            }
        }
        self.animate(dt);
        caught
    }

    /// Step toward `target` without overshooting it
    fn chase(&mut self, target: Position) {
        let remaining = target.distance(self.position());
        if remaining <= self.speed {
            self.sprite.position = target;
        } else {
            self.sprite.position += direction_vector(self.position(), target) * self.speed;
        }
    }

    fn touches(&self, skier: &Skier, images: &dyn ImageProvider) -> bool {
        let (Some(ours), Some(theirs)) = (self.bounds(images), skier.bounds(images)) else {
            return false;
        };
        intersect_rects(&ours, &theirs)
    }

    fn catch(&mut self, skier: &mut Skier) {
        log::info!("Rhino caught the skier at {:?}", skier.position());
        skier.die();
        self.state = RhinoState::Eating;
        self.set_frame(0);
        self.frame_timer.schedule(self.frame_length);
        self.events.push(GameEvent::SkierCaught);
        self.events.push(GameEvent::PlaySound {
            sound: SoundKey::RhinoEat,
            volume: SOUND_VOLUME,
        });
    }

    fn animate(&mut self, dt: f32) {
        if !self.frame_timer.advance(dt) {
            return;
        }
        self.frame_timer.schedule(self.frame_length);

        match self.state {
            RhinoState::Running => self.set_frame((self.frame + 1) % RUN_FRAMES.len()),
            RhinoState::Eating => {
                if self.frame + 1 < EAT_FRAMES.len() {
                    self.set_frame(self.frame + 1);
                } else {
                    self.state = RhinoState::Celebrating;
                    self.set_frame(0);
                    self.events.push(GameEvent::PlaySound {
                        sound: SoundKey::RhinoCelebrate,
                        volume: SOUND_VOLUME,
                    });
                }
            }
            RhinoState::Celebrating => {
                self.set_frame((self.frame + 1) % CELEBRATE_FRAMES.len())
            }
        }
    }

    fn set_frame(&mut self, frame: usize) {
        self.frame = frame;
        self.sprite.image = match self.state {
            RhinoState::Running => RUN_FRAMES[frame],
            RhinoState::Eating => EAT_FRAMES[frame],
            RhinoState::Celebrating => CELEBRATE_FRAMES[frame],
        };
    }
}

impl Entity for Rhino {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}
