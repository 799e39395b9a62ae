//! Sprite and sound identifiers plus the image-size lookup the simulation needs
//!
//! The simulation never touches pixels. All it needs from an image is its size,
//! so the collaborator that owns decoded images only has to answer
//! `ImageProvider::image_size`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Every sprite the game can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageKey {
    SkierCrash,
    SkierLeft,
    SkierLeftDown,
    SkierDown,
    SkierRightDown,
    SkierRight,
    SkierJump,
    Tree,
    TreeCluster,
    Rock1,
    Rock2,
    JumpRamp,
    JumpRampBottom,
    RhinoRun1,
    RhinoRun2,
    RhinoEat1,
    RhinoEat2,
    RhinoEat3,
    RhinoEat4,
    RhinoCelebrate1,
    RhinoCelebrate2,
}

impl ImageKey {
    pub const ALL: [ImageKey; 21] = [
        ImageKey::SkierCrash,
        ImageKey::SkierLeft,
        ImageKey::SkierLeftDown,
        ImageKey::SkierDown,
        ImageKey::SkierRightDown,
        ImageKey::SkierRight,
        ImageKey::SkierJump,
        ImageKey::Tree,
        ImageKey::TreeCluster,
        ImageKey::Rock1,
        ImageKey::Rock2,
        ImageKey::JumpRamp,
        ImageKey::JumpRampBottom,
        ImageKey::RhinoRun1,
        ImageKey::RhinoRun2,
        ImageKey::RhinoEat1,
        ImageKey::RhinoEat2,
        ImageKey::RhinoEat3,
        ImageKey::RhinoEat4,
        ImageKey::RhinoCelebrate1,
        ImageKey::RhinoCelebrate2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKey::SkierCrash => "skierCrash",
            ImageKey::SkierLeft => "skierLeft",
            ImageKey::SkierLeftDown => "skierLeftDown",
            ImageKey::SkierDown => "skierDown",
            ImageKey::SkierRightDown => "skierRightDown",
            ImageKey::SkierRight => "skierRight",
            ImageKey::SkierJump => "skierJump",
            ImageKey::Tree => "tree",
            ImageKey::TreeCluster => "treeCluster",
            ImageKey::Rock1 => "rock1",
            ImageKey::Rock2 => "rock2",
            ImageKey::JumpRamp => "jumpRamp",
            ImageKey::JumpRampBottom => "jumpRampBottom",
            ImageKey::RhinoRun1 => "rhinoRun1",
            ImageKey::RhinoRun2 => "rhinoRun2",
            ImageKey::RhinoEat1 => "rhinoEat1",
            ImageKey::RhinoEat2 => "rhinoEat2",
            ImageKey::RhinoEat3 => "rhinoEat3",
            ImageKey::RhinoEat4 => "rhinoEat4",
            ImageKey::RhinoCelebrate1 => "rhinoCelebrate1",
            ImageKey::RhinoCelebrate2 => "rhinoCelebrate2",
        }
    }

    /// Relative URL of the PNG served next to the wasm bundle
    pub fn url(&self) -> &'static str {
        match self {
            ImageKey::SkierCrash => "img/skier_crash.png",
            ImageKey::SkierLeft => "img/skier_left.png",
            ImageKey::SkierLeftDown => "img/skier_left_down.png",
            ImageKey::SkierDown => "img/skier_down.png",
            ImageKey::SkierRightDown => "img/skier_right_down.png",
            ImageKey::SkierRight => "img/skier_right.png",
            ImageKey::SkierJump => "img/skier_jump_3.png",
            ImageKey::Tree => "img/tree_1.png",
            ImageKey::TreeCluster => "img/tree_cluster.png",
            ImageKey::Rock1 => "img/rock_1.png",
            ImageKey::Rock2 => "img/rock_2.png",
            ImageKey::JumpRamp => "img/jump_ramp.png",
            ImageKey::JumpRampBottom => "img/skier_jump_2.png",
            ImageKey::RhinoRun1 => "img/rhino_run_left.png",
            ImageKey::RhinoRun2 => "img/rhino_run_left_2.png",
            ImageKey::RhinoEat1 => "img/rhino_eat_1.png",
            ImageKey::RhinoEat2 => "img/rhino_eat_2.png",
            ImageKey::RhinoEat3 => "img/rhino_eat_3.png",
            ImageKey::RhinoEat4 => "img/rhino_eat_4.png",
            ImageKey::RhinoCelebrate1 => "img/rhino_celebrate_1.png",
            ImageKey::RhinoCelebrate2 => "img/rhino_celebrate_2.png",
        }
    }
}

/// Every sound the simulation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKey {
    /// Background music, looped for the whole session
    Run,
    Crash,
    Jump,
    RhinoRun,
    RhinoEat,
    RhinoCelebrate,
}

impl SoundKey {
    pub fn url(&self) -> &'static str {
        match self {
            SoundKey::Run => "img/bg.mp3",
            SoundKey::Crash => "img/crash.mp3",
            SoundKey::Jump => "img/jump.mp3",
            SoundKey::RhinoRun => "img/rhinoRun.mp3",
            SoundKey::RhinoEat => "img/rhinoEat.mp3",
            SoundKey::RhinoCelebrate => "img/rhinoCelebrate.mp3",
        }
    }
}

/// Pixel dimensions of a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

impl ImageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Anything that can report image dimensions synchronously.
///
/// `None` means the image is not (yet) available; callers treat the entity as
/// undrawable for the current frame.
pub trait ImageProvider {
    fn image_size(&self, key: ImageKey) -> Option<ImageSize>;
}

/// In-memory size table
#[derive(Debug, Clone, Default)]
pub struct ImageAtlas {
    sizes: HashMap<ImageKey, ImageSize>,
}

impl ImageAtlas {
    /// Empty atlas: every lookup misses until sizes are inserted
    pub fn new() -> Self {
        Self::default()
    }

    /// Atlas pre-filled with the dimensions of the bundled sprites
    pub fn with_default_sizes() -> Self {
        let mut atlas = Self::new();
        for key in ImageKey::ALL {
            atlas.insert(key, default_size(key));
        }
        atlas
    }

    pub fn insert(&mut self, key: ImageKey, size: ImageSize) {
        self.sizes.insert(key, size);
    }

    pub fn remove(&mut self, key: ImageKey) -> Option<ImageSize> {
        self.sizes.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl ImageProvider for ImageAtlas {
    fn image_size(&self, key: ImageKey) -> Option<ImageSize> {
        self.sizes.get(&key).copied()
    }
}

/// Dimensions of the shipped PNGs
pub fn default_size(key: ImageKey) -> ImageSize {
    match key {
        ImageKey::SkierCrash => ImageSize::new(38.0, 31.0),
        ImageKey::SkierLeft | ImageKey::SkierRight => ImageSize::new(34.0, 31.0),
        ImageKey::SkierLeftDown | ImageKey::SkierRightDown => ImageSize::new(30.0, 34.0),
        ImageKey::SkierDown => ImageSize::new(20.0, 34.0),
        ImageKey::SkierJump | ImageKey::JumpRampBottom => ImageSize::new(32.0, 34.0),
        ImageKey::Tree => ImageSize::new(28.0, 48.0),
        ImageKey::TreeCluster => ImageSize::new(56.0, 64.0),
        ImageKey::Rock1 => ImageSize::new(23.0, 15.0),
        ImageKey::Rock2 => ImageSize::new(32.0, 20.0),
        ImageKey::JumpRamp => ImageSize::new(48.0, 24.0),
        ImageKey::RhinoRun1 | ImageKey::RhinoRun2 => ImageSize::new(58.0, 38.0),
        ImageKey::RhinoEat1
        | ImageKey::RhinoEat2
        | ImageKey::RhinoEat3
        | ImageKey::RhinoEat4 => ImageSize::new(62.0, 44.0),
        ImageKey::RhinoCelebrate1 | ImageKey::RhinoCelebrate2 => ImageSize::new(58.0, 52.0),
    }
}
