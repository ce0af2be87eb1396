//! Pieces shared by the real-time games: input mapping, match phases and
//! simple 2D overlap tests.

use bitflags::bitflags;
use glam::Vec2;
use hashbrown::HashSet;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Controls: u8 {
        const UP    = 1;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
        const SHOOT = 1 << 4;
        const PASS  = 1 << 5;
    }
}

impl Controls {
    /// Unnormalized movement axis, `+y` pointing down the screen.
    pub fn axis(self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.contains(Self::UP) {
            axis.y -= 1.0;
        }
        if self.contains(Self::DOWN) {
            axis.y += 1.0;
        }
        if self.contains(Self::LEFT) {
            axis.x -= 1.0;
        }
        if self.contains(Self::RIGHT) {
            axis.x += 1.0;
        }
        axis
    }
}

/// Keys currently held, by `KeyboardEvent.key` name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    down: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single letters are folded to lowercase so that shift or caps lock do
    /// not drop a held key.
    fn normalize(key: &str) -> String {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_lowercase().collect(),
            _ => key.to_owned(),
        }
    }

    pub fn press(&mut self, key: &str) -> bool {
        self.down.insert(Self::normalize(key))
    }

    pub fn release(&mut self, key: &str) {
        self.down.remove(&Self::normalize(key));
    }

    pub fn clear(&mut self) {
        self.down.clear();
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.down.contains(&Self::normalize(key))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub shoot: Option<String>,
    pub pass: Option<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::arrows()
    }
}

impl KeyBindings {
    pub fn arrows() -> Self {
        Self {
            up: "ArrowUp".to_owned(),
            down: "ArrowDown".to_owned(),
            left: "ArrowLeft".to_owned(),
            right: "ArrowRight".to_owned(),
            shoot: Some("Enter".to_owned()),
            pass: Some("l".to_owned()),
        }
    }

    pub fn wasd() -> Self {
        Self {
            up: "w".to_owned(),
            down: "s".to_owned(),
            left: "a".to_owned(),
            right: "d".to_owned(),
            shoot: Some(" ".to_owned()),
            pass: Some("k".to_owned()),
        }
    }

    pub fn controls(&self, keys: &KeyState) -> Controls {
        let mut controls = Controls::empty();
        controls.set(Controls::UP, keys.is_down(&self.up));
        controls.set(Controls::DOWN, keys.is_down(&self.down));
        controls.set(Controls::LEFT, keys.is_down(&self.left));
        controls.set(Controls::RIGHT, keys.is_down(&self.right));
        if let Some(shoot) = &self.shoot {
            controls.set(Controls::SHOOT, keys.is_down(shoot));
        }
        if let Some(pass) = &self.pass {
            controls.set(Controls::PASS, keys.is_down(pass));
        }
        controls
    }

    /// Whether `key` drives any of these bindings; used to suppress page
    /// scrolling for arrow keys and space.
    pub fn binds(&self, key: &str) -> bool {
        let key = KeyState::normalize(key);
        [&self.up, &self.down, &self.left, &self.right]
            .into_iter()
            .chain(self.shoot.as_ref())
            .chain(self.pass.as_ref())
            .any(|bound| KeyState::normalize(bound) == key)
    }
}

pub const COUNTDOWN_FROM: u8 = 3;

/// Finite state of a timed match.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Menu,
    /// Seconds left; `0` is the "go" beat before play starts.
    Countdown(u8),
    Playing,
    Result,
}

impl Phase {
    pub const fn start_countdown() -> Self {
        Self::Countdown(COUNTDOWN_FROM)
    }

    /// Advances one countdown beat; other phases are unchanged.
    pub const fn tick_countdown(self) -> Self {
        match self {
            Self::Countdown(0) => Self::Playing,
            Self::Countdown(n) => Self::Countdown(n - 1),
            other => other,
        }
    }

    pub fn countdown_label(self) -> Option<String> {
        match self {
            Self::Countdown(0) => Some("GO!".to_owned()),
            Self::Countdown(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Axis-aligned box stored as centre and half extents.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub const fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Strict overlap, so boxes that only touch do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }
}

pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Playfield rectangle used for clamping entities each tick.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Sunny,
    Rainy,
    Snowy,
    Night,
    Dawn,
}

impl Weather {
    pub const ALL: [Weather; 5] = [Self::Sunny, Self::Rainy, Self::Snowy, Self::Night, Self::Dawn];
    /// Football is only played in daylight.
    pub const DAYLIGHT: [Weather; 3] = [Self::Sunny, Self::Rainy, Self::Snowy];

    pub fn pick<R: Rng + ?Sized>(options: &[Weather], rng: &mut R) -> Self {
        options.choose(rng).copied().unwrap_or_default()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Rainy => "Rain",
            Self::Snowy => "Snow",
            Self::Night => "Night",
            Self::Dawn => "Dawn",
        }
    }
}
