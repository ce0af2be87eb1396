//! Top-down endless road race with a coin garage.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arcade::{Aabb, Controls, Weather};
use crate::*;

pub type CarId = u8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarKind {
    Compact,
    Van,
    Classic,
    Sport,
    Formula,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CarModel {
    pub id: CarId,
    pub name: &'static str,
    pub color: &'static str,
    pub price: u32,
    pub max_speed: f32,
    pub accel: f32,
    pub kind: CarKind,
}

const fn car(
    id: CarId,
    name: &'static str,
    color: &'static str,
    price: u32,
    max_speed: f32,
    accel: f32,
    kind: CarKind,
) -> CarModel {
    CarModel {
        id,
        name,
        color,
        price,
        max_speed,
        accel,
        kind,
    }
}

pub const CARS: [CarModel; 10] = [
    car(0, "Yellow Beetle", "#fbbf24", 0, 10.0, 0.12, CarKind::Compact),
    car(1, "Red Van", "#dc2626", 300, 9.0, 0.08, CarKind::Van),
    car(2, "Blue Chevette", "#2563eb", 800, 13.0, 0.15, CarKind::Classic),
    car(3, "Black Golf", "#171717", 2000, 16.0, 0.20, CarKind::Compact),
    car(4, "Blue Turbo", "#0ea5e9", 5000, 20.0, 0.28, CarKind::Sport),
    car(5, "Red F1", "#ff0000", 15000, 30.0, 0.55, CarKind::Formula),
    car(6, "Sport Silver", "#94a3b8", 7500, 22.0, 0.32, CarKind::Sport),
    car(7, "Hyper Green", "#22c55e", 10000, 24.0, 0.38, CarKind::Sport),
    car(8, "Classic White", "#f8fafc", 1200, 12.0, 0.14, CarKind::Classic),
    car(9, "Concept Orange", "#f97316", 25000, 32.0, 0.65, CarKind::Formula),
];

pub fn car_model(id: CarId) -> Result<&'static CarModel> {
    CARS.get(usize::from(id)).ok_or(GameError::UnknownItem)
}

/// Persistent coin balance and car collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Garage {
    coins: u32,
    owned: Vec<CarId>,
    selected: CarId,
}

impl Default for Garage {
    fn default() -> Self {
        Self {
            coins: 0,
            owned: vec![0],
            selected: 0,
        }
    }
}

impl Garage {
    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn owns(&self, id: CarId) -> bool {
        self.owned.contains(&id)
    }

    pub fn selected(&self) -> CarId {
        self.selected
    }

    /// The selected model, falling back to the starter car if the stored id
    /// is stale.
    pub fn car(&self) -> &'static CarModel {
        car_model(self.selected).unwrap_or(&CARS[0])
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Buys and selects a car.
    pub fn buy(&mut self, id: CarId) -> Result<()> {
        let model = car_model(id)?;
        if self.owns(id) {
            return Err(GameError::AlreadyOwned);
        }
        if self.coins < model.price {
            return Err(GameError::InsufficientFunds);
        }
        self.coins -= model.price;
        self.owned.push(id);
        self.selected = id;
        log::debug!("racing: bought {}", model.name);
        Ok(())
    }

    pub fn select(&mut self, id: CarId) -> Result<()> {
        car_model(id)?;
        if !self.owns(id) {
            return Err(GameError::NotOwned);
        }
        self.selected = id;
        Ok(())
    }

    pub fn collect(&mut self, result: &RaceResult) {
        self.add_coins(result.reward);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub duration_ms: f64,
    pub road_min_x: f32,
    pub road_max_x: f32,
    pub start: Vec2,
    pub steer: f32,
    pub steer_min_speed: f32,
    pub friction: f32,
    pub brake_factor: f32,
    pub spawn_chance: f64,
    pub max_enemies: usize,
    pub spawn_x: (f32, f32),
    pub spawn_y: f32,
    pub enemy_speed: (f32, f32),
    pub despawn_below: f32,
    pub despawn_above: f32,
    /// Half extents of every car's hit box.
    pub car_half: Vec2,
    pub finish_reward: u32,
    /// Per-tick chance of a roadside object appearing while moving.
    pub scenery_chance: f64,
    /// Horizontal bands on the grass either side of the road.
    pub scenery_left_x: (f32, f32),
    pub scenery_right_x: (f32, f32),
    /// Braking above this speed leaves skid marks.
    pub skid_speed: f32,
    pub skid_fade: f32,
    pub max_skids: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            duration_ms: 180_000.0,
            road_min_x: 90.0,
            road_max_x: 310.0,
            start: Vec2::new(200.0, 500.0),
            steer: 6.0,
            steer_min_speed: 0.5,
            friction: 0.1,
            brake_factor: 4.0,
            spawn_chance: 0.02,
            max_enemies: 5,
            spawn_x: (100.0, 300.0),
            spawn_y: -100.0,
            enemy_speed: (5.0, 15.0),
            despawn_below: 700.0,
            despawn_above: -500.0,
            car_half: Vec2::new(14.0, 25.0),
            finish_reward: 2500,
            scenery_chance: 0.03,
            scenery_left_x: (10.0, 50.0),
            scenery_right_x: (350.0, 390.0),
            skid_speed: 3.0,
            skid_fade: 0.01,
            max_skids: 120,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub speed: f32,
    pub model: CarId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneryKind {
    Building,
    House,
    GasStation,
    Diner,
    Apartment,
    Cow,
    Horse,
}

impl SceneryKind {
    pub const ALL: [SceneryKind; 7] = [
        Self::Building,
        Self::House,
        Self::GasStation,
        Self::Diner,
        Self::Apartment,
        Self::Cow,
        Self::Horse,
    ];

    /// Footprint as seen from above.
    pub const fn size(self) -> Vec2 {
        match self {
            Self::Building => Vec2::new(50.0, 70.0),
            Self::House => Vec2::new(45.0, 40.0),
            Self::GasStation => Vec2::new(55.0, 45.0),
            Self::Diner => Vec2::new(50.0, 35.0),
            Self::Apartment => Vec2::new(50.0, 90.0),
            Self::Cow => Vec2::new(18.0, 12.0),
            Self::Horse => Vec2::new(16.0, 14.0),
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Building => "#64748b",
            Self::House => "#b45309",
            Self::GasStation => "#dc2626",
            Self::Diner => "#f472b6",
            Self::Apartment => "#94a3b8",
            Self::Cow => "#f8fafc",
            Self::Horse => "#78350f",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    /// Centre of the object.
    pub pos: Vec2,
    pub kind: SceneryKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkidMark {
    pub pos: Vec2,
    pub opacity: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResult {
    pub finished: bool,
    pub distance: u32,
    pub reward: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    Finished(RaceResult),
    Crashed(RaceResult),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Race {
    config: RaceConfig,
    car: CarModel,
    weather: Weather,
    player: Vec2,
    speed: f32,
    offset: f32,
    elapsed_ms: f64,
    enemies: Vec<Enemy>,
    scenery: Vec<Scenery>,
    skids: Vec<SkidMark>,
    result: Option<RaceResult>,
}

impl Race {
    pub fn new(car: CarModel, config: RaceConfig, weather: Weather) -> Self {
        Self {
            config,
            car,
            weather,
            player: config.start,
            speed: 0.0,
            offset: 0.0,
            elapsed_ms: 0.0,
            enemies: Vec::new(),
            scenery: Vec::new(),
            skids: Vec::new(),
            result: None,
        }
    }

    pub fn car(&self) -> &CarModel {
        &self.car
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn player(&self) -> Vec2 {
        self.player
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self) -> f64 {
        (self.config.duration_ms - self.elapsed_ms).max(0.0)
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn scenery(&self) -> &[Scenery] {
        &self.scenery
    }

    pub fn skids(&self) -> &[SkidMark] {
        &self.skids
    }

    pub fn result(&self) -> Option<RaceResult> {
        self.result
    }

    /// Advances one frame. `elapsed_ms` is wall time since the start.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        controls: Controls,
        elapsed_ms: f64,
        rng: &mut R,
    ) -> Result<TickOutcome> {
        if self.result.is_some() {
            return Err(GameError::AlreadyEnded);
        }
        let cfg = self.config;
        self.elapsed_ms = elapsed_ms;

        if self.speed > cfg.steer_min_speed {
            if controls.contains(Controls::LEFT) {
                self.player.x -= cfg.steer;
            }
            if controls.contains(Controls::RIGHT) {
                self.player.x += cfg.steer;
            }
        }

        let braking = controls.contains(Controls::DOWN) && !controls.contains(Controls::UP);
        let skidding = braking && self.speed > cfg.skid_speed;

        self.speed = if controls.contains(Controls::UP) {
            (self.speed + self.car.accel).min(self.car.max_speed)
        } else if controls.contains(Controls::DOWN) {
            (self.speed - self.car.accel * cfg.brake_factor).max(0.0)
        } else {
            (self.speed - cfg.friction).max(0.0)
        };

        self.player.x = self.player.x.clamp(cfg.road_min_x, cfg.road_max_x);
        self.offset += self.speed;

        if elapsed_ms >= cfg.duration_ms {
            return Ok(TickOutcome::Finished(self.finish(true)));
        }

        self.scroll_roadside(skidding, rng);

        if self.enemies.len() < cfg.max_enemies && rng.random_bool(cfg.spawn_chance) {
            let enemy = Enemy {
                pos: Vec2::new(rng.random_range(cfg.spawn_x.0..cfg.spawn_x.1), cfg.spawn_y),
                speed: rng.random_range(cfg.enemy_speed.0..cfg.enemy_speed.1),
                model: rng.random_range(0..CARS.len() as CarId),
            };
            log::trace!("racing: spawned enemy at x={:.0}", enemy.pos.x);
            self.enemies.push(enemy);
        }

        let player_box = Aabb::new(self.player, cfg.car_half);
        let mut crashed = false;
        for enemy in &mut self.enemies {
            enemy.pos.y += self.speed - enemy.speed;
            if player_box.overlaps(&Aabb::new(enemy.pos, cfg.car_half)) {
                crashed = true;
            }
        }
        if crashed {
            return Ok(TickOutcome::Crashed(self.finish(false)));
        }
        self.enemies
            .retain(|e| e.pos.y <= cfg.despawn_below && e.pos.y >= cfg.despawn_above);

        Ok(TickOutcome::Running)
    }

    /// Moves scenery and skid marks with the road, spawning new ones.
    fn scroll_roadside<R: Rng + ?Sized>(&mut self, skidding: bool, rng: &mut R) {
        let cfg = self.config;
        let speed = self.speed;

        for object in &mut self.scenery {
            object.pos.y += speed;
        }
        self.scenery.retain(|o| o.pos.y <= cfg.despawn_below);
        if speed > 0.0 && rng.random_bool(cfg.scenery_chance) {
            let (lo, hi) = if rng.random_bool(0.5) {
                cfg.scenery_left_x
            } else {
                cfg.scenery_right_x
            };
            let kind = SceneryKind::ALL[rng.random_range(0..SceneryKind::ALL.len())];
            self.scenery.push(Scenery {
                pos: Vec2::new(rng.random_range(lo..hi), cfg.spawn_y),
                kind,
            });
        }

        for mark in &mut self.skids {
            mark.pos.y += speed;
            mark.opacity -= cfg.skid_fade;
        }
        self.skids
            .retain(|m| m.opacity > 0.0 && m.pos.y <= cfg.despawn_below);
        if skidding {
            // Rear wheels.
            let rear = self.player + Vec2::new(0.0, cfg.car_half.y - 10.0);
            for dx in [-cfg.car_half.x - 1.5, cfg.car_half.x + 1.5] {
                self.skids.push(SkidMark {
                    pos: rear + Vec2::new(dx, 0.0),
                    opacity: 0.5,
                });
            }
            let excess = self.skids.len().saturating_sub(cfg.max_skids);
            self.skids.drain(..excess);
        }
    }

    fn finish(&mut self, finished: bool) -> RaceResult {
        let distance = (self.offset / 100.0).floor() as u32;
        let reward = if finished {
            self.config.finish_reward
        } else {
            distance / 2
        };
        let result = RaceResult {
            finished,
            distance,
            reward,
        };
        log::debug!("racing: race over {:?}", result);
        self.result = Some(result);
        result
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn quiet() -> RaceConfig {
        RaceConfig {
            spawn_chance: 0.0,
            scenery_chance: 0.0,
            ..RaceConfig::default()
        }
    }

    fn race() -> Race {
        Race::new(CARS[0], quiet(), Weather::Sunny)
    }

    #[test]
    fn garage_buys_and_selects() {
        let mut garage = Garage::default();
        assert_eq!(garage.buy(1), Err(GameError::InsufficientFunds));
        assert_eq!(garage.select(1), Err(GameError::NotOwned));

        garage.add_coins(1000);
        garage.buy(1).unwrap();
        assert_eq!(garage.coins(), 700);
        assert_eq!(garage.selected(), 1);
        assert_eq!(garage.buy(1), Err(GameError::AlreadyOwned));
        assert_eq!(garage.buy(10), Err(GameError::UnknownItem));

        garage.select(0).unwrap();
        assert_eq!(garage.car().name, "Yellow Beetle");
    }

    #[test]
    fn garage_loads_from_partial_json() {
        let garage: Garage = serde_json::from_str(r#"{"coins":42}"#).unwrap();

        assert_eq!(garage.coins(), 42);
        assert!(garage.owns(0));
    }

    #[test]
    fn steering_needs_speed() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut race = race();

        race.tick(Controls::LEFT, 16.0, &mut rng).unwrap();
        assert_eq!(race.player().x, 200.0);

        for _ in 0..10 {
            race.tick(Controls::UP, 16.0, &mut rng).unwrap();
        }
        race.tick(Controls::UP | Controls::LEFT, 16.0, &mut rng).unwrap();
        assert_eq!(race.player().x, 194.0);
    }

    #[test]
    fn speed_caps_and_decays() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut race = race();

        for _ in 0..200 {
            race.tick(Controls::UP, 0.0, &mut rng).unwrap();
        }
        assert_eq!(race.speed(), CARS[0].max_speed);

        race.tick(Controls::DOWN, 0.0, &mut rng).unwrap();
        assert!((race.speed() - (10.0 - 0.48)).abs() < 1e-4);

        race.tick(Controls::empty(), 0.0, &mut rng).unwrap();
        assert!((race.speed() - (10.0 - 0.48 - 0.1)).abs() < 1e-4);
    }

    #[test]
    fn player_stays_on_road() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut race = race();

        for _ in 0..100 {
            race.tick(Controls::UP | Controls::RIGHT, 0.0, &mut rng).unwrap();
        }
        assert_eq!(race.player().x, 310.0);
    }

    #[test]
    fn finishing_pays_full_reward() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut race = race();

        let outcome = race.tick(Controls::UP, 180_000.0, &mut rng).unwrap();
        let TickOutcome::Finished(result) = outcome else {
            panic!("expected finish, got {outcome:?}");
        };
        assert_eq!(result.reward, 2500);
        assert_eq!(race.tick(Controls::UP, 180_016.0, &mut rng), Err(GameError::AlreadyEnded));

        let mut garage = Garage::default();
        garage.collect(&result);
        assert_eq!(garage.coins(), 2500);
    }

    #[test]
    fn collision_crashes_with_distance_reward() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut race = race();
        race.offset = 1234.0;
        race.enemies.push(Enemy {
            pos: Vec2::new(210.0, 470.0),
            speed: 0.0,
            model: 3,
        });

        let outcome = race.tick(Controls::empty(), 16.0, &mut rng).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Crashed(RaceResult {
                finished: false,
                distance: 12,
                reward: 6,
            })
        );
    }

    #[test]
    fn scenery_lines_the_road_and_scrolls_away() {
        let mut rng = SmallRng::seed_from_u64(3);
        let config = RaceConfig {
            spawn_chance: 0.0,
            scenery_chance: 1.0,
            ..RaceConfig::default()
        };
        let mut race = Race::new(CARS[0], config, Weather::Sunny);

        race.tick(Controls::empty(), 0.0, &mut rng).unwrap();
        assert!(race.scenery().is_empty(), "nothing appears while parked");

        for _ in 0..50 {
            race.tick(Controls::UP, 0.0, &mut rng).unwrap();
        }
        assert!(!race.scenery().is_empty());
        assert!(race.scenery().iter().all(|o| {
            let x = o.pos.x;
            (10.0..50.0).contains(&x) || (350.0..390.0).contains(&x)
        }));

        let count = race.scenery().len();
        race.scenery[0].pos.y = 699.0;
        race.tick(Controls::UP, 0.0, &mut rng).unwrap();
        // One object scrolled off the bottom, one new one appeared on top.
        assert_eq!(race.scenery().len(), count);
        assert!(race.scenery().iter().all(|o| o.pos.y <= 700.0));
    }

    #[test]
    fn hard_braking_leaves_fading_skid_marks() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut race = race();

        race.tick(Controls::DOWN, 0.0, &mut rng).unwrap();
        assert!(race.skids().is_empty(), "no marks from a standstill");

        for _ in 0..60 {
            race.tick(Controls::UP, 0.0, &mut rng).unwrap();
        }
        race.tick(Controls::DOWN, 0.0, &mut rng).unwrap();
        assert_eq!(race.skids().len(), 2);
        assert_eq!(race.skids()[0].opacity, 0.5);

        race.tick(Controls::empty(), 0.0, &mut rng).unwrap();
        assert!(race.skids().iter().all(|m| m.opacity < 0.5));

        for _ in 0..60 {
            race.tick(Controls::empty(), 0.0, &mut rng).unwrap();
        }
        assert!(race.skids().is_empty());
    }

    #[test]
    fn skid_marks_are_capped() {
        let mut rng = SmallRng::seed_from_u64(0);
        let config = RaceConfig {
            skid_fade: 0.001,
            ..quiet()
        };
        let mut race = Race::new(CARS[0], config, Weather::Sunny);
        // Far from the bottom edge so no mark scrolls away.
        race.player.y = -10_000.0;

        for _ in 0..100 {
            race.speed = 10.0;
            race.tick(Controls::DOWN, 0.0, &mut rng).unwrap();
        }
        assert_eq!(race.skids().len(), 120);
    }

    #[test]
    fn enemies_spawn_up_to_cap_and_despawn() {
        let mut rng = SmallRng::seed_from_u64(8);
        let config = RaceConfig {
            spawn_chance: 1.0,
            ..RaceConfig::default()
        };
        let mut race = Race::new(CARS[0], config, Weather::Night);
        // Keep spawned cars far ahead so nothing collides.
        race.player.y = 10_000.0;

        for _ in 0..20 {
            race.tick(Controls::empty(), 0.0, &mut rng).unwrap();
            assert!(race.enemies().len() <= 5);
        }
        assert!(race.enemies().iter().all(|e| (100.0..300.0).contains(&e.pos.x)));

        race.enemies[0].pos.y = -499.0;
        race.enemies[0].speed = 50.0;
        race.tick(Controls::empty(), 0.0, &mut rng).unwrap();
        assert!(race.enemies().iter().all(|e| e.pos.y >= -500.0));
    }
}
