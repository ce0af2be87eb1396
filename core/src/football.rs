//! Five-a-side arcade football.
//!
//! One tick moves every player, then the ball, then applies the pitch rules.
//! Humans steer the team-mate closest to the ball; everyone else chases the
//! ball when it comes within range.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::arcade::{Controls, Rect, Weather};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Blue, defends the left goal.
    Home,
    /// Black, defends the right goal.
    Away,
}

impl Team {
    pub const fn other(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    /// Horizontal direction this team attacks in.
    pub const fn attack_dir(self) -> f32 {
        match self {
            Self::Home => 1.0,
            Self::Away => -1.0,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Away => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Away team is driven by the computer.
    #[default]
    OnePlayer,
    TwoPlayers,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub stadium: Vec2,
    pub pitch_size: Vec2,
    pub goal_size: f32,
    pub player_radius: f32,
    pub ball_radius: f32,
    pub friction: f32,
    pub player_speed: f32,
    pub kick_power: f32,
    pub pass_speed: f32,
    pub dribble_radius: f32,
    pub ai_range: f32,
    pub ai_speed_factor: f32,
    pub ai_shot_range: f32,
    pub owner_offset: f32,
    pub bounce: f32,
    /// Distance at which an opponent takes the ball off its carrier.
    pub tackle_radius: f32,
    /// Ticks after a change of possession during which the ball cannot be
    /// taken again.
    pub possession_lock: u32,
    pub clock_step: f32,
    pub period_length: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            stadium: Vec2::new(1000.0, 700.0),
            pitch_size: Vec2::new(850.0, 550.0),
            goal_size: 140.0,
            player_radius: 14.0,
            ball_radius: 7.0,
            friction: 0.985,
            player_speed: 3.2,
            kick_power: 16.0,
            pass_speed: 12.0,
            dribble_radius: 22.0,
            ai_range: 350.0,
            ai_speed_factor: 0.85,
            ai_shot_range: 250.0,
            owner_offset: 15.0,
            bounce: -0.8,
            tackle_radius: 20.0,
            possession_lock: 30,
            clock_step: 0.15,
            period_length: 1200.0,
        }
    }
}

impl MatchConfig {
    pub fn pitch(&self) -> Rect {
        let min = (self.stadium - self.pitch_size) * 0.5;
        Rect::new(min, min + self.pitch_size)
    }

    pub fn center(&self) -> Vec2 {
        self.stadium * 0.5
    }

    /// Vertical span of each goal mouth.
    pub fn goal_mouth(&self) -> (f32, f32) {
        let mid = self.stadium.y * 0.5;
        (mid - self.goal_size * 0.5, mid + self.goal_size * 0.5)
    }

    /// Centre of the goal `team` shoots at.
    pub fn target_goal(&self, team: Team) -> Vec2 {
        let pitch = self.pitch();
        let x = match team {
            Team::Home => pitch.max.x,
            Team::Away => pitch.min.x,
        };
        Vec2::new(x, self.stadium.y * 0.5)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u8,
    pub team: Team,
    pub pos: Vec2,
    pub goalkeeper: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Index into the player list.
    pub owner: Option<usize>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    fn add(&mut self, team: Team) {
        match team {
            Team::Home => self.home += 1,
            Team::Away => self.away += 1,
        }
    }

    pub fn leader(&self) -> Option<Team> {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Some(Team::Home),
            std::cmp::Ordering::Less => Some(Team::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    Playing,
    Halftime,
    Finished,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    Kick(Team),
    Pass(Team),
    Tackle(Team),
    Goal(Team),
    Halftime,
    FullTime,
}

pub type Events = SmallVec<[MatchEvent; 2]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    config: MatchConfig,
    mode: Mode,
    weather: Weather,
    players: Vec<Player>,
    ball: Ball,
    score: Score,
    clock: f32,
    period: u8,
    state: MatchState,
    controlled: [usize; 2],
    lock: u32,
}

impl Match {
    pub fn new(mode: Mode, config: MatchConfig, weather: Weather) -> Self {
        let mut game = Self {
            config,
            mode,
            weather,
            players: Vec::new(),
            ball: Ball::default(),
            score: Score::default(),
            clock: 0.0,
            period: 1,
            state: MatchState::Playing,
            controlled: [0, 5],
            lock: 0,
        };
        game.reset_positions();
        log::debug!("football: kick-off {:?} in {:?}", mode, weather);
        game
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Match clock as `mm:ss`.
    pub fn clock_label(&self) -> String {
        let secs = self.clock as u32;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn period(&self) -> u8 {
        self.period
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_controlled(&self, index: usize) -> bool {
        self.players
            .get(index)
            .is_some_and(|p| self.is_human(p.team) && self.controlled[p.team.slot()] == index)
    }

    pub fn is_human(&self, team: Team) -> bool {
        team == Team::Home || self.mode == Mode::TwoPlayers
    }

    /// Kick-off formation: a goalkeeper and four outfielders per side.
    pub fn reset_positions(&mut self) {
        let pitch = self.config.pitch();
        let mid_y = self.config.stadium.y * 0.5;
        let formation = [
            (40.0, mid_y, true),
            (200.0, pitch.min.y + 150.0, false),
            (200.0, pitch.min.y + 400.0, false),
            (400.0, mid_y - 100.0, false),
            (400.0, mid_y + 100.0, false),
        ];

        self.players.clear();
        for (team, base) in [(Team::Home, pitch.min.x), (Team::Away, pitch.max.x)] {
            for &(depth, y, goalkeeper) in &formation {
                let id = self.players.len() as u8 + 1;
                self.players.push(Player {
                    id,
                    team,
                    pos: Vec2::new(base + depth * team.attack_dir(), y),
                    goalkeeper,
                });
            }
        }
        self.ball = Ball {
            pos: self.config.center(),
            vel: Vec2::ZERO,
            owner: None,
        };
        self.controlled = [0, 5];
        self.lock = 0;
    }

    /// Starts the second half after the break.
    pub fn resume(&mut self) -> Result<()> {
        if self.state != MatchState::Halftime {
            return Err(GameError::WrongPhase);
        }
        self.period = 2;
        self.clock = 0.0;
        self.state = MatchState::Playing;
        self.reset_positions();
        log::debug!("football: second half");
        Ok(())
    }

    /// Advances one frame with each side's held controls. Away controls are
    /// ignored in one-player mode.
    pub fn tick(&mut self, home: Controls, away: Controls) -> Result<Events> {
        match self.state {
            MatchState::Playing => {}
            MatchState::Halftime => return Err(GameError::WrongPhase),
            MatchState::Finished => return Err(GameError::AlreadyEnded),
        }
        let mut events = Events::new();

        self.clock += self.config.clock_step;
        if self.clock >= self.config.period_length {
            self.clock = self.config.period_length;
            if self.period == 1 {
                self.state = MatchState::Halftime;
                self.reset_positions();
                events.push(MatchEvent::Halftime);
            } else {
                self.state = MatchState::Finished;
                events.push(MatchEvent::FullTime);
            }
            log::debug!("football: period {} over at {:?}", self.period, self.score);
            return Ok(events);
        }

        let controls = [home, away];
        self.move_players(controls);
        self.move_ball(controls, &mut events);
        self.apply_bounds(&mut events);
        self.auto_select();
        Ok(events)
    }

    fn move_players(&mut self, controls: [Controls; 2]) {
        let cfg = self.config;
        let pitch = cfg.pitch();
        let ball = self.ball.pos;

        for index in 0..self.players.len() {
            let team = self.players[index].team;
            let human = self.is_controlled(index);
            let player = &mut self.players[index];

            if human {
                player.pos += controls[team.slot()].axis() * cfg.player_speed;
            } else {
                let to_ball = ball - player.pos;
                let dist = to_ball.length();
                if dist < cfg.ai_range && dist > f32::EPSILON {
                    player.pos += to_ball / dist * cfg.player_speed * cfg.ai_speed_factor;
                }
            }
            player.pos = pitch.clamp(player.pos);
        }
    }

    fn move_ball(&mut self, controls: [Controls; 2], events: &mut Events) {
        let cfg = self.config;
        self.lock = self.lock.saturating_sub(1);

        let Some(owner) = self.ball.owner else {
            self.ball.pos += self.ball.vel;
            self.ball.vel *= cfg.friction;

            let ball = self.ball.pos;
            self.ball.owner = self
                .players
                .iter()
                .enumerate()
                .map(|(i, p)| (i, p.pos.distance(ball)))
                .filter(|&(_, d)| d < cfg.dribble_radius)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i);
            if self.ball.owner.is_some() {
                self.lock = cfg.possession_lock;
            }
            return;
        };

        self.carry(owner);
        if self.lock == 0
            && let Some(thief) = self.tackler(owner)
        {
            let team = self.players[thief].team;
            self.ball.owner = Some(thief);
            self.lock = cfg.possession_lock;
            log::trace!("football: {:?} won the ball", team);
            events.push(MatchEvent::Tackle(team));
            self.carry(thief);
            return;
        }

        let carrier = self.players[owner];
        let team = carrier.team;
        let held = controls[team.slot()];
        let human = self.is_human(team);
        let goal = cfg.target_goal(team);

        let shoot = if human {
            held.contains(Controls::SHOOT)
        } else {
            carrier.pos.distance(goal) < cfg.ai_shot_range
        };

        if shoot {
            let dir = (goal - carrier.pos).normalize_or_zero();
            self.ball.vel = dir * cfg.kick_power;
            self.ball.owner = None;
            events.push(MatchEvent::Kick(team));
        } else if human && held.contains(Controls::PASS) {
            self.ball.vel = Vec2::new(team.attack_dir() * cfg.pass_speed, 0.0);
            self.ball.owner = None;
            events.push(MatchEvent::Pass(team));
        }
    }

    /// Pins the ball just ahead of its carrier.
    fn carry(&mut self, owner: usize) {
        let carrier = self.players[owner];
        self.ball.pos = carrier.pos + Vec2::new(carrier.team.attack_dir() * self.config.owner_offset, 0.0);
        self.ball.vel = Vec2::ZERO;
    }

    fn tackler(&self, owner: usize) -> Option<usize> {
        let team = self.players[owner].team;
        let ball = self.ball.pos;
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.team != team)
            .map(|(i, p)| (i, p.pos.distance(ball)))
            .filter(|&(_, d)| d < self.config.tackle_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn apply_bounds(&mut self, events: &mut Events) {
        let cfg = self.config;
        let pitch = cfg.pitch();
        let (mouth_top, mouth_bottom) = cfg.goal_mouth();
        let pos = self.ball.pos;

        if pos.x < pitch.min.x || pos.x > pitch.max.x {
            if pos.y > mouth_top && pos.y < mouth_bottom {
                let scorer = if pos.x < cfg.center().x {
                    Team::Away
                } else {
                    Team::Home
                };
                self.score.add(scorer);
                log::debug!("football: goal for {:?}, now {:?}", scorer, self.score);
                events.push(MatchEvent::Goal(scorer));
                self.reset_positions();
                return;
            }
            self.ball.vel.x *= cfg.bounce;
            self.ball.pos.x = pos.x.clamp(pitch.min.x, pitch.max.x);
        }
        if pos.y < pitch.min.y || pos.y > pitch.max.y {
            self.ball.vel.y *= cfg.bounce;
            self.ball.pos.y = pos.y.clamp(pitch.min.y, pitch.max.y);
        }
    }

    fn auto_select(&mut self) {
        let ball = self.ball.pos;
        for team in [Team::Home, Team::Away] {
            if !self.is_human(team) {
                continue;
            }
            let nearest = self
                .players
                .iter()
                .enumerate()
                .filter(|(_, p)| p.team == team)
                .min_by(|a, b| {
                    a.1.pos
                        .distance_squared(ball)
                        .total_cmp(&b.1.pos.distance_squared(ball))
                })
                .map(|(i, _)| i);
            if let Some(index) = nearest {
                self.controlled[team.slot()] = index;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kickoff(mode: Mode) -> Match {
        Match::new(mode, MatchConfig::default(), Weather::Sunny)
    }

    fn idle() -> Controls {
        Controls::empty()
    }

    #[test]
    fn kickoff_formation() {
        let game = kickoff(Mode::OnePlayer);
        let players = game.players();

        assert_eq!(players.len(), 10);
        assert_eq!(players[0].pos, Vec2::new(115.0, 350.0));
        assert!(players[0].goalkeeper);
        assert_eq!(players[5].pos, Vec2::new(885.0, 350.0));
        assert_eq!(players[8].pos, Vec2::new(525.0, 250.0));
        assert_eq!(players[9].team, Team::Away);
        assert_eq!(game.ball().pos, Vec2::new(500.0, 350.0));
        assert_eq!(game.config().pitch(), Rect::new(Vec2::new(75.0, 75.0), Vec2::new(925.0, 625.0)));
    }

    #[test]
    fn human_moves_with_controls_and_stays_on_pitch() {
        let mut game = kickoff(Mode::OnePlayer);
        game.ball.pos = Vec2::new(120.0, 100.0);
        game.controlled = [0, 5];

        game.tick(Controls::UP | Controls::LEFT, idle()).unwrap();
        assert!(game.players()[0].pos.distance(Vec2::new(111.8, 346.8)) < 1e-3);

        for _ in 0..200 {
            game.tick(Controls::UP | Controls::LEFT, idle()).unwrap();
        }
        let pitch = game.config().pitch();
        assert!(game.players().iter().all(|p| pitch.contains(p.pos)));
    }

    #[test]
    fn ai_chases_ball_only_within_range() {
        let mut game = kickoff(Mode::OnePlayer);
        let near_before = game.players()[8].pos;
        let far_before = game.players()[5].pos;

        game.tick(idle(), idle()).unwrap();

        let ball = game.ball().pos;
        assert!(game.players()[8].pos.distance(ball) < near_before.distance(ball));
        assert!((near_before.distance(game.players()[8].pos) - 3.2 * 0.85).abs() < 1e-3);
        assert_eq!(game.players()[5].pos, far_before);
    }

    #[test]
    fn free_ball_slows_and_is_captured() {
        let mut game = kickoff(Mode::TwoPlayers);
        game.ball.pos = Vec2::new(300.0, 120.0);
        game.ball.vel = Vec2::new(10.0, 0.0);

        game.tick(idle(), idle()).unwrap();
        assert_eq!(game.ball().pos, Vec2::new(310.0, 120.0));
        assert!((game.ball().vel.x - 9.85).abs() < 1e-4);

        game.ball.pos = game.players()[1].pos + Vec2::new(5.0, 0.0);
        game.ball.vel = Vec2::ZERO;
        game.tick(idle(), idle()).unwrap();
        assert_eq!(game.ball().owner, Some(1));
    }

    #[test]
    fn shot_heads_for_goal_centre() {
        let mut game = kickoff(Mode::OnePlayer);
        game.players[3].pos = Vec2::new(700.0, 300.0);
        game.ball.owner = Some(3);
        game.controlled = [3, 5];

        let events = game.tick(Controls::SHOOT, idle()).unwrap();
        assert!(events.contains(&MatchEvent::Kick(Team::Home)));
        assert_eq!(game.ball().owner, None);
        let vel = game.ball().vel;
        assert!((vel.length() - 16.0).abs() < 1e-3);
        assert!(vel.x > 0.0 && vel.y > 0.0);
    }

    #[test]
    fn pass_goes_forward() {
        let mut game = kickoff(Mode::TwoPlayers);
        game.players[6].pos = Vec2::new(600.0, 200.0);
        game.ball.owner = Some(6);
        game.controlled = [0, 6];

        let events = game.tick(idle(), Controls::PASS).unwrap();
        assert_eq!(events.as_slice(), &[MatchEvent::Pass(Team::Away)]);
        assert_eq!(game.ball().vel, Vec2::new(-12.0, 0.0));
    }

    #[test]
    fn ball_in_mouth_scores_and_resets() {
        let mut game = kickoff(Mode::OnePlayer);
        game.ball.pos = Vec2::new(924.0, 350.0);
        game.ball.vel = Vec2::new(10.0, 0.0);

        let events = game.tick(idle(), idle()).unwrap();
        assert!(events.contains(&MatchEvent::Goal(Team::Home)));
        assert_eq!(game.score(), Score { home: 1, away: 0 });
        assert_eq!(game.ball().pos, game.config().center());
        assert_eq!(game.score().leader(), Some(Team::Home));
    }

    #[test]
    fn ball_wide_of_goal_bounces() {
        let mut game = kickoff(Mode::OnePlayer);
        game.ball.pos = Vec2::new(80.0, 100.0);
        game.ball.vel = Vec2::new(-10.0, 0.0);

        let events = game.tick(idle(), idle()).unwrap();
        assert!(events.is_empty());
        assert_eq!(game.ball().pos.x, 75.0);
        assert!(game.ball().vel.x > 0.0);
        assert_eq!(game.score(), Score::default());
    }

    #[test]
    fn tackle_steals_after_lock() {
        let mut game = kickoff(Mode::TwoPlayers);
        game.players[1].pos = Vec2::new(300.0, 300.0);
        game.players[6].pos = Vec2::new(320.0, 300.0);
        game.ball.owner = Some(1);
        game.lock = 5;
        game.controlled = [1, 6];

        game.tick(idle(), idle()).unwrap();
        assert_eq!(game.ball().owner, Some(1));

        game.lock = 0;
        let events = game.tick(idle(), idle()).unwrap();
        assert!(events.contains(&MatchEvent::Tackle(Team::Away)));
        assert_eq!(game.ball().owner, Some(6));
    }

    #[test]
    fn periods_run_to_full_time() {
        let mut game = kickoff(Mode::OnePlayer);
        game.clock = 1199.9;

        let events = game.tick(idle(), idle()).unwrap();
        assert_eq!(events.as_slice(), &[MatchEvent::Halftime]);
        assert_eq!(game.state(), MatchState::Halftime);
        assert_eq!(game.clock_label(), "20:00");
        assert_eq!(game.tick(idle(), idle()), Err(GameError::WrongPhase));

        game.resume().unwrap();
        assert_eq!(game.period(), 2);
        assert_eq!(game.clock(), 0.0);

        game.clock = 1199.9;
        let events = game.tick(idle(), idle()).unwrap();
        assert_eq!(events.as_slice(), &[MatchEvent::FullTime]);
        assert_eq!(game.tick(idle(), idle()), Err(GameError::AlreadyEnded));
        assert_eq!(game.resume(), Err(GameError::WrongPhase));
    }

    #[test]
    fn nearest_player_gets_control() {
        let mut game = kickoff(Mode::TwoPlayers);
        game.ball.pos = Vec2::new(275.0, 190.0);

        game.tick(idle(), idle()).unwrap();
        assert!(game.is_controlled(1));
        assert!(!game.is_controlled(0));
        assert!(game.is_controlled(8));
    }
}
