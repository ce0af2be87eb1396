use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use multigame_core::arcade::{Controls, KeyBindings, KeyState, Weather};
use multigame_core::football::{Match, MatchConfig, MatchEvent, MatchState, Mode, Team};
use rand::rngs::SmallRng;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;
use yew::prelude::*;

use super::arena::{circle, context_2d, draw_weather, key_listeners};
use super::*;
use crate::sound::{Sound, SoundBoard};
use crate::utils::game_rng;

const RULES: &[&str] = &[
    "Player 1 (blue): WASD to run, Space to shoot, K to pass.",
    "Player 2 (black): arrows to run, Enter to shoot, L to pass.",
    "Alone, you may also steer blue with the arrow keys.",
    "You always control the team-mate closest to the ball.",
    "Two halves; the team with more goals at full time wins.",
];

const fn team_name(team: Team) -> &'static str {
    match team {
        Team::Home => "BLUE",
        Team::Away => "BLACK",
    }
}

const fn team_color(team: Team, goalkeeper: bool) -> &'static str {
    match (team, goalkeeper) {
        (Team::Home, false) => "#2563eb",
        (Team::Home, true) => "#38bdf8",
        (Team::Away, false) => "#111827",
        (Team::Away, true) => "#6b7280",
    }
}

/// Result for the human side: the blue team alone, or whoever leads with two
/// players.
fn final_outcome(game: &Match) -> (Outcome, String) {
    let leader = game.score().leader();
    match (game.mode(), leader) {
        (_, None) => (Outcome::Lost, "DRAW!".to_owned()),
        (Mode::OnePlayer, Some(Team::Home)) => (Outcome::Won, "YOU WIN!".to_owned()),
        (Mode::OnePlayer, Some(Team::Away)) => (Outcome::Lost, "YOU LOSE!".to_owned()),
        (Mode::TwoPlayers, Some(team)) => (Outcome::Won, format!("{} WINS!", team_name(team))),
    }
}

fn draw_match(ctx: &CanvasRenderingContext2d, game: &Match) -> Result<(), JsValue> {
    let cfg = game.config();
    let (width, height) = (f64::from(cfg.stadium.x), f64::from(cfg.stadium.y));
    let pitch = cfg.pitch();
    let (min, size) = (pitch.min.as_dvec2(), pitch.size().as_dvec2());

    ctx.set_fill_style_str("#1e293b");
    ctx.fill_rect(0.0, 0.0, width, height);
    let stripe = size.x / 10.0;
    for i in 0..10 {
        ctx.set_fill_style_str(if i % 2 == 0 { "#15803d" } else { "#16a34a" });
        ctx.fill_rect(min.x + stripe * f64::from(i), min.y, stripe, size.y);
    }

    ctx.set_stroke_style_str("rgba(255, 255, 255, 0.85)");
    ctx.set_line_width(3.0);
    ctx.stroke_rect(min.x, min.y, size.x, size.y);
    ctx.begin_path();
    ctx.move_to(width / 2.0, min.y);
    ctx.line_to(width / 2.0, min.y + size.y);
    ctx.stroke();
    circle(ctx, cfg.center(), 70.0)?;
    ctx.stroke();
    let (box_w, box_h) = (110.0, 260.0);
    ctx.stroke_rect(min.x, (height - box_h) / 2.0, box_w, box_h);
    ctx.stroke_rect(min.x + size.x - box_w, (height - box_h) / 2.0, box_w, box_h);

    let (top, bottom) = cfg.goal_mouth();
    let (top, mouth) = (f64::from(top), f64::from(bottom - top));
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.35)");
    ctx.fill_rect(min.x - 20.0, top, 20.0, mouth);
    ctx.fill_rect(min.x + size.x, top, 20.0, mouth);

    for (index, player) in game.players().iter().enumerate() {
        circle(ctx, player.pos, cfg.player_radius)?;
        ctx.set_fill_style_str(team_color(player.team, player.goalkeeper));
        ctx.fill();
        if game.is_controlled(index) {
            circle(ctx, player.pos, cfg.player_radius + 4.0)?;
            ctx.set_stroke_style_str("#facc15");
            ctx.set_line_width(2.0);
            ctx.stroke();
        }
    }

    circle(ctx, game.ball().pos, cfg.ball_radius)?;
    ctx.set_fill_style_str("#ffffff");
    ctx.fill();
    ctx.set_stroke_style_str("#000000");
    ctx.set_line_width(1.0);
    ctx.stroke();

    draw_weather(ctx, game.weather(), width, height, game.clock() * 20.0);
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Start(Mode),
    Frame,
    Key(String, bool),
    Resume,
    Quit,
}

pub(crate) struct FootballView {
    game: Option<Match>,
    keys: KeyState,
    home_keys: KeyBindings,
    away_keys: KeyBindings,
    /// Dropping it stops the frame loop.
    frame: Option<AnimationFrame>,
    canvas: NodeRef,
    rng: SmallRng,
    sound: SoundBoard,
    _key_listeners: [EventListener; 2],
}

impl FootballView {
    fn request_frame(&mut self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        self.frame = Some(request_animation_frame(move |_| {
            link.send_message(Msg::Frame)
        }));
    }

    /// Held controls for each side. A lone player may use either key set.
    fn controls(&self, mode: Mode) -> (Controls, Controls) {
        let home = self.home_keys.controls(&self.keys);
        let away = self.away_keys.controls(&self.keys);
        match mode {
            Mode::OnePlayer => (home | away, Controls::empty()),
            Mode::TwoPlayers => (home, away),
        }
    }

    fn on_event(&mut self, event: MatchEvent, game: &Match) {
        match event {
            MatchEvent::Kick(_) | MatchEvent::Pass(_) => self.sound.play(Sound::Move),
            MatchEvent::Tackle(_) => self.sound.play(Sound::Capture),
            MatchEvent::Goal(team) => {
                log::info!("football: goal for {}, {:?}", team_name(team), game.score());
                self.sound.play(Sound::Whistle);
                self.sound.play(Sound::Applause);
            }
            MatchEvent::Halftime => {
                self.sound.stop_crowd();
                self.sound.play(Sound::Whistle);
            }
            MatchEvent::FullTime => {
                self.sound.stop_crowd();
                self.sound.play(Sound::Whistle);
                self.sound.play(match final_outcome(game).0 {
                    Outcome::Won => Sound::Win,
                    Outcome::Lost => Sound::Loss,
                });
            }
        }
    }

    fn view_menu(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="menu">
                <button onclick={ctx.link().callback(|_: MouseEvent| Msg::Start(Mode::OnePlayer))}>{"1 PLAYER"}</button>
                <button onclick={ctx.link().callback(|_: MouseEvent| Msg::Start(Mode::TwoPlayers))}>{"2 PLAYERS"}</button>
            </section>
        }
    }

    fn view_match(&self, ctx: &Context<Self>, game: &Match) -> Html {
        let score = game.score();
        let mode = game.mode();
        let half = if game.period() == 1 { "1st half" } else { "2nd half" };
        let result = (game.state() == MatchState::Finished).then(|| final_outcome(game));

        html! {
            <section class="pitch">
                <div class="scoreboard">
                    <span class="home">{format!("{} {}", team_name(Team::Home), score.home)}</span>
                    <span class="clock">{game.clock_label()}</span>
                    <span class="away">{format!("{} {}", score.away, team_name(Team::Away))}</span>
                    <small>{format!("{half} · {}", game.weather().label())}</small>
                </div>
                <canvas ref={self.canvas.clone()} width="1000" height="700"/>
                if game.state() == MatchState::Halftime {
                    <div class="halftime">
                        <h3>{"HALF TIME"}</h3>
                        <p>{format!("{} - {}", score.home, score.away)}</p>
                        <button onclick={ctx.link().callback(|_: MouseEvent| Msg::Resume)}>{"START 2ND HALF"}</button>
                    </div>
                }
                if let Some((outcome, title)) = result {
                    <GameOverModal
                        {outcome}
                        {title}
                        message={format!("Final score {} - {}", score.home, score.away)}
                        restart_label="PLAY AGAIN"
                        on_restart={ctx.link().callback(move |_: MouseEvent| Msg::Start(mode))}
                    />
                }
            </section>
        }
    }
}

impl Component for FootballView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let home_keys = KeyBindings::wasd();
        let away_keys = KeyBindings::arrows();
        Self {
            game: None,
            keys: KeyState::new(),
            _key_listeners: key_listeners(
                ctx.link().callback(|(key, pressed)| Msg::Key(key, pressed)),
                vec![home_keys.clone(), away_keys.clone()],
            ),
            home_keys,
            away_keys,
            frame: None,
            canvas: NodeRef::default(),
            rng: game_rng(ctx.props().seed),
            sound: SoundBoard::new(ctx.props().muted),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.sound.set_muted(ctx.props().muted);
        false
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Start(mode) => {
                let weather = Weather::pick(&Weather::DAYLIGHT, &mut self.rng);
                log::debug!("football: {:?} kick-off in {:?}", mode, weather);
                self.game = Some(Match::new(mode, MatchConfig::default(), weather));
                self.keys.clear();
                self.sound.play(Sound::Whistle);
                self.sound.start_crowd();
                self.request_frame(ctx);
                true
            }
            Frame => {
                self.frame = None;
                let Some(mode) = self.game.as_ref().map(Match::mode) else {
                    return false;
                };
                let (home, away) = self.controls(mode);
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                let events = match game.tick(home, away) {
                    Ok(events) => events,
                    Err(err) => {
                        log::debug!("football: tick skipped: {}", err);
                        return false;
                    }
                };
                let playing = game.state() == MatchState::Playing;
                if !events.is_empty() {
                    let snapshot = game.clone();
                    for event in events {
                        self.on_event(event, &snapshot);
                    }
                }
                if playing {
                    self.request_frame(ctx);
                }
                true
            }
            Key(key, pressed) => {
                if pressed {
                    self.keys.press(&key);
                } else {
                    self.keys.release(&key);
                }
                false
            }
            Resume => {
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                match game.resume() {
                    Ok(()) => {
                        self.keys.clear();
                        self.sound.play(Sound::Whistle);
                        self.sound.start_crowd();
                        self.request_frame(ctx);
                        true
                    }
                    Err(err) => {
                        log::debug!("football: resume refused: {}", err);
                        false
                    }
                }
            }
            Quit => {
                self.frame = None;
                self.game = None;
                self.sound.stop_crowd();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_quit = ctx.link().callback(|_: MouseEvent| Msg::Quit);
        let body = match &self.game {
            Some(game) => self.view_match(ctx, game),
            None => self.view_menu(ctx),
        };

        html! {
            <div class="game football">
                <Toolbar title="Football" on_restart={cb_quit}/>
                { body }
                <HelpPanel title="Football" rules={RULES} video="S3Uu49vY560"/>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        let Some(game) = &self.game else {
            return;
        };
        let Some(canvas) = context_2d(&self.canvas) else {
            return;
        };
        if let Err(err) = draw_match(&canvas, game) {
            log::warn!("football: draw failed: {:?}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kick_off(mode: Mode) -> Match {
        Match::new(mode, MatchConfig::default(), Weather::Sunny)
    }

    #[test]
    fn a_goalless_match_is_a_draw() {
        let (outcome, title) = final_outcome(&kick_off(Mode::OnePlayer));
        assert_eq!(outcome, Outcome::Lost);
        assert_eq!(title, "DRAW!");
    }

    #[test]
    fn goalkeepers_wear_a_lighter_kit() {
        assert_ne!(team_color(Team::Home, true), team_color(Team::Home, false));
        assert_ne!(team_color(Team::Away, true), team_color(Team::Away, false));
    }
}
