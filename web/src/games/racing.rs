use glam::Vec2;
use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Interval;
use multigame_core::arcade::{KeyBindings, KeyState, Phase, Weather};
use multigame_core::racing::{
    CARS, CarId, Garage, Race, RaceConfig, RaceResult, Scenery, SceneryKind, TickOutcome,
    car_model,
};
use rand::rngs::SmallRng;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;
use web_time::Instant;
use yew::prelude::*;

use super::arena::{context_2d, dash, draw_weather, key_listeners};
use super::*;
use crate::sound::{Sound, SoundBoard};
use crate::utils::{LocalOrDefault, game_rng};

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 600.0;
const COUNTDOWN_STEP_MS: u32 = 1000;

const RULES: &[&str] = &[
    "Hold up to accelerate and down to brake; steer once the car is moving.",
    "Dodge the traffic: one touch and the race is over.",
    "Survive three minutes to finish and earn 2500 coins.",
    "Crashing still pays a coin for every 200 m driven.",
    "Spend your coins on faster cars in the garage.",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    Menu,
    Garage,
    Keys,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Binding {
    Up,
    Down,
    Left,
    Right,
}

impl Binding {
    const ALL: [Binding; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    const fn label(self) -> &'static str {
        match self {
            Self::Up => "Accelerate",
            Self::Down => "Brake",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    fn slot(self, bindings: &mut KeyBindings) -> &mut String {
        match self {
            Self::Up => &mut bindings.up,
            Self::Down => &mut bindings.down,
            Self::Left => &mut bindings.left,
            Self::Right => &mut bindings.right,
        }
    }

    fn key(self, bindings: &KeyBindings) -> &str {
        match self {
            Self::Up => &bindings.up,
            Self::Down => &bindings.down,
            Self::Left => &bindings.left,
            Self::Right => &bindings.right,
        }
    }
}

fn key_label(key: &str) -> String {
    match key {
        " " => "Space".to_owned(),
        "ArrowUp" => "↑".to_owned(),
        "ArrowDown" => "↓".to_owned(),
        "ArrowLeft" => "←".to_owned(),
        "ArrowRight" => "→".to_owned(),
        other => other.to_uppercase(),
    }
}

/// Remaining race time as `m:ss`.
fn time_label(ms: f64) -> String {
    let secs = (ms / 1000.0).ceil() as u32;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn draw_car(ctx: &CanvasRenderingContext2d, pos: Vec2, color: &str) {
    let (x, y) = (f64::from(pos.x), f64::from(pos.y));
    ctx.set_fill_style_str(color);
    ctx.fill_rect(x - 15.0, y - 25.0, 30.0, 50.0);
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
    ctx.fill_rect(x - 12.0, y - 15.0, 24.0, 15.0);
    ctx.set_fill_style_str("#000");
    for (dx, dy) in [(-18.0, -20.0), (13.0, -20.0), (-18.0, 10.0), (13.0, 10.0)] {
        ctx.fill_rect(x + dx, y + dy, 5.0, 10.0);
    }
}

fn draw_scenery(ctx: &CanvasRenderingContext2d, object: &Scenery) {
    let size = object.kind.size().as_dvec2();
    let corner = object.pos.as_dvec2() - size / 2.0;
    ctx.set_fill_style_str(object.kind.color());
    ctx.fill_rect(corner.x, corner.y, size.x, size.y);
    match object.kind {
        SceneryKind::Cow | SceneryKind::Horse => {
            // Head.
            ctx.fill_rect(corner.x + size.x - 2.0, corner.y - 4.0, 6.0, 6.0);
        }
        _ => {
            ctx.set_stroke_style_str("rgba(0, 0, 0, 0.35)");
            ctx.set_line_width(2.0);
            ctx.stroke_rect(corner.x, corner.y, size.x, size.y);
        }
    }
}

fn draw_race(ctx: &CanvasRenderingContext2d, race: &Race) -> Result<(), JsValue> {
    let grass = match race.weather() {
        Weather::Snowy => "#e2e8f0",
        _ => "#15803d",
    };
    ctx.set_fill_style_str(grass);
    ctx.fill_rect(0.0, 0.0, WIDTH, HEIGHT);
    for object in race.scenery() {
        draw_scenery(ctx, object);
    }
    ctx.set_fill_style_str("#262626");
    ctx.fill_rect(80.0, 0.0, 240.0, HEIGHT);
    for mark in race.skids() {
        ctx.set_fill_style_str(&format!("rgba(10, 10, 10, {:.2})", mark.opacity));
        ctx.fill_rect(f64::from(mark.pos.x) - 2.5, f64::from(mark.pos.y) - 5.0, 5.0, 10.0);
    }

    ctx.set_stroke_style_str("#facc15");
    ctx.set_line_width(4.0);
    ctx.set_line_dash(&dash(&[40.0, 40.0]))?;
    ctx.set_line_dash_offset(-f64::from(race.offset()));
    ctx.begin_path();
    ctx.move_to(200.0, 0.0);
    ctx.line_to(200.0, HEIGHT);
    ctx.stroke();
    ctx.set_line_dash(&dash(&[]))?;

    draw_car(ctx, race.player(), race.car().color);
    for enemy in race.enemies() {
        let color = car_model(enemy.model).map_or("#f8fafc", |model| model.color);
        draw_car(ctx, enemy.pos, color);
    }
    draw_weather(ctx, race.weather(), WIDTH, HEIGHT, race.offset());
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Open(Screen),
    Start,
    Countdown,
    Frame,
    Key(String, bool),
    Rebind(Binding),
    Buy(CarId),
    Select(CarId),
}

pub(crate) struct RacingView {
    garage: Garage,
    bindings: KeyBindings,
    screen: Screen,
    phase: Phase,
    race: Option<Race>,
    result: Option<RaceResult>,
    keys: KeyState,
    /// Control waiting for its new key.
    rebinding: Option<Binding>,
    started: Option<Instant>,
    /// Dropping either handle stops the countdown or the frame loop.
    countdown: Option<Interval>,
    frame: Option<AnimationFrame>,
    canvas: NodeRef,
    rng: SmallRng,
    sound: SoundBoard,
    key_listeners: [EventListener; 2],
}

impl RacingView {
    fn listen(ctx: &Context<Self>, bindings: &KeyBindings) -> [EventListener; 2] {
        key_listeners(
            ctx.link().callback(|(key, pressed)| Msg::Key(key, pressed)),
            vec![bindings.clone()],
        )
    }

    fn request_frame(&mut self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        self.frame = Some(request_animation_frame(move |_| {
            link.send_message(Msg::Frame)
        }));
    }

    fn stop(&mut self) {
        self.countdown = None;
        self.frame = None;
        self.started = None;
    }

    fn finish(&mut self, result: RaceResult) {
        self.stop();
        self.garage.collect(&result);
        self.garage.local_save();
        self.result = Some(result);
        self.phase = Phase::Result;
        log::info!(
            "racing: {} after {} km, +{} coins",
            if result.finished { "finished" } else { "crashed" },
            result.distance,
            result.reward
        );
        self.sound.play(if result.finished {
            Sound::Win
        } else {
            Sound::Capture
        });
    }

    fn view_menu(&self, ctx: &Context<Self>) -> Html {
        let car = self.garage.car();
        html! {
            <section class="menu">
                <div class="car-preview" style={format!("background: {}", car.color)}/>
                <p>{car.name}</p>
                <button class="start" onclick={ctx.link().callback(|_: MouseEvent| Msg::Start)}>{"RACE"}</button>
                <button onclick={ctx.link().callback(|_: MouseEvent| Msg::Open(Screen::Garage))}>{"GARAGE"}</button>
                <button onclick={ctx.link().callback(|_: MouseEvent| Msg::Open(Screen::Keys))}>{"CONTROLS"}</button>
            </section>
        }
    }

    fn view_garage(&self, ctx: &Context<Self>) -> Html {
        let coins = self.garage.coins();
        html! {
            <section class="garage">
                <header>
                    <button onclick={ctx.link().callback(|_: MouseEvent| Msg::Open(Screen::Menu))}>{"← Back"}</button>
                    <h3>{"Garage"}</h3>
                </header>
                <ul class="cars">
                    {
                        for CARS.iter().map(|car| {
                            let id = car.id;
                            let action = if self.garage.selected() == id {
                                html! { <button disabled={true}>{"SELECTED"}</button> }
                            } else if self.garage.owns(id) {
                                let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Select(id));
                                html! { <button {onclick}>{"USE"}</button> }
                            } else {
                                let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Buy(id));
                                html! {
                                    <button disabled={coins < car.price} {onclick}>{format!("BUY {}", car.price)}</button>
                                }
                            };
                            html! {
                                <li>
                                    <span class="swatch" style={format!("background: {}", car.color)}/>
                                    <strong>{car.name}</strong>
                                    <small>{format!("Top speed {:.0} · Accel {:.2}", car.max_speed, car.accel)}</small>
                                    { action }
                                </li>
                            }
                        })
                    }
                </ul>
            </section>
        }
    }

    fn view_keys(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="keys">
                <header>
                    <button onclick={ctx.link().callback(|_: MouseEvent| Msg::Open(Screen::Menu))}>{"← Back"}</button>
                    <h3>{"Controls"}</h3>
                </header>
                <ul>
                    {
                        for Binding::ALL.into_iter().map(|binding| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Rebind(binding));
                            let label = if self.rebinding == Some(binding) {
                                "Press a key...".to_owned()
                            } else {
                                key_label(binding.key(&self.bindings))
                            };
                            html! {
                                <li>
                                    <span>{binding.label()}</span>
                                    <button class={classes!((self.rebinding == Some(binding)).then_some("waiting"))} {onclick}>{label}</button>
                                </li>
                            }
                        })
                    }
                </ul>
                <p class="hint">{"Click a control, then press the key to use. Escape cancels."}</p>
            </section>
        }
    }

    fn view_race(&self, ctx: &Context<Self>, race: &Race) -> Html {
        html! {
            <section class="track">
                <div class="hud">
                    <span>{format!("⏱ {}", time_label(race.remaining_ms()))}</span>
                    <span>{format!("{:.0} km/h", race.speed() * 10.0)}</span>
                    <span>{race.weather().label()}</span>
                </div>
                <canvas ref={self.canvas.clone()} width="400" height="600"/>
                if let Some(label) = self.phase.countdown_label() {
                    <div class="countdown">{label}</div>
                }
                if let Some(result) = self.result {
                    <GameOverModal
                        outcome={if result.finished { Outcome::Won } else { Outcome::Lost }}
                        title={if result.finished { "FINISHED!" } else { "CRASHED!" }}
                        message={format!("{} km driven · +{} coins", result.distance, result.reward)}
                        restart_label="RACE AGAIN"
                        on_restart={ctx.link().callback(|_: MouseEvent| Msg::Start)}
                    />
                }
            </section>
        }
    }
}

impl Component for RacingView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let bindings = KeyBindings::local_or_default();
        Self {
            garage: Garage::local_or_default(),
            key_listeners: Self::listen(ctx, &bindings),
            bindings,
            screen: Screen::Menu,
            phase: Phase::Menu,
            race: None,
            result: None,
            keys: KeyState::new(),
            rebinding: None,
            started: None,
            countdown: None,
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
            Open(screen) => {
                self.stop();
                self.race = None;
                self.result = None;
                self.rebinding = None;
                self.phase = Phase::Menu;
                self.screen = screen;
                true
            }
            Start => {
                if matches!(self.phase, Phase::Countdown(_) | Phase::Playing) {
                    return false;
                }
                let weather = Weather::pick(&Weather::ALL, &mut self.rng);
                log::debug!("racing: {} in {:?}", self.garage.car().name, weather);
                self.race = Some(Race::new(*self.garage.car(), RaceConfig::default(), weather));
                self.result = None;
                self.keys.clear();
                self.phase = Phase::start_countdown();
                self.sound.play(Sound::Dice);
                let link = ctx.link().clone();
                self.countdown = Some(Interval::new(COUNTDOWN_STEP_MS, move || {
                    link.send_message(Countdown)
                }));
                true
            }
            Countdown => {
                self.phase = self.phase.tick_countdown();
                match self.phase {
                    Phase::Countdown(0) => self.sound.play(Sound::Move),
                    Phase::Countdown(_) => self.sound.play(Sound::Dice),
                    Phase::Playing => {
                        self.countdown = None;
                        self.started = Some(Instant::now());
                        self.request_frame(ctx);
                    }
                    Phase::Menu | Phase::Result => self.countdown = None,
                }
                true
            }
            Frame => {
                self.frame = None;
                if !self.phase.is_playing() {
                    return false;
                }
                let (Some(race), Some(started)) = (self.race.as_mut(), self.started) else {
                    return false;
                };
                let controls = self.bindings.controls(&self.keys);
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                match race.tick(controls, elapsed_ms, &mut self.rng) {
                    Ok(TickOutcome::Running) => self.request_frame(ctx),
                    Ok(TickOutcome::Finished(result) | TickOutcome::Crashed(result)) => {
                        self.finish(result)
                    }
                    Err(err) => log::warn!("racing: tick failed: {}", err),
                }
                true
            }
            Key(key, pressed) => {
                if let Some(binding) = self.rebinding
                    && pressed
                {
                    self.rebinding = None;
                    if key != "Escape" {
                        *binding.slot(&mut self.bindings) = key;
                        self.bindings.local_save();
                        self.key_listeners = Self::listen(ctx, &self.bindings);
                    }
                    return true;
                }
                if pressed {
                    self.keys.press(&key);
                } else {
                    self.keys.release(&key);
                }
                false
            }
            Rebind(binding) => {
                self.rebinding = Some(binding);
                true
            }
            Buy(id) => match self.garage.buy(id) {
                Ok(()) => {
                    self.garage.local_save();
                    self.sound.play(Sound::Dice);
                    true
                }
                Err(err) => {
                    log::debug!("racing: cannot buy car {}: {}", id, err);
                    false
                }
            },
            Select(id) => match self.garage.select(id) {
                Ok(()) => {
                    self.garage.local_save();
                    self.sound.play(Sound::Move);
                    true
                }
                Err(err) => {
                    log::debug!("racing: cannot select car {}: {}", id, err);
                    false
                }
            },
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_menu = ctx.link().callback(|_: MouseEvent| Msg::Open(Screen::Menu));
        let body = match (&self.race, self.screen) {
            (Some(race), _) => self.view_race(ctx, race),
            (None, Screen::Menu) => self.view_menu(ctx),
            (None, Screen::Garage) => self.view_garage(ctx),
            (None, Screen::Keys) => self.view_keys(ctx),
        };

        html! {
            <div class="game racing">
                <Toolbar title="Car Racing" on_restart={cb_menu}>
                    <p class="balance">{format!("🪙 {}", self.garage.coins())}</p>
                </Toolbar>
                { body }
                <HelpPanel title="Car Racing" rules={RULES} video="S3Uu49vY560"/>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        let Some(race) = &self.race else {
            return;
        };
        let Some(canvas) = context_2d(&self.canvas) else {
            return;
        };
        if let Err(err) = draw_race(&canvas, race) {
            log::warn!("racing: draw failed: {:?}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_labelled_for_humans() {
        assert_eq!(key_label(" "), "Space");
        assert_eq!(key_label("ArrowLeft"), "←");
        assert_eq!(key_label("w"), "W");
    }

    #[test]
    fn remaining_time_rounds_up_to_whole_seconds() {
        assert_eq!(time_label(180_000.0), "3:00");
        assert_eq!(time_label(59_001.0), "1:00");
        assert_eq!(time_label(0.0), "0:00");
    }

    #[test]
    fn rebinding_writes_the_matching_slot() {
        let mut bindings = KeyBindings::arrows();
        *Binding::Left.slot(&mut bindings) = "a".to_owned();
        assert_eq!(bindings.left, "a");
        assert_eq!(Binding::Left.key(&bindings), "a");
        assert_eq!(Binding::Right.key(&bindings), "ArrowRight");
    }
}
