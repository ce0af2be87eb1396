use gloo::events::{EventListener, EventListenerOptions};
use gloo::utils::window;
use multigame_core::maze::{Cell, Maze, MazeConfig, StepOutcome};
use multigame_core::{Coord2, Direction};
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use super::*;
use crate::sound::{Sound, SoundBoard};
use crate::utils::game_rng;

const RULES: &[&str] = &[
    "Guide the green dot from the top-left corner to the exit.",
    "Use the arrow keys or the on-screen pad.",
    "Every new game carves a different maze.",
];

fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Step(Direction),
    Regenerate,
}

pub(crate) struct MazeView {
    maze: Maze,
    rng: SmallRng,
    sound: SoundBoard,
    _key_listener: EventListener,
}

impl MazeView {
    fn cell_class(&self, pos: Coord2) -> Classes {
        let base = match self.maze.cell(pos) {
            Some(Cell::Open) => "open",
            _ => "wall",
        };
        classes!(
            "cell",
            base,
            (pos == self.maze.exit()).then_some("exit"),
            (pos == self.maze.player()).then_some("player"),
        )
    }
}

impl Component for MazeView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut rng = game_rng(ctx.props().seed);
        let link = ctx.link().clone();
        let key_listener = EventListener::new_with_options(
            &window(),
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if let Some(direction) = key_direction(&event.key()) {
                    event.prevent_default();
                    link.send_message(Msg::Step(direction));
                }
            },
        );
        Self {
            maze: Maze::generate(MazeConfig::default(), &mut rng),
            rng,
            sound: SoundBoard::new(ctx.props().muted),
            _key_listener: key_listener,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.sound.set_muted(ctx.props().muted);
        false
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Step(direction) => match self.maze.step(direction) {
                Ok(StepOutcome::Moved) => {
                    self.sound.play(Sound::Move);
                    true
                }
                Ok(StepOutcome::Escaped) => {
                    self.sound.play(Sound::Win);
                    self.sound.play(Sound::Applause);
                    true
                }
                Err(err) => {
                    log::trace!("maze: step {:?} blocked: {}", direction, err);
                    false
                }
            },
            Msg::Regenerate => {
                self.maze.regenerate(&mut self.rng);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_regenerate = ctx.link().callback(|_: MouseEvent| Msg::Regenerate);
        let size = self.maze.size();
        let pad = |direction: Direction, label: &'static str| {
            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Step(direction));
            html! { <button {onclick}>{label}</button> }
        };

        html! {
            <div class="game maze">
                <Toolbar title="Green Maze" on_restart={cb_regenerate.clone()}/>
                <table class="grid">
                    {
                        for (0..size).map(|row| html! {
                            <tr>
                                { for (0..size).map(|col| html! { <td class={self.cell_class((row, col))}/> }) }
                            </tr>
                        })
                    }
                </table>
                <div class="pad">
                    { pad(Direction::Up, "▲") }
                    <div>
                        { pad(Direction::Left, "◀") }
                        { pad(Direction::Down, "▼") }
                        { pad(Direction::Right, "▶") }
                    </div>
                </div>
                if self.maze.escaped() {
                    <GameOverModal
                        outcome={Outcome::Won}
                        title="YOU ESCAPED!"
                        message="You found the way out."
                        on_restart={cb_regenerate}
                    />
                }
                <HelpPanel title="Maze" rules={RULES}/>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_arrow_keys_steer() {
        assert_eq!(key_direction("ArrowLeft"), Some(Direction::Left));
        assert_eq!(key_direction("a"), None);
    }
}
