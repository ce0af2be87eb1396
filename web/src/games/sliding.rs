use multigame_core::sliding::{Goal, HOLE, SlideOutcome, SlidingPuzzle};
use rand::rngs::SmallRng;
use yew::prelude::*;

use super::*;
use crate::sound::{Sound, SoundBoard};
use crate::utils::game_rng;

const SIZE: u8 = 3;
const SCRAMBLE_MOVES: usize = 150;

const RULES: &[&str] = &[
    "Click a tile next to the empty space to slide it.",
    "Order the tiles from 1 to 8 with the gap in the bottom-right corner.",
    "The shuffle button deals a new, always solvable, layout.",
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Slide(usize),
    Shuffle,
}

pub(crate) struct SlidingView {
    puzzle: SlidingPuzzle,
    moves: u32,
    rng: SmallRng,
    sound: SoundBoard,
}

impl SlidingView {
    fn shuffle(&mut self) {
        self.puzzle = SlidingPuzzle::new(SIZE, Goal::HoleLast);
        self.puzzle.scramble(&mut self.rng, SCRAMBLE_MOVES);
        self.moves = 0;
    }
}

impl Component for SlidingView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut view = Self {
            puzzle: SlidingPuzzle::new(SIZE, Goal::HoleLast),
            moves: 0,
            rng: game_rng(ctx.props().seed),
            sound: SoundBoard::new(ctx.props().muted),
        };
        view.shuffle();
        view
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.sound.set_muted(ctx.props().muted);
        false
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Slide(index) => match self.puzzle.slide(index) {
                Ok(outcome) => {
                    self.moves += 1;
                    self.sound.play(match outcome {
                        SlideOutcome::Moved => Sound::Move,
                        SlideOutcome::Solved => Sound::Win,
                    });
                    true
                }
                Err(err) => {
                    log::debug!("sliding: tile {} ignored: {}", index, err);
                    false
                }
            },
            Msg::Shuffle => {
                self.shuffle();
                self.sound.play(Sound::Dice);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_shuffle = ctx.link().callback(|_: MouseEvent| Msg::Shuffle);
        let style = format!("grid-template-columns: repeat({SIZE}, 1fr)");

        html! {
            <div class="game sliding">
                <Toolbar title="Classic 8-Puzzle" on_restart={cb_shuffle}>
                    <p class="status">{format!("Moves: {}", self.moves)}</p>
                </Toolbar>
                <div class="tiles" {style}>
                    {
                        for self.puzzle.tiles().iter().enumerate().map(|(index, &tile)| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Slide(index));
                            let class = classes!(
                                "tile",
                                (tile == HOLE).then_some("hole"),
                                self.puzzle.is_adjacent_to_hole(index).then_some("movable"),
                            );
                            html! {
                                <button {class} {onclick}>
                                    if tile != HOLE { {tile.to_string()} }
                                </button>
                            }
                        })
                    }
                </div>
                if self.puzzle.is_solved() {
                    <p class="solved">{"Solved! 🏆"}</p>
                }
                <HelpPanel title="8-Puzzle" rules={RULES}/>
            </div>
        }
    }
}
