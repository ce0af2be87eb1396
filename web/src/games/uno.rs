use multigame_core::Side;
use multigame_core::uno::{Card, Color, DrawOutcome, PlayOutcome, UnoGame};
use rand::rngs::SmallRng;
use yew::prelude::*;

use super::*;
use crate::sound::{Sound, SoundBoard};
use crate::utils::{Modal, game_rng};

const RULES: &[&str] = &[
    "Play a card matching the colour or the symbol on the table.",
    "Wild cards can always be played and let you pick the next colour.",
    "Skip and Reverse give you another turn; +2 and +4 make your opponent draw.",
    "Can't play? Draw a card and pass the turn.",
    "The first player to empty their hand wins.",
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    NewRound,
    Play(Side, usize),
    PickColor(Color),
    CancelWild,
    Draw,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    card: Card,
    #[prop_or_default]
    hidden: bool,
    #[prop_or_default]
    onclick: Option<Callback<MouseEvent>>,
}

#[function_component(CardFace)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        card,
        hidden,
        onclick,
    } = props.clone();
    let class = classes!(
        "card",
        if hidden {
            "hidden"
        } else {
            card.color.map_or("wild", Color::name)
        }
    );
    let label = if hidden {
        "UNO".to_owned()
    } else {
        card.rank.to_string()
    };

    html! {
        <div {class} {onclick}>
            <span>{label}</span>
        </div>
    }
}

pub(crate) struct UnoView {
    game: Option<UnoGame>,
    /// Index of a wild card waiting for its colour.
    pending_wild: Option<usize>,
    rng: SmallRng,
    sound: SoundBoard,
}

impl UnoView {
    fn play(&mut self, side: Side, index: usize, color: Option<Color>) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        match game.play(side, index, color, &mut self.rng) {
            Ok(outcome) => {
                log::debug!("uno: {:?}", outcome);
                self.sound.play(match outcome {
                    PlayOutcome::Won(_) => Sound::Win,
                    PlayOutcome::Penalty(_) => Sound::Capture,
                    PlayOutcome::Played | PlayOutcome::PlayAgain => Sound::Card,
                });
                true
            }
            Err(err) => {
                log::debug!("uno: card {} of player {} refused: {}", index, side.number(), err);
                false
            }
        }
    }

    fn view_hand(&self, ctx: &Context<Self>, game: &UnoGame, side: Side) -> Html {
        let hidden = game.turn() != side || game.winner().is_some();
        let hand = game.hand(side);
        html! {
            <section class={classes!("hand", (!hidden).then_some("active"))}>
                <div class="cards">
                    {
                        for hand.iter().enumerate().map(|(index, &card)| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Play(side, index));
                            html! { <CardFace {card} {hidden} {onclick}/> }
                        })
                    }
                </div>
                <p>{format!("Player {} · {} cards", side.number(), hand.len())}</p>
            </section>
        }
    }

    fn view_color_picker(&self, ctx: &Context<Self>) -> Html {
        html! {
            <Modal>
                <dialog class="color-picker" open={true}>
                    <article>
                        <h3>{"Pick a colour"}</h3>
                        {
                            for Color::ALL.into_iter().map(|color| {
                                let onclick = ctx.link().callback(move |_: MouseEvent| Msg::PickColor(color));
                                html! { <button class={classes!("swatch", color.name())} {onclick}>{color.name()}</button> }
                            })
                        }
                        <footer>
                            <button onclick={ctx.link().callback(|_: MouseEvent| Msg::CancelWild)}>{"Cancel"}</button>
                        </footer>
                    </article>
                </dialog>
            </Modal>
        }
    }
}

impl Component for UnoView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            game: None,
            pending_wild: None,
            rng: game_rng(ctx.props().seed),
            sound: SoundBoard::new(ctx.props().muted),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.sound.set_muted(ctx.props().muted);
        false
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            NewRound => {
                self.game = Some(UnoGame::new_round(&mut self.rng));
                self.pending_wild = None;
                self.sound.play(Sound::Dice);
                true
            }
            Play(side, index) => {
                let Some(game) = self.game.as_ref() else {
                    return false;
                };
                let is_wild = game
                    .hand(side)
                    .get(index)
                    .is_some_and(|card| card.rank.is_wild());
                if is_wild && game.turn() == side && game.winner().is_none() {
                    self.pending_wild = Some(index);
                    return true;
                }
                self.play(side, index, None)
            }
            PickColor(color) => {
                let Some(index) = self.pending_wild.take() else {
                    return false;
                };
                let Some(side) = self.game.as_ref().map(UnoGame::turn) else {
                    return false;
                };
                self.play(side, index, Some(color));
                true
            }
            CancelWild => self.pending_wild.take().is_some(),
            Draw => {
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                match game.draw(&mut self.rng) {
                    Ok(DrawOutcome::Empty) => false,
                    Ok(outcome) => {
                        log::debug!("uno: draw {:?}", outcome);
                        self.sound.play(Sound::Card);
                        true
                    }
                    Err(err) => {
                        log::debug!("uno: draw refused: {}", err);
                        false
                    }
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_new_round = ctx.link().callback(|_: MouseEvent| Msg::NewRound);

        let Some(game) = &self.game else {
            return html! {
                <div class="game uno">
                    <Toolbar title="Uno Classic" on_restart={cb_new_round.clone()}/>
                    <button class="start" onclick={cb_new_round}>{"START GAME"}</button>
                    <HelpPanel title="Uno" rules={RULES}/>
                </div>
            };
        };

        let cb_draw = ctx.link().callback(|_: MouseEvent| Msg::Draw);
        html! {
            <div class="game uno">
                <Toolbar title="Uno Classic" on_restart={cb_new_round.clone()}>
                    <p class="status">{format!("Player {} to play", game.turn().number())}</p>
                </Toolbar>
                { self.view_hand(ctx, game, Side::Second) }
                <section class="table">
                    <div class="deck" onclick={cb_draw}>
                        <span>{"DRAW"}</span>
                        <small>{game.deck_len().to_string()}</small>
                    </div>
                    if let Some(card) = game.top() {
                        <CardFace {card}/>
                    }
                    <p class={classes!("active-color", game.active_color().name())}>
                        {format!("Colour: {}", game.active_color().name())}
                    </p>
                </section>
                { self.view_hand(ctx, game, Side::First) }
                if self.pending_wild.is_some() {
                    { self.view_color_picker(ctx) }
                }
                if let Some(side) = game.winner() {
                    <GameOverModal
                        outcome={Outcome::Won}
                        title="UNO WINNER!"
                        message={format!("Well done, player {}! You ruled the table.", side.number())}
                        on_restart={cb_new_round}
                    />
                }
                <HelpPanel title="Uno" rules={RULES}/>
            </div>
        }
    }
}
