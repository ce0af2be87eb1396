use multigame_core::checkers::{BOARD_SIZE, CheckersGame, ClickOutcome, Piece};
use multigame_core::{Coord2, Side};
use yew::prelude::*;

use super::*;
use crate::sound::{Sound, SoundBoard};

const RULES: &[&str] = &[
    "White moves first; players alternate turns.",
    "Pieces step one square diagonally forward onto a free dark square.",
    "Jump over an opponent's piece to capture it.",
    "A piece reaching the far row is crowned and may move backwards too.",
    "Capture every opposing piece to win.",
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Click(Coord2),
    Restart,
}

#[derive(Properties, Clone, PartialEq)]
struct SquareProps {
    pos: Coord2,
    piece: Option<Piece>,
    #[prop_or_default]
    selected: bool,
    callback: Callback<Coord2>,
}

#[function_component(Square)]
fn square_component(props: &SquareProps) -> Html {
    let SquareProps {
        pos,
        piece,
        selected,
        callback,
    } = props.clone();
    let (row, col) = pos;
    let class = classes!(
        "square",
        if (row + col) % 2 == 1 { "dark" } else { "light" },
        selected.then_some("selected"),
    );
    let onclick = Callback::from(move |_: MouseEvent| callback.emit(pos));

    html! {
        <td {class} {onclick}>
            if let Some(piece) = piece {
                <span class={piece_class(piece)}>{ if piece.king { "♛" } else { "" } }</span>
            }
        </td>
    }
}

fn piece_class(piece: Piece) -> Classes {
    classes!(
        "piece",
        match piece.owner {
            Side::First => "white",
            Side::Second => "red",
        },
        piece.king.then_some("king"),
    )
}

const fn side_name(side: Side) -> &'static str {
    match side {
        Side::First => "White",
        Side::Second => "Red",
    }
}

pub(crate) struct CheckersView {
    game: CheckersGame,
    sound: SoundBoard,
}

impl Component for CheckersView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            game: CheckersGame::new(),
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
            Click(pos) => match self.game.click(pos) {
                Ok(outcome) => {
                    match outcome {
                        ClickOutcome::Moved => self.sound.play(Sound::Move),
                        ClickOutcome::Captured => self.sound.play(Sound::Capture),
                        ClickOutcome::Won(_) => self.sound.play(Sound::Win),
                        ClickOutcome::Selected | ClickOutcome::NoChange => {}
                    }
                    outcome.has_update()
                }
                Err(err) => {
                    log::debug!("checkers: click {:?} ignored: {}", pos, err);
                    false
                }
            },
            Restart => {
                self.game.reset();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_restart = ctx.link().callback(|_: MouseEvent| Msg::Restart);
        let callback = ctx.link().callback(Msg::Click);
        let status = match self.game.winner() {
            Some(side) => format!("{} wins!", side_name(side)),
            None => format!("{} to move", side_name(self.game.turn())),
        };

        html! {
            <div class="game checkers">
                <Toolbar title="Checkers" on_restart={cb_restart.clone()}>
                    <p class="status">{status}</p>
                </Toolbar>
                <p class="counts">
                    {format!(
                        "White {} · Red {}",
                        self.game.piece_count(Side::First),
                        self.game.piece_count(Side::Second),
                    )}
                </p>
                <table class="board">
                    {
                        for (0..BOARD_SIZE).map(|row| html! {
                            <tr>
                                {
                                    for (0..BOARD_SIZE).map(|col| {
                                        let pos = (row, col);
                                        let piece = self.game.piece_at(pos);
                                        let selected = self.game.selected() == Some(pos);
                                        let callback = callback.clone();
                                        html! { <Square {pos} {piece} {selected} {callback}/> }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if let Some(side) = self.game.winner() {
                    <GameOverModal
                        outcome={Outcome::Won}
                        title={format!("{} WINS!", side_name(side).to_uppercase())}
                        on_restart={cb_restart}
                    />
                }
                <HelpPanel title="Checkers" rules={RULES}/>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kings_get_their_own_class() {
        let king = Piece {
            owner: Side::Second,
            king: true,
        };
        assert_eq!(piece_class(king).to_string(), "piece red king");
        assert_eq!(piece_class(Piece::man(Side::First)).to_string(), "piece white");
    }
}
