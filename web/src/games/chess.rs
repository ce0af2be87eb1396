use multigame_core::chess::{BOARD_SIZE, ChessGame, ClickOutcome, Color, Targets};
use multigame_core::Coord2;
use yew::prelude::*;

use super::*;
use crate::sound::{Sound, SoundBoard};

const RULES: &[&str] = &[
    "Move your pieces to attack the opposing king.",
    "Pawns move one square forward, or two from their starting row, and capture diagonally.",
    "Bishops move diagonally, rooks in straight lines, the queen does both.",
    "Knights jump in an L shape; the king steps one square in any direction.",
    "The game ends when a king is captured.",
];

const fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Click(Coord2),
    Restart,
}

pub(crate) struct ChessView {
    game: ChessGame,
    /// Squares the selected piece can reach, cached for highlighting.
    targets: Targets,
    sound: SoundBoard,
}

impl ChessView {
    fn refresh_targets(&mut self) {
        self.targets = self
            .game
            .selected()
            .map(|from| self.game.legal_targets(from))
            .unwrap_or_default();
    }

    fn square_class(&self, pos: Coord2) -> Classes {
        square_class(pos, self.game.selected(), &self.targets)
    }
}

fn square_class(pos: Coord2, selected: Option<Coord2>, targets: &Targets) -> Classes {
    let (row, col) = pos;
    classes!(
        "square",
        if (row + col) % 2 == 1 { "dark" } else { "light" },
        (selected == Some(pos)).then_some("selected"),
        targets.contains(&pos).then_some("target"),
    )
}

impl Component for ChessView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            game: ChessGame::new(),
            targets: Targets::new(),
            sound: SoundBoard::new(ctx.props().muted),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.sound.set_muted(ctx.props().muted);
        false
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Click(pos) => match self.game.click(pos) {
                Ok(outcome) => {
                    match outcome {
                        ClickOutcome::Moved => self.sound.play(Sound::Move),
                        ClickOutcome::Captured(piece) => {
                            log::debug!("chess: took {:?}", piece.kind);
                            self.sound.play(Sound::Capture);
                        }
                        ClickOutcome::KingCaptured(_) => self.sound.play(Sound::Win),
                        ClickOutcome::Selected | ClickOutcome::Deselected | ClickOutcome::NoChange => {}
                    }
                    outcome.has_update()
                }
                Err(err) => {
                    log::debug!("chess: click {:?} ignored: {}", pos, err);
                    false
                }
            },
            Restart => {
                self.game.reset();
                true
            }
        };
        if updated {
            self.refresh_targets();
        }
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_restart = ctx.link().callback(|_: MouseEvent| Msg::Restart);
        let status = match self.game.winner() {
            Some(color) => format!("{} wins!", color_name(color)),
            None => format!("{} to move", color_name(self.game.turn())),
        };

        html! {
            <div class="game chess">
                <Toolbar title="Chess" on_restart={cb_restart.clone()}>
                    <p class="status">{status}</p>
                </Toolbar>
                <table class="board">
                    {
                        for (0..BOARD_SIZE).map(|row| html! {
                            <tr>
                                {
                                    for (0..BOARD_SIZE).map(|col| {
                                        let pos = (row, col);
                                        let glyph = self.game.piece_at(pos).map(|piece| piece.glyph().to_string());
                                        let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Click(pos));
                                        html! {
                                            <td class={self.square_class(pos)} {onclick}>{glyph}</td>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if let Some(color) = self.game.winner() {
                    <GameOverModal
                        outcome={Outcome::Won}
                        title={format!("{} WINS!", color_name(color).to_uppercase())}
                        message="The king has fallen."
                        on_restart={cb_restart}
                    />
                }
                <HelpPanel title="Chess" rules={RULES} video="fKOqudr3DQU"/>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_pawn_highlights_its_pushes() {
        let mut game = ChessGame::new();
        game.click((6, 4)).unwrap();
        let targets = game.legal_targets((6, 4));

        assert_eq!(square_class((6, 4), game.selected(), &targets).to_string(), "square light selected");
        assert_eq!(square_class((5, 4), game.selected(), &targets).to_string(), "square dark target");
        assert_eq!(square_class((4, 4), game.selected(), &targets).to_string(), "square light target");
        assert_eq!(square_class((3, 4), game.selected(), &targets).to_string(), "square dark");
    }

    #[test]
    fn colors_are_named_for_the_status_line() {
        assert_eq!(color_name(Color::White), "White");
        assert_eq!(color_name(Color::Black), "Black");
    }
}
