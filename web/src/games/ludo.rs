use gloo::timers::callback::Timeout;
use multigame_core::Side;
use multigame_core::ludo::{LudoRace, TRACK_LENGTH};
use rand::rngs::SmallRng;
use yew::prelude::*;

use super::*;
use crate::sound::{Sound, SoundBoard};
use crate::utils::game_rng;

const ROLL_DELAY_MS: u32 = 600;

const RULES: &[&str] = &[
    "Players take turns rolling the die.",
    "Your token advances by the number rolled.",
    "The first token to reach square 30 wins the race.",
];

/// Die face for a roll of 1 to 6.
fn die_face(value: u8) -> char {
    match value {
        1 => '⚀',
        2 => '⚁',
        3 => '⚂',
        4 => '⚃',
        5 => '⚄',
        _ => '⚅',
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Roll,
    Resolve,
    Restart,
}

pub(crate) struct LudoView {
    race: LudoRace,
    rng: SmallRng,
    sound: SoundBoard,
    /// Pending roll; dropping it cancels the roll.
    rolling: Option<Timeout>,
}

impl LudoView {
    fn view_lane(&self, side: Side) -> Html {
        let position = self.race.position(side);
        let style = format!("width: {:.1}%", self.race.progress(side) * 100.0);
        let class = classes!(
            "lane",
            match side {
                Side::First => "blue",
                Side::Second => "red",
            },
            (self.race.turn() == side && self.race.winner().is_none()).then_some("active"),
        );

        html! {
            <div {class}>
                <span class="token">{format!("P{}", side.number())}</span>
                <div class="track"><div class="progress" {style}/></div>
                <span class="count">{format!("{position}/{TRACK_LENGTH}")}</span>
            </div>
        }
    }
}

impl Component for LudoView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            race: LudoRace::new(),
            rng: game_rng(ctx.props().seed),
            sound: SoundBoard::new(ctx.props().muted),
            rolling: None,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.sound.set_muted(ctx.props().muted);
        false
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Roll => {
                if self.rolling.is_some() || self.race.winner().is_some() {
                    return false;
                }
                self.sound.play(Sound::Dice);
                let link = ctx.link().clone();
                self.rolling = Some(Timeout::new(ROLL_DELAY_MS, move || {
                    link.send_message(Resolve)
                }));
                true
            }
            Resolve => {
                self.rolling = None;
                match self.race.roll(&mut self.rng) {
                    Ok(roll) if roll.won => self.sound.play(Sound::Win),
                    Ok(_) => self.sound.play(Sound::Move),
                    Err(err) => log::debug!("ludo: roll ignored: {}", err),
                }
                true
            }
            Restart => {
                self.rolling = None;
                self.race.reset();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_roll = ctx.link().callback(|_: MouseEvent| Msg::Roll);
        let cb_restart = ctx.link().callback(|_: MouseEvent| Msg::Restart);
        let rolling = self.rolling.is_some();
        let face = self.race.last_roll().map_or('⚀', die_face);
        let status = match self.race.winner() {
            Some(side) => format!("Player {} wins!", side.number()),
            None => format!("Player {}'s turn", self.race.turn().number()),
        };

        html! {
            <div class="game ludo">
                <Toolbar title="Ludo Race" on_restart={cb_restart.clone()}>
                    <p class="status">{status}</p>
                </Toolbar>
                <section class="lanes">
                    { self.view_lane(Side::First) }
                    { self.view_lane(Side::Second) }
                </section>
                <button
                    class={classes!("die", rolling.then_some("rolling"))}
                    disabled={rolling || self.race.winner().is_some()}
                    onclick={cb_roll}
                >
                    {face.to_string()}
                </button>
                if let Some(side) = self.race.winner() {
                    <GameOverModal
                        outcome={Outcome::Won}
                        title={format!("PLAYER {} WINS!", side.number())}
                        message="First to the finish line."
                        on_restart={cb_restart}
                    />
                }
                <HelpPanel title="Ludo Race" rules={RULES}/>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_faces_cover_every_roll() {
        let faces: String = (1..=6).map(die_face).collect();
        assert_eq!(faces, "⚀⚁⚂⚃⚄⚅");
    }
}
