use gloo::timers::callback::Timeout;
use multigame_core::slots::{SPIN_COST, SYMBOLS, SlotMachine, SpinPlan};
use rand::rngs::SmallRng;
use yew::prelude::*;

use super::*;
use crate::sound::{Sound, SoundBoard};
use crate::utils::game_rng;

const RULES: &[&str] = &[
    "Each spin costs $5.",
    "The light runs around the flags and slows down before stopping.",
    "The flag it lands on pays the amount shown on the pay table.",
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Spin,
    Show(usize),
    Reset,
}

pub(crate) struct SlotsView {
    machine: SlotMachine,
    plan: Option<SpinPlan>,
    /// Next highlight step; dropping it stops the walk.
    step: Option<Timeout>,
    rng: SmallRng,
    sound: SoundBoard,
}

impl SlotsView {
    /// Schedules the next highlight, or settles the spin once the plan is done.
    fn advance(&mut self, ctx: &Context<Self>) {
        match self.plan.as_mut().and_then(Iterator::next) {
            Some((index, wait_ms)) => {
                let link = ctx.link().clone();
                self.step = Some(Timeout::new(wait_ms, move || {
                    link.send_message(Msg::Show(index))
                }));
            }
            None => {
                self.plan = None;
                self.step = None;
                match self.machine.settle() {
                    Ok(0) => self.sound.play(Sound::Loss),
                    Ok(_) => self.sound.play(Sound::Win),
                    Err(err) => log::warn!("slots: settle failed: {}", err),
                }
            }
        }
    }
}

impl Component for SlotsView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            machine: SlotMachine::new(),
            plan: None,
            step: None,
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
            Spin => match self.machine.spin(&mut self.rng) {
                Ok(plan) => {
                    self.plan = Some(plan);
                    self.advance(ctx);
                    true
                }
                Err(err) => {
                    log::debug!("slots: spin refused: {}", err);
                    false
                }
            },
            Show(index) => {
                self.machine.show(index);
                self.sound.play(Sound::Dice);
                self.advance(ctx);
                true
            }
            Reset => {
                self.plan = None;
                self.step = None;
                self.machine = SlotMachine::new();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_spin = ctx.link().callback(|_: MouseEvent| Msg::Spin);
        let cb_reset = ctx.link().callback(|_: MouseEvent| Msg::Reset);
        let active = self.machine.active();
        let spinning = self.machine.is_spinning();

        html! {
            <div class="game slots">
                <Toolbar title="Nations Slots" on_restart={cb_reset}>
                    <p class="balance">{format!("🪙 ${}", self.machine.balance())}</p>
                </Toolbar>
                <div class="reel">
                    {
                        for SYMBOLS.iter().enumerate().map(|(index, symbol)| html! {
                            <div class={classes!("symbol", (index == active).then_some("active"))} title={symbol.name}>
                                <span class="flag">{symbol.flag}</span>
                                <small>{format!("${}", symbol.payout)}</small>
                            </div>
                        })
                    }
                </div>
                <button class="spin" disabled={!self.machine.can_spin()} onclick={cb_spin}>
                    { if spinning { "SPINNING...".to_owned() } else { format!("SPIN (${SPIN_COST})") } }
                </button>
                if let Some(win) = self.machine.last_win().filter(|_| !spinning) {
                    <p class={classes!("result", (win > 0).then_some("won"))}>
                        { if win > 0 { format!("{} pays ${win}!", SYMBOLS[active].name) } else { "No luck this time.".to_owned() } }
                    </p>
                }
                <table class="pay-table">
                    { for SYMBOLS.iter().filter(|s| s.payout > 0).map(|s| html! {
                        <tr><td>{s.flag}</td><td>{s.name}</td><td>{format!("${}", s.payout)}</td></tr>
                    }) }
                </table>
                <HelpPanel title="Nations Slots" rules={RULES}/>
            </div>
        }
    }
}
