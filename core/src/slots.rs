//! Single-reel "nations" slot machine.
//!
//! A spin walks a highlight around the twelve symbols with a slowing cadence.
//! The engine only decides where the highlight lands and how long each step
//! waits; the caller drives the timing and then calls [`SlotMachine::settle`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub flag: &'static str,
    pub name: &'static str,
    pub payout: u32,
}

pub const SYMBOLS: [Symbol; 12] = [
    Symbol { flag: "🇧🇷", name: "Brazil", payout: 200 },
    Symbol { flag: "🇺🇸", name: "USA", payout: 100 },
    Symbol { flag: "🇯🇵", name: "Japan", payout: 100 },
    Symbol { flag: "🇩🇪", name: "Germany", payout: 50 },
    Symbol { flag: "🇨🇳", name: "China", payout: 50 },
    Symbol { flag: "🇬🇧", name: "United Kingdom", payout: 20 },
    Symbol { flag: "🇫🇷", name: "France", payout: 20 },
    Symbol { flag: "🇮🇹", name: "Italy", payout: 10 },
    Symbol { flag: "🇦🇷", name: "Argentina", payout: 10 },
    Symbol { flag: "🇪🇸", name: "Spain", payout: 0 },
    Symbol { flag: "🇨🇦", name: "Canada", payout: 0 },
    Symbol { flag: "🇰🇷", name: "South Korea", payout: 0 },
];

pub const STARTING_BALANCE: u32 = 500;
pub const SPIN_COST: u32 = 5;

const MIN_STEPS: u32 = 40;
const EXTRA_STEPS: u32 = 30;
const INITIAL_DELAY_MS: u32 = 50;
const SLOWDOWN_MS: u32 = 60;
const SLOWDOWN_WINDOW: u32 = 12;

/// Highlight positions of one spin and the wait before each of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpinPlan {
    index: usize,
    remaining: u32,
    delay_ms: u32,
    started: bool,
}

impl SpinPlan {
    pub fn new(start: usize, steps: u32) -> Self {
        Self {
            index: start,
            remaining: steps,
            delay_ms: INITIAL_DELAY_MS,
            started: false,
        }
    }

    /// Index the highlight will stop on.
    pub fn landing(&self) -> usize {
        (self.index + self.remaining as usize) % SYMBOLS.len()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Iterator for SpinPlan {
    /// `(index, delay_ms)`: wait `delay_ms`, then highlight `index`.
    type Item = (usize, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let wait = if self.started { self.delay_ms } else { 0 };
        self.started = true;

        self.index = (self.index + 1) % SYMBOLS.len();
        self.remaining -= 1;
        if self.remaining < SLOWDOWN_WINDOW {
            self.delay_ms += SLOWDOWN_MS;
        }
        Some((self.index, wait))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMachine {
    balance: u32,
    active: usize,
    landing: Option<usize>,
    last_win: Option<u32>,
}

impl Default for SlotMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotMachine {
    pub fn new() -> Self {
        Self {
            balance: STARTING_BALANCE,
            active: 0,
            landing: None,
            last_win: None,
        }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_spinning(&self) -> bool {
        self.landing.is_some()
    }

    pub fn last_win(&self) -> Option<u32> {
        self.last_win
    }

    pub fn can_spin(&self) -> bool {
        !self.is_spinning() && self.balance >= SPIN_COST
    }

    /// Charges the stake and plans the highlight walk.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SpinPlan> {
        if self.is_spinning() {
            return Err(GameError::WrongPhase);
        }
        if self.balance < SPIN_COST {
            return Err(GameError::InsufficientFunds);
        }

        self.balance -= SPIN_COST;
        self.last_win = None;
        let steps = MIN_STEPS + rng.random_range(0..EXTRA_STEPS);
        let plan = SpinPlan::new(self.active, steps);
        self.landing = Some(plan.landing());
        log::trace!("slots: spinning {} steps", steps);
        Ok(plan)
    }

    /// Moves the highlight while a spin is running.
    pub fn show(&mut self, index: usize) {
        if self.is_spinning() && index < SYMBOLS.len() {
            self.active = index;
        }
    }

    /// Ends the running spin on its planned symbol and pays out.
    pub fn settle(&mut self) -> Result<u32> {
        let landing = self.landing.take().ok_or(GameError::WrongPhase)?;
        let payout = SYMBOLS[landing].payout;
        self.active = landing;
        self.balance += payout;
        self.last_win = Some(payout);
        log::debug!("slots: landed on {} paying {}", SYMBOLS[landing].name, payout);
        Ok(payout)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn plan_slows_down_at_the_end() {
        let steps: Vec<_> = SpinPlan::new(0, 14).collect();

        assert_eq!(steps.len(), 14);
        assert_eq!(steps[0], (1, 0));
        assert_eq!(steps[1], (2, 50));
        assert_eq!(steps[2], (3, 50));
        // Fewer than twelve left after the third step, so the wait grows.
        assert_eq!(steps[3], (4, 110));
        assert_eq!(steps[4], (5, 170));
        assert_eq!(steps.last().copied(), Some((2, 50 + 60 * 11)));
    }

    #[test]
    fn landing_matches_last_step() {
        let plan = SpinPlan::new(7, 45);
        let landing = plan.landing();

        assert_eq!(plan.last().map(|(index, _)| index), Some(landing));
    }

    #[test]
    fn spin_charges_and_settle_pays() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut slots = SlotMachine::new();

        let plan = slots.spin(&mut rng).unwrap();
        assert!((40..70).contains(&plan.remaining()));
        assert_eq!(slots.balance(), STARTING_BALANCE - SPIN_COST);
        assert_eq!(slots.spin(&mut rng), Err(GameError::WrongPhase));

        let landing = plan.landing();
        for (index, _) in plan {
            slots.show(index);
        }
        let payout = slots.settle().unwrap();

        assert_eq!(payout, SYMBOLS[landing].payout);
        assert_eq!(slots.active(), landing);
        assert_eq!(slots.balance(), STARTING_BALANCE - SPIN_COST + payout);
        assert_eq!(slots.last_win(), Some(payout));
        assert_eq!(slots.settle(), Err(GameError::WrongPhase));
    }

    #[test]
    fn broke_player_cannot_spin() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut slots = SlotMachine::new();
        slots.balance = 4;

        assert!(!slots.can_spin());
        assert_eq!(slots.spin(&mut rng), Err(GameError::InsufficientFunds));
    }
}
