use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

pub const TRACK_LENGTH: u8 = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub side: Side,
    pub value: u8,
    pub position: u8,
    pub won: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LudoRace {
    positions: [u8; 2],
    turn: Side,
    last_roll: Option<u8>,
    winner: Option<Side>,
}

impl LudoRace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn position(&self, side: Side) -> u8 {
        self.positions[usize::from(side.number() - 1)]
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Progress along the track in `0.0..=1.0`.
    pub fn progress(&self, side: Side) -> f32 {
        f32::from(self.position(side)) / f32::from(TRACK_LENGTH)
    }

    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Roll> {
        self.check_not_finished()?;
        self.advance(rng.random_range(1..=6))
    }

    /// Moves the current side by a known die value, then passes the turn.
    pub fn advance(&mut self, value: u8) -> Result<Roll> {
        self.check_not_finished()?;
        if !(1..=6).contains(&value) {
            return Err(GameError::IllegalMove);
        }

        let side = self.turn;
        let slot = &mut self.positions[usize::from(side.number() - 1)];
        *slot = slot.saturating_add(value).min(TRACK_LENGTH);
        let position = *slot;
        let won = position == TRACK_LENGTH;

        self.last_roll = Some(value);
        if won {
            log::debug!("ludo: player {} reached the finish", side.number());
            self.winner = Some(side);
        }
        self.turn = self.turn.other();

        Ok(Roll {
            side,
            value,
            position,
            won,
        })
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.winner.is_some() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn turns_alternate() {
        let mut race = LudoRace::new();

        let roll = race.advance(4).unwrap();
        assert_eq!(roll.side, Side::First);
        assert_eq!(race.position(Side::First), 4);
        assert_eq!(race.turn(), Side::Second);

        race.advance(6).unwrap();
        assert_eq!(race.position(Side::Second), 6);
        assert_eq!(race.turn(), Side::First);
    }

    #[test]
    fn position_caps_at_finish_and_declares_winner() {
        let mut race = LudoRace::new();
        race.positions = [27, 0];

        let roll = race.advance(5).unwrap();
        assert!(roll.won);
        assert_eq!(race.position(Side::First), TRACK_LENGTH);
        assert_eq!(race.winner(), Some(Side::First));
        assert_eq!(race.advance(1), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn random_rolls_stay_on_die_faces() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut race = LudoRace::new();

        while race.winner().is_none() {
            let roll = race.roll(&mut rng).unwrap();
            assert!((1..=6).contains(&roll.value));
        }
        assert_eq!(race.roll(&mut rng), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn reset_clears_race() {
        let mut race = LudoRace::new();
        race.advance(3).unwrap();
        race.reset();

        assert_eq!(race, LudoRace::new());
    }
}
