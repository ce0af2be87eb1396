//! Two-player Uno with the standard 108-card deck.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::*;

pub const HAND_SIZE: usize = 7;
pub const DECK_SIZE: usize = 108;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Rank {
    pub const fn is_wild(self) -> bool {
        matches!(self, Self::Wild | Self::WildDrawFour)
    }

    /// Cards the opponent must take when this rank is played.
    pub const fn penalty(self) -> usize {
        match self {
            Self::DrawTwo => 2,
            Self::WildDrawFour => 4,
            _ => 0,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Skip => f.write_str("SKIP"),
            Self::Reverse => f.write_str("REV"),
            Self::DrawTwo => f.write_str("+2"),
            Self::Wild => f.write_str("WILD"),
            Self::WildDrawFour => f.write_str("+4"),
        }
    }
}

/// A card; wild cards carry no color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: Option<Color>,
    pub rank: Rank,
}

impl Card {
    pub const fn colored(color: Color, rank: Rank) -> Self {
        Self {
            color: Some(color),
            rank,
        }
    }

    pub const fn wild(rank: Rank) -> Self {
        Self { color: None, rank }
    }
}

/// The unshuffled 108-card deck.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in Color::ALL {
        deck.push(Card::colored(color, Rank::Number(0)));
        for _ in 0..2 {
            deck.extend((1..=9).map(|n| Card::colored(color, Rank::Number(n))));
            deck.push(Card::colored(color, Rank::Skip));
            deck.push(Card::colored(color, Rank::Reverse));
            deck.push(Card::colored(color, Rank::DrawTwo));
        }
    }
    for _ in 0..4 {
        deck.push(Card::wild(Rank::Wild));
        deck.push(Card::wild(Rank::WildDrawFour));
    }
    deck
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Turn passed to the opponent.
    Played,
    /// Skip or Reverse: the same side plays again.
    PlayAgain,
    /// The opponent drew this many cards and lost their turn.
    Penalty(usize),
    Won(Side),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Drew,
    /// Discard pile was shuffled back before drawing.
    Reshuffled,
    /// Nothing left anywhere to draw.
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnoGame {
    deck: Vec<Card>,
    hands: [Vec<Card>; 2],
    discard: Vec<Card>,
    active_color: Color,
    turn: Side,
    winner: Option<Side>,
}

impl UnoGame {
    /// Shuffles a fresh deck and deals a round: seven cards each and one face up.
    pub fn new_round<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = standard_deck();
        deck.shuffle(rng);
        Self::deal(deck)
    }

    /// Deals from an already ordered deck; cards are taken from the end.
    pub fn deal(deck: Vec<Card>) -> Self {
        Self::deal_sized(deck, HAND_SIZE)
    }

    fn deal_sized(mut deck: Vec<Card>, hand_size: usize) -> Self {
        let first: Vec<Card> = deck.split_off(deck.len().saturating_sub(hand_size));
        let second: Vec<Card> = deck.split_off(deck.len().saturating_sub(hand_size));

        let mut discard = Vec::new();
        let mut buried = 0;
        let limit = deck.len();
        while let Some(card) = deck.pop() {
            if card.rank.is_wild() && buried < limit {
                deck.insert(0, card);
                buried += 1;
                continue;
            }
            discard.push(card);
            break;
        }

        let active_color = discard
            .last()
            .and_then(|card| card.color)
            .unwrap_or(Color::Red);
        if buried > 0 {
            log::trace!("uno: buried {} wild cards on first flip", buried);
        }

        Self {
            deck,
            hands: [first, second],
            discard,
            active_color,
            turn: Side::First,
            winner: None,
        }
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn hand(&self, side: Side) -> &[Card] {
        &self.hands[Self::seat(side)]
    }

    pub fn top(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.discard.len() + self.hands.iter().map(Vec::len).sum::<usize>()
    }

    const fn seat(side: Side) -> usize {
        match side {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn can_play(&self, card: Card) -> bool {
        if card.rank.is_wild() || card.color == Some(self.active_color) {
            return true;
        }
        self.top().is_some_and(|top| top.rank == card.rank)
    }

    /// Plays the card at `index` of `side`'s hand. Wild cards take
    /// `chosen_color`, falling back to the color the hand holds most of.
    pub fn play<R: Rng + ?Sized>(
        &mut self,
        side: Side,
        index: usize,
        chosen_color: Option<Color>,
        rng: &mut R,
    ) -> Result<PlayOutcome> {
        self.check_not_finished()?;
        if side != self.turn {
            return Err(GameError::NotYourTurn);
        }
        let seat = Self::seat(side);
        let card = *self.hands[seat].get(index).ok_or(GameError::InvalidCoords)?;
        if !self.can_play(card) {
            return Err(GameError::IllegalMove);
        }

        self.hands[seat].remove(index);
        self.discard.push(card);
        self.active_color = match card.color {
            Some(color) => color,
            None => chosen_color.unwrap_or_else(|| dominant_color(&self.hands[seat])),
        };
        log::debug!("uno: player {} played {} {}", side.number(), self.active_color.name(), card.rank);

        if self.hands[seat].is_empty() {
            self.winner = Some(side);
            return Ok(PlayOutcome::Won(side));
        }

        let penalty = card.rank.penalty();
        if penalty > 0 {
            let victim = Self::seat(side.other());
            for _ in 0..penalty {
                match self.take_card(rng) {
                    Some(drawn) => self.hands[victim].push(drawn),
                    None => break,
                }
            }
            return Ok(PlayOutcome::Penalty(penalty));
        }

        if matches!(card.rank, Rank::Skip | Rank::Reverse) {
            return Ok(PlayOutcome::PlayAgain);
        }

        self.turn = self.turn.other();
        Ok(PlayOutcome::Played)
    }

    /// The current side draws one card and the turn passes.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<DrawOutcome> {
        self.check_not_finished()?;
        let reshuffle = self.deck.is_empty();
        let Some(card) = self.take_card(rng) else {
            log::warn!("uno: no cards left to draw");
            return Ok(DrawOutcome::Empty);
        };
        self.hands[Self::seat(self.turn)].push(card);
        self.turn = self.turn.other();
        Ok(if reshuffle {
            DrawOutcome::Reshuffled
        } else {
            DrawOutcome::Drew
        })
    }

    fn take_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.deck.is_empty() && self.discard.len() > 1 {
            let top = self.discard.pop()?;
            self.deck.append(&mut self.discard);
            self.deck.shuffle(rng);
            self.discard.push(top);
            log::debug!("uno: reshuffled {} cards into the deck", self.deck.len());
        }
        self.deck.pop()
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.winner.is_some() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

fn dominant_color(hand: &[Card]) -> Color {
    Color::ALL
        .into_iter()
        .max_by_key(|&color| hand.iter().filter(|card| card.color == Some(color)).count())
        .unwrap_or(Color::Red)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    /// Builds a deck so that dealing gives the listed hands and top card.
    fn rigged(first: &[Card], second: &[Card], top: Card, rest: &[Card]) -> UnoGame {
        assert_eq!(first.len(), second.len());
        let mut deck: Vec<Card> = rest.to_vec();
        deck.push(top);
        deck.extend_from_slice(second);
        deck.extend_from_slice(first);
        UnoGame::deal_sized(deck, first.len())
    }

    fn red(n: u8) -> Card {
        Card::colored(Color::Red, Rank::Number(n))
    }

    fn blue(n: u8) -> Card {
        Card::colored(Color::Blue, Rank::Number(n))
    }

    #[test]
    fn standard_deck_composition() {
        let deck = standard_deck();

        assert_eq!(deck.len(), DECK_SIZE);
        assert_eq!(deck.iter().filter(|c| c.rank.is_wild()).count(), 8);
        assert_eq!(deck.iter().filter(|c| c.rank == Rank::Number(0)).count(), 4);
        assert_eq!(deck.iter().filter(|c| *c == &red(7)).count(), 2);
    }

    #[test]
    fn new_round_deals_seven_seven_one() {
        let game = UnoGame::new_round(&mut rng());

        assert_eq!(game.hand(Side::First).len(), 7);
        assert_eq!(game.hand(Side::Second).len(), 7);
        assert_eq!(game.discard_len(), 1);
        assert_eq!(game.deck_len(), DECK_SIZE - 15);
        assert!(!game.top().unwrap().rank.is_wild());
        assert_eq!(game.total_cards(), DECK_SIZE);
    }

    #[test]
    fn wild_first_flip_is_buried() {
        let game = rigged(
            &[red(1); 7],
            &[blue(1); 7],
            Card::wild(Rank::Wild),
            &[blue(5)],
        );

        assert_eq!(game.top(), Some(blue(5)));
        assert_eq!(game.active_color(), Color::Blue);
        assert_eq!(game.total_cards(), 16);
    }

    #[test]
    fn play_requires_color_or_rank_match() {
        let mut game = rigged(
            &[blue(3), red(9), Card::colored(Color::Green, Rank::Number(4))],
            &[blue(1); 3],
            Card::colored(Color::Green, Rank::Number(9)),
            &[red(2); 4],
        );

        assert_eq!(game.play(Side::First, 0, None, &mut rng()), Err(GameError::IllegalMove));
        assert_eq!(game.play(Side::Second, 0, None, &mut rng()), Err(GameError::NotYourTurn));
        assert_eq!(game.play(Side::First, 1, None, &mut rng()).unwrap(), PlayOutcome::Played);
        assert_eq!(game.active_color(), Color::Red);
        assert_eq!(game.turn(), Side::Second);
    }

    #[test]
    fn skip_keeps_turn_and_draw_two_penalizes() {
        let mut game = rigged(
            &[Card::colored(Color::Red, Rank::Skip), Card::colored(Color::Red, Rank::DrawTwo), red(1)],
            &[blue(1); 3],
            red(5),
            &[blue(2); 4],
        );

        assert_eq!(game.play(Side::First, 0, None, &mut rng()).unwrap(), PlayOutcome::PlayAgain);
        assert_eq!(game.turn(), Side::First);
        assert_eq!(game.play(Side::First, 0, None, &mut rng()).unwrap(), PlayOutcome::Penalty(2));
        assert_eq!(game.hand(Side::Second).len(), 5);
        assert_eq!(game.turn(), Side::First);
    }

    #[test]
    fn wild_sets_chosen_color_and_emptying_hand_wins() {
        let mut game = rigged(
            &[Card::wild(Rank::Wild), blue(8)],
            &[red(1); 2],
            red(5),
            &[red(2); 2],
        );

        assert_eq!(
            game.play(Side::First, 0, Some(Color::Blue), &mut rng()).unwrap(),
            PlayOutcome::Played
        );
        assert_eq!(game.active_color(), Color::Blue);
        game.draw(&mut rng()).unwrap();
        assert_eq!(game.play(Side::First, 0, None, &mut rng()).unwrap(), PlayOutcome::Won(Side::First));
        assert_eq!(game.draw(&mut rng()), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn draw_reshuffles_discard_but_keeps_top() {
        let mut game = rigged(&[red(1), red(2), red(3)], &[red(4); 3], red(5), &[]);
        assert_eq!(game.deck_len(), 0);

        game.play(Side::First, 0, None, &mut rng()).unwrap();
        game.play(Side::Second, 0, None, &mut rng()).unwrap();
        let top = game.top();

        assert_eq!(game.draw(&mut rng()).unwrap(), DrawOutcome::Reshuffled);
        assert_eq!(game.top(), top);
        assert_eq!(game.discard_len(), 1);
        assert_eq!(game.total_cards(), 7);
    }

    #[test]
    fn total_is_invariant_under_play_and_draw() {
        let mut rng = rng();
        let mut game = UnoGame::new_round(&mut rng);

        for _ in 0..200 {
            if game.winner().is_some() {
                break;
            }
            let side = game.turn();
            let playable = game.hand(side).iter().position(|&c| game.can_play(c));
            match playable {
                Some(index) => {
                    game.play(side, index, None, &mut rng).unwrap();
                }
                None => {
                    game.draw(&mut rng).unwrap();
                }
            }
            assert_eq!(game.total_cards(), DECK_SIZE);
        }
    }
}
