use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

pub const BOARD_SIZE: Coord = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Side,
    pub king: bool,
}

impl Piece {
    pub const fn man(owner: Side) -> Self {
        Self { owner, king: false }
    }

    /// Row direction a non-king piece of this owner may step toward.
    const fn forward(self) -> i8 {
        match self.owner {
            Side::First => -1,
            Side::Second => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    NoChange,
    Selected,
    Moved,
    Captured,
    Won(Side),
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckersGame {
    board: Array2<Option<Piece>>,
    turn: Side,
    selected: Option<Coord2>,
    winner: Option<Side>,
}

impl Default for CheckersGame {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckersGame {
    pub fn new() -> Self {
        let size = BOARD_SIZE as usize;
        let board = Array2::from_shape_fn((size, size), |(r, c)| {
            let dark = (r + c) % 2 == 1;
            match r {
                0..3 if dark => Some(Piece::man(Side::Second)),
                5..8 if dark => Some(Piece::man(Side::First)),
                _ => None,
            }
        });
        Self {
            board,
            turn: Side::First,
            selected: None,
            winner: None,
        }
    }

    pub fn from_pieces(pieces: &[(Coord2, Piece)], turn: Side) -> Result<Self> {
        let size = BOARD_SIZE as usize;
        let mut board = Array2::from_elem((size, size), None);
        for &(coords, piece) in pieces {
            if !board.contains(coords) {
                return Err(GameError::InvalidCoords);
            }
            board[coords.to_nd_index()] = Some(piece);
        }
        Ok(Self {
            board,
            turn,
            selected: None,
            winner: None,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn selected(&self) -> Option<Coord2> {
        self.selected
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn piece_at(&self, coords: Coord2) -> Option<Piece> {
        self.board.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn piece_count(&self, side: Side) -> usize {
        self.board
            .iter()
            .flatten()
            .filter(|piece| piece.owner == side)
            .count()
    }

    /// Handles a click on `coords`, either (re)selecting an own piece or
    /// attempting to move the selected piece there.
    pub fn click(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        if !self.board.contains(coords) {
            return Err(GameError::InvalidCoords);
        }
        self.check_not_finished()?;

        if let Some(piece) = self.piece_at(coords)
            && piece.owner == self.turn
        {
            if self.selected == Some(coords) {
                return Ok(ClickOutcome::NoChange);
            }
            self.selected = Some(coords);
            return Ok(ClickOutcome::Selected);
        }

        let from = self.selected.ok_or(GameError::NothingSelected)?;
        self.try_move(from, coords)
    }

    pub fn try_move(&mut self, from: Coord2, to: Coord2) -> Result<ClickOutcome> {
        self.check_not_finished()?;
        let piece = self.piece_at(from).ok_or(GameError::NothingSelected)?;
        if piece.owner != self.turn {
            return Err(GameError::NotYourTurn);
        }
        if self.piece_at(to).is_some() {
            return Err(GameError::IllegalMove);
        }

        let dr = to.0 as i8 - from.0 as i8;
        let dc = to.1 as i8 - from.1 as i8;

        let captured = match (dr.abs(), dc.abs()) {
            (1, 1) if piece.king || dr == piece.forward() => None,
            (2, 2) => {
                let middle = apply_delta(from, (dr / 2, dc / 2), self.board.bounds())
                    .ok_or(GameError::InvalidCoords)?;
                match self.piece_at(middle) {
                    Some(jumped) if jumped.owner != piece.owner => Some(middle),
                    _ => return Err(GameError::IllegalMove),
                }
            }
            _ => return Err(GameError::IllegalMove),
        };

        let mut moved = piece;
        let far_row = match piece.owner {
            Side::First => 0,
            Side::Second => BOARD_SIZE - 1,
        };
        if to.0 == far_row {
            moved.king = true;
        }

        self.board[from.to_nd_index()] = None;
        self.board[to.to_nd_index()] = Some(moved);
        if let Some(middle) = captured {
            self.board[middle.to_nd_index()] = None;
            log::debug!("checkers: {:?} captured at {:?}", piece.owner, middle);
        }
        self.selected = None;
        self.turn = self.turn.other();

        if let Some(winner) = self.check_winner() {
            self.winner = Some(winner);
            return Ok(ClickOutcome::Won(winner));
        }

        Ok(if captured.is_some() {
            ClickOutcome::Captured
        } else {
            ClickOutcome::Moved
        })
    }

    fn check_winner(&self) -> Option<Side> {
        if self.piece_count(Side::First) == 0 {
            Some(Side::Second)
        } else if self.piece_count(Side::Second) == 0 {
            Some(Side::First)
        } else {
            None
        }
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
    use super::*;

    #[test]
    fn initial_layout_has_twelve_pieces_each() {
        let game = CheckersGame::new();

        assert_eq!(game.piece_count(Side::First), 12);
        assert_eq!(game.piece_count(Side::Second), 12);
        assert_eq!(game.piece_at((5, 0)), Some(Piece::man(Side::First)));
        assert_eq!(game.piece_at((0, 1)), Some(Piece::man(Side::Second)));
        assert_eq!(game.piece_at((0, 0)), None);
    }

    #[test]
    fn man_steps_forward_only() {
        let pieces = [((4, 3), Piece::man(Side::First)), ((0, 1), Piece::man(Side::Second))];
        let mut game = CheckersGame::from_pieces(&pieces, Side::First).unwrap();

        assert_eq!(game.click((4, 3)).unwrap(), ClickOutcome::Selected);
        assert_eq!(game.click((5, 4)), Err(GameError::IllegalMove));
        assert_eq!(game.click((3, 4)).unwrap(), ClickOutcome::Moved);
        assert_eq!(game.turn(), Side::Second);
    }

    #[test]
    fn clicking_the_selected_piece_again_changes_nothing() {
        let mut game = CheckersGame::new();

        assert_eq!(game.click((5, 0)).unwrap(), ClickOutcome::Selected);
        let outcome = game.click((5, 0)).unwrap();
        assert_eq!(outcome, ClickOutcome::NoChange);
        assert!(!outcome.has_update());
        assert_eq!(game.selected(), Some((5, 0)));
        assert_eq!(game.click((5, 2)).unwrap(), ClickOutcome::Selected);
    }

    #[test]
    fn king_steps_backward() {
        let king = Piece {
            owner: Side::First,
            king: true,
        };
        let pieces = [((4, 3), king), ((0, 1), Piece::man(Side::Second))];
        let mut game = CheckersGame::from_pieces(&pieces, Side::First).unwrap();

        game.click((4, 3)).unwrap();
        assert_eq!(game.click((5, 4)).unwrap(), ClickOutcome::Moved);
    }

    #[test]
    fn jump_removes_opponent_and_wins() {
        let pieces = [((4, 3), Piece::man(Side::First)), ((3, 4), Piece::man(Side::Second))];
        let mut game = CheckersGame::from_pieces(&pieces, Side::First).unwrap();

        game.click((4, 3)).unwrap();
        assert_eq!(game.click((2, 5)).unwrap(), ClickOutcome::Won(Side::First));
        assert_eq!(game.piece_at((3, 4)), None);
        assert_eq!(game.click((2, 5)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn jump_over_own_piece_is_rejected() {
        let pieces = [
            ((4, 3), Piece::man(Side::First)),
            ((3, 4), Piece::man(Side::First)),
            ((0, 1), Piece::man(Side::Second)),
        ];
        let mut game = CheckersGame::from_pieces(&pieces, Side::First).unwrap();

        game.click((4, 3)).unwrap();
        assert_eq!(game.click((2, 5)), Err(GameError::IllegalMove));
    }

    #[test]
    fn reaching_far_row_crowns() {
        let pieces = [((1, 2), Piece::man(Side::First)), ((7, 0), Piece::man(Side::Second))];
        let mut game = CheckersGame::from_pieces(&pieces, Side::First).unwrap();

        game.click((1, 2)).unwrap();
        game.click((0, 1)).unwrap();
        assert!(game.piece_at((0, 1)).unwrap().king);
    }

    #[test]
    fn clicking_without_selection_is_rejected() {
        let mut game = CheckersGame::new();

        assert_eq!(game.click((4, 1)), Err(GameError::NothingSelected));
    }
}
