//! Two-player chess with pseudo-legal moves only.
//!
//! There is no check detection, castling, en-passant or promotion. The game
//! ends when a king is captured.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub const BOARD_SIZE: Coord = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn other(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    const fn pawn_start_row(self) -> Coord {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: Kind,
}

impl Piece {
    pub const fn new(color: Color, kind: Kind) -> Self {
        Self { color, kind }
    }

    /// Parses the classic single-letter code, uppercase for white.
    pub fn from_code(code: char) -> Option<Self> {
        let color = if code.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match code.to_ascii_lowercase() {
            'p' => Kind::Pawn,
            'n' => Kind::Knight,
            'b' => Kind::Bishop,
            'r' => Kind::Rook,
            'q' => Kind::Queen,
            'k' => Kind::King,
            _ => return None,
        };
        Some(Self { color, kind })
    }

    pub const fn glyph(self) -> char {
        use Color::*;
        use Kind::*;
        match (self.color, self.kind) {
            (White, King) => '♔',
            (White, Queen) => '♕',
            (White, Rook) => '♖',
            (White, Bishop) => '♗',
            (White, Knight) => '♘',
            (White, Pawn) => '♙',
            (Black, King) => '♚',
            (Black, Queen) => '♛',
            (Black, Rook) => '♜',
            (Black, Bishop) => '♝',
            (Black, Knight) => '♞',
            (Black, Pawn) => '♟',
        }
    }
}

const INITIAL_ROWS: [&str; 8] = [
    "rnbqkbnr", "pppppppp", "........", "........", "........", "........", "PPPPPPPP",
    "RNBQKBNR",
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const STRAIGHTS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub type Targets = SmallVec<[Coord2; 28]>;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    NoChange,
    Selected,
    Deselected,
    Moved,
    Captured(Piece),
    KingCaptured(Color),
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChessGame {
    board: Array2<Option<Piece>>,
    turn: Color,
    selected: Option<Coord2>,
    winner: Option<Color>,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    pub fn new() -> Self {
        Self::from_rows(&INITIAL_ROWS, Color::White).unwrap_or_else(|_| Self::empty(Color::White))
    }

    fn empty(turn: Color) -> Self {
        let size = BOARD_SIZE as usize;
        Self {
            board: Array2::from_elem((size, size), None),
            turn,
            selected: None,
            winner: None,
        }
    }

    /// Builds a position from eight rows of piece codes, `.` for empty squares.
    pub fn from_rows(rows: &[&str], turn: Color) -> Result<Self> {
        if rows.len() != BOARD_SIZE as usize {
            return Err(GameError::InvalidCoords);
        }
        let mut game = Self::empty(turn);
        for (r, row) in rows.iter().enumerate() {
            if row.chars().count() != BOARD_SIZE as usize {
                return Err(GameError::InvalidCoords);
            }
            for (c, code) in row.chars().enumerate() {
                game.board[[r, c]] = Piece::from_code(code);
            }
        }
        Ok(game)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn selected(&self) -> Option<Coord2> {
        self.selected
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn piece_at(&self, coords: Coord2) -> Option<Piece> {
        self.board.get(coords.to_nd_index()).copied().flatten()
    }

    /// Squares the piece on `from` could move to, ignoring whether its own
    /// king is left in check.
    pub fn legal_targets(&self, from: Coord2) -> Targets {
        let mut targets = Targets::new();
        let Some(piece) = self.piece_at(from) else {
            return targets;
        };
        let bounds = self.board.bounds();

        match piece.kind {
            Kind::Pawn => self.pawn_targets(from, piece.color, &mut targets),
            Kind::Knight => {
                for delta in KNIGHT_JUMPS {
                    if let Some(to) = apply_delta(from, delta, bounds) {
                        self.push_if_enterable(to, piece.color, &mut targets);
                    }
                }
            }
            Kind::King => {
                for delta in DIAGONALS.into_iter().chain(STRAIGHTS) {
                    if let Some(to) = apply_delta(from, delta, bounds) {
                        self.push_if_enterable(to, piece.color, &mut targets);
                    }
                }
            }
            Kind::Bishop => self.slide(from, piece.color, &DIAGONALS, &mut targets),
            Kind::Rook => self.slide(from, piece.color, &STRAIGHTS, &mut targets),
            Kind::Queen => {
                self.slide(from, piece.color, &DIAGONALS, &mut targets);
                self.slide(from, piece.color, &STRAIGHTS, &mut targets);
            }
        }

        targets
    }

    fn pawn_targets(&self, from: Coord2, color: Color, targets: &mut Targets) {
        let bounds = self.board.bounds();
        let dir = color.pawn_direction();

        if let Some(one) = apply_delta(from, (dir, 0), bounds)
            && self.piece_at(one).is_none()
        {
            targets.push(one);
            if from.0 == color.pawn_start_row()
                && let Some(two) = apply_delta(from, (2 * dir, 0), bounds)
                && self.piece_at(two).is_none()
            {
                targets.push(two);
            }
        }

        for dc in [1, -1] {
            if let Some(to) = apply_delta(from, (dir, dc), bounds)
                && let Some(target) = self.piece_at(to)
                && target.color != color
            {
                targets.push(to);
            }
        }
    }

    /// Returns whether a slider may continue past `to`.
    fn push_if_enterable(&self, to: Coord2, color: Color, targets: &mut Targets) -> bool {
        match self.piece_at(to) {
            None => {
                targets.push(to);
                true
            }
            Some(target) if target.color != color => {
                targets.push(to);
                false
            }
            Some(_) => false,
        }
    }

    fn slide(&self, from: Coord2, color: Color, directions: &[(i8, i8)], targets: &mut Targets) {
        let bounds = self.board.bounds();
        for &delta in directions {
            let mut pos = from;
            while let Some(next) = apply_delta(pos, delta, bounds) {
                if !self.push_if_enterable(next, color, targets) {
                    break;
                }
                pos = next;
            }
        }
    }

    pub fn click(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        if !self.board.contains(coords) {
            return Err(GameError::InvalidCoords);
        }
        if self.is_finished() {
            return Err(GameError::AlreadyEnded);
        }

        if let Some(piece) = self.piece_at(coords)
            && piece.color == self.turn
        {
            self.selected = Some(coords);
            return Ok(ClickOutcome::Selected);
        }

        let Some(from) = self.selected.take() else {
            return Ok(ClickOutcome::NoChange);
        };

        if !self.legal_targets(from).contains(&coords) {
            return Ok(ClickOutcome::Deselected);
        }

        Ok(self.apply_move(from, coords))
    }

    fn apply_move(&mut self, from: Coord2, to: Coord2) -> ClickOutcome {
        let moving = self.board[from.to_nd_index()].take();
        let captured = self.board[to.to_nd_index()].take();
        self.board[to.to_nd_index()] = moving;
        self.turn = self.turn.other();

        match captured {
            Some(Piece {
                kind: Kind::King,
                color,
            }) => {
                let winner = color.other();
                log::debug!("chess: {:?} king captured, {:?} wins", color, winner);
                self.winner = Some(winner);
                ClickOutcome::KingCaptured(winner)
            }
            Some(piece) => ClickOutcome::Captured(piece),
            None => ClickOutcome::Moved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut targets: Targets) -> Vec<Coord2> {
        targets.sort();
        targets.to_vec()
    }

    #[test]
    fn opening_pawn_has_single_and_double_push() {
        let game = ChessGame::new();

        assert_eq!(sorted(game.legal_targets((6, 4))), vec![(4, 4), (5, 4)]);
        assert_eq!(sorted(game.legal_targets((1, 0))), vec![(2, 0), (3, 0)]);
    }

    #[test]
    fn opening_knight_and_blocked_pieces() {
        let game = ChessGame::new();

        assert_eq!(sorted(game.legal_targets((7, 1))), vec![(5, 0), (5, 2)]);
        assert!(game.legal_targets((7, 0)).is_empty());
        assert!(game.legal_targets((7, 3)).is_empty());
    }

    #[test]
    fn rook_slides_until_capture() {
        let rows = [
            "....k...", "........", "........", "p.......", "........", "........", "........",
            "R...K...",
        ];
        let game = ChessGame::from_rows(&rows, Color::White).unwrap();

        let targets = game.legal_targets((7, 0));
        assert!(targets.contains(&(3, 0)));
        assert!(!targets.contains(&(2, 0)));
        assert!(targets.contains(&(7, 3)));
        assert!(!targets.contains(&(7, 4)));
    }

    #[test]
    fn blocked_pawn_still_captures_diagonally() {
        let rows = [
            "....k...", "........", "........", "........", "...ppp..", "....p...", "........",
            "....K...",
        ];
        let mut game = ChessGame::from_rows(&rows, Color::Black).unwrap();
        game.board[[5, 4]] = Some(Piece::new(Color::White, Kind::Pawn));

        let targets = sorted(game.legal_targets((5, 4)));
        assert_eq!(targets, vec![(4, 3), (4, 5)]);
    }

    #[test]
    fn click_moves_and_flips_turn() {
        let mut game = ChessGame::new();

        assert_eq!(game.click((6, 4)).unwrap(), ClickOutcome::Selected);
        assert_eq!(game.click((4, 4)).unwrap(), ClickOutcome::Moved);
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.piece_at((4, 4)), Some(Piece::new(Color::White, Kind::Pawn)));
    }

    #[test]
    fn illegal_target_clears_selection() {
        let mut game = ChessGame::new();

        game.click((6, 4)).unwrap();
        assert_eq!(game.click((3, 4)).unwrap(), ClickOutcome::Deselected);
        assert_eq!(game.selected(), None);
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn capturing_king_ends_game() {
        let rows = [
            "....k...", "....Q...", "........", "........", "........", "........", "........",
            "....K...",
        ];
        let mut game = ChessGame::from_rows(&rows, Color::White).unwrap();

        game.click((1, 4)).unwrap();
        assert_eq!(
            game.click((0, 4)).unwrap(),
            ClickOutcome::KingCaptured(Color::White)
        );
        assert_eq!(game.click((7, 4)), Err(GameError::AlreadyEnded));
    }
}
