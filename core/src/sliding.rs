use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Tile value marking the hole.
pub const HOLE: u8 = 0;

/// Largest side length whose tiles all fit in a `u8`.
pub const MAX_SIZE: Coord = 16;

/// Where the hole sits once the puzzle is solved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    /// `1, 2, .., n²-1` followed by the hole, as in the classic 8-puzzle.
    HoleLast,
    /// `tiles[i] == i`, so tile `0` (the hole) is the top-left piece.
    HoleFirst,
}

impl Goal {
    fn solved_tile(self, index: usize, len: usize) -> u8 {
        let tile = match self {
            Self::HoleLast if index + 1 == len => 0,
            Self::HoleLast => index + 1,
            Self::HoleFirst => index,
        };
        tile as u8
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlideOutcome {
    Moved,
    Solved,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingPuzzle {
    size: Coord,
    goal: Goal,
    tiles: Vec<u8>,
    solved: bool,
}

impl SlidingPuzzle {
    /// A solved `size × size` puzzle, with `size` clamped to `2..=MAX_SIZE`.
    pub fn new(size: Coord, goal: Goal) -> Self {
        let size = size.clamp(2, MAX_SIZE);
        let len = usize::from(size) * usize::from(size);
        let tiles = (0..len).map(|i| goal.solved_tile(i, len)).collect();
        Self {
            size,
            goal,
            tiles,
            solved: true,
        }
    }

    /// Builds a puzzle from an explicit layout, which must be a permutation of
    /// `0..size²`.
    pub fn from_tiles(size: Coord, goal: Goal, tiles: Vec<u8>) -> Result<Self> {
        let len = usize::from(size) * usize::from(size);
        if size < 2 || tiles.len() != len {
            return Err(GameError::InvalidCoords);
        }
        let mut seen = vec![false; len];
        for &tile in &tiles {
            match seen.get_mut(usize::from(tile)) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(GameError::InvalidCoords),
            }
        }
        let mut puzzle = Self {
            size,
            goal,
            tiles,
            solved: false,
        };
        puzzle.solved = puzzle.is_solved();
        Ok(puzzle)
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn hole(&self) -> usize {
        self.tiles.iter().position(|&t| t == HOLE).unwrap_or(0)
    }

    pub fn is_solved(&self) -> bool {
        let len = self.tiles.len();
        self.tiles
            .iter()
            .enumerate()
            .all(|(i, &tile)| tile == self.goal.solved_tile(i, len))
    }

    fn coords(&self, index: usize) -> Coord2 {
        let size = usize::from(self.size);
        ((index / size) as Coord, (index % size) as Coord)
    }

    fn index(&self, coords: Coord2) -> usize {
        usize::from(coords.0) * usize::from(self.size) + usize::from(coords.1)
    }

    pub fn is_adjacent_to_hole(&self, index: usize) -> bool {
        if index >= self.tiles.len() {
            return false;
        }
        let (r, c) = self.coords(index);
        let (hr, hc) = self.coords(self.hole());
        r.abs_diff(hr) + c.abs_diff(hc) == 1
    }

    /// Indices of tiles that could slide into the hole.
    pub fn movable(&self) -> SmallVec<[usize; 4]> {
        let hole = self.coords(self.hole());
        let bounds = (self.size, self.size);
        Direction::ALL
            .iter()
            .filter_map(|dir| apply_delta(hole, dir.delta(), bounds))
            .map(|coords| self.index(coords))
            .collect()
    }

    /// Slides the tile at `index` into the hole.
    pub fn slide(&mut self, index: usize) -> Result<SlideOutcome> {
        if self.solved {
            return Err(GameError::AlreadyEnded);
        }
        if index >= self.tiles.len() {
            return Err(GameError::InvalidCoords);
        }
        if !self.is_adjacent_to_hole(index) {
            return Err(GameError::IllegalMove);
        }

        let hole = self.hole();
        self.tiles.swap(index, hole);

        if self.is_solved() {
            self.solved = true;
            log::debug!("sliding: solved {}x{}", self.size, self.size);
            Ok(SlideOutcome::Solved)
        } else {
            Ok(SlideOutcome::Moved)
        }
    }

    /// Resets to the solved layout and applies `moves` random legal moves.
    ///
    /// The result is never left solved, so there is always something to do.
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R, moves: usize) {
        *self = Self::new(self.size, self.goal);
        let mut previous = None;
        let mut applied = 0;
        while applied < moves || self.is_solved() {
            let hole = self.hole();
            let candidates: SmallVec<[usize; 4]> = self
                .movable()
                .into_iter()
                .filter(|&i| Some(i) != previous)
                .collect();
            let Some(&next) = candidates.choose(rng) else {
                break;
            };
            self.tiles.swap(hole, next);
            previous = Some(hole);
            applied += 1;
        }
        self.solved = self.is_solved();
        log::trace!("sliding: scrambled with {} moves", applied);
    }

    /// Parity test for whether the layout can reach the goal.
    pub fn is_solvable(&self) -> bool {
        let size = usize::from(self.size);
        let len = self.tiles.len();
        // Relabel tiles by their goal position so the target is the identity.
        let mut goal_pos = vec![0usize; len];
        for i in 0..len {
            goal_pos[usize::from(self.goal.solved_tile(i, len))] = i;
        }
        let perm: Vec<usize> = self
            .tiles
            .iter()
            .map(|&t| goal_pos[usize::from(t)])
            .collect();

        let mut visited = vec![false; len];
        let mut transpositions = 0;
        for start in 0..len {
            let mut cycle = 0;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = perm[i];
                cycle += 1;
            }
            if cycle > 0 {
                transpositions += cycle - 1;
            }
        }

        let hole_now = self.hole();
        let hole_goal = goal_pos[usize::from(HOLE)];
        let hole_distance =
            (hole_now / size).abs_diff(hole_goal / size) + (hole_now % size).abs_diff(hole_goal % size);

        transpositions % 2 == hole_distance % 2
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn oversized_puzzle_is_clamped_to_distinct_tiles() {
        for goal in [Goal::HoleFirst, Goal::HoleLast] {
            let puzzle = SlidingPuzzle::new(17, goal);

            assert_eq!(puzzle.size(), MAX_SIZE);
            assert_eq!(puzzle.tiles().len(), 256);
            assert!(SlidingPuzzle::from_tiles(MAX_SIZE, goal, puzzle.tiles().to_vec()).is_ok());
        }
    }

    #[test]
    fn solved_layouts() {
        assert_eq!(
            SlidingPuzzle::new(3, Goal::HoleLast).tiles(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 0]
        );
        assert_eq!(
            SlidingPuzzle::new(2, Goal::HoleFirst).tiles(),
            &[0, 1, 2, 3]
        );
    }

    #[test]
    fn slide_requires_orthogonal_adjacency() {
        let tiles = vec![1, 2, 3, 4, 0, 5, 7, 8, 6];
        let mut puzzle = SlidingPuzzle::from_tiles(3, Goal::HoleLast, tiles).unwrap();

        assert_eq!(puzzle.slide(0), Err(GameError::IllegalMove));
        assert_eq!(puzzle.slide(8), Err(GameError::IllegalMove));
        assert_eq!(puzzle.slide(3).unwrap(), SlideOutcome::Moved);
        assert_eq!(puzzle.hole(), 3);
    }

    #[test]
    fn row_wrap_is_not_adjacent() {
        let tiles = vec![1, 2, 0, 3, 4, 5, 6, 7, 8];
        let puzzle = SlidingPuzzle::from_tiles(3, Goal::HoleLast, tiles).unwrap();

        assert!(!puzzle.is_adjacent_to_hole(3));
        assert!(puzzle.is_adjacent_to_hole(5));
    }

    #[test]
    fn finishing_move_solves_and_locks() {
        let tiles = vec![1, 2, 3, 4, 5, 6, 7, 0, 8];
        let mut puzzle = SlidingPuzzle::from_tiles(3, Goal::HoleLast, tiles).unwrap();

        assert_eq!(puzzle.slide(8).unwrap(), SlideOutcome::Solved);
        assert_eq!(puzzle.slide(7), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn scramble_is_solvable_and_unsolved() {
        let mut rng = SmallRng::seed_from_u64(7);
        for goal in [Goal::HoleLast, Goal::HoleFirst] {
            for size in 3..=5 {
                let mut puzzle = SlidingPuzzle::new(size, goal);
                puzzle.scramble(&mut rng, 150);
                assert!(!puzzle.is_solved());
                assert!(puzzle.is_solvable());
            }
        }
    }

    #[test]
    fn swapped_pair_is_unsolvable() {
        let tiles = vec![2, 1, 3, 4, 5, 6, 7, 8, 0];
        let puzzle = SlidingPuzzle::from_tiles(3, Goal::HoleLast, tiles).unwrap();

        assert!(!puzzle.is_solvable());
    }

    #[test]
    fn rejects_duplicate_tiles() {
        assert_eq!(
            SlidingPuzzle::from_tiles(2, Goal::HoleFirst, vec![0, 1, 1, 3]),
            Err(GameError::InvalidCoords)
        );
    }
}
