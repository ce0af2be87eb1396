use ndarray::Array2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Side length in cells, odd so that walls and passages alternate.
    pub size: Coord,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self { size: 17 }
    }
}

impl MazeConfig {
    /// Odd size of at least 5; even sizes round down.
    fn normalized_size(self) -> Coord {
        let size = self.size.max(5);
        if size % 2 == 0 { size - 1 } else { size }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Escaped,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    grid: Array2<Cell>,
    player: Coord2,
    escaped: bool,
}

pub const START: Coord2 = (1, 1);

const CARVE_STEPS: [(i8, i8); 4] = [(0, 2), (0, -2), (2, 0), (-2, 0)];

impl Maze {
    pub fn generate<R: Rng + ?Sized>(config: MazeConfig, rng: &mut R) -> Self {
        let size = config.normalized_size();
        let grid = carve(size, rng);
        Self {
            grid,
            player: START,
            escaped: false,
        }
    }

    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let size = self.size();
        *self = Self::generate(MazeConfig { size }, rng);
    }

    pub fn size(&self) -> Coord {
        self.grid.bounds().0
    }

    pub fn exit(&self) -> Coord2 {
        let last = self.size() - 2;
        (last, last)
    }

    pub fn player(&self) -> Coord2 {
        self.player
    }

    pub fn escaped(&self) -> bool {
        self.escaped
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.grid.get(coords.to_nd_index()).copied()
    }

    pub fn is_open(&self, coords: Coord2) -> bool {
        self.cell(coords) == Some(Cell::Open)
    }

    pub fn grid(&self) -> &Array2<Cell> {
        &self.grid
    }

    pub fn step(&mut self, direction: Direction) -> Result<StepOutcome> {
        if self.escaped {
            return Err(GameError::AlreadyEnded);
        }
        let next = apply_delta(self.player, direction.delta(), self.grid.bounds())
            .ok_or(GameError::InvalidCoords)?;
        if !self.is_open(next) {
            return Err(GameError::IllegalMove);
        }

        self.player = next;
        if next == self.exit() {
            self.escaped = true;
            log::debug!("maze: escaped");
            return Ok(StepOutcome::Escaped);
        }
        Ok(StepOutcome::Moved)
    }
}

/// Randomized depth-first carve over the odd cells, starting at [`START`].
fn carve<R: Rng + ?Sized>(size: Coord, rng: &mut R) -> Array2<Cell> {
    let dim = usize::from(size);
    let mut grid = Array2::from_elem((dim, dim), Cell::Wall);
    let bounds = grid.bounds();
    let inner = |(r, c): Coord2| r > 0 && r < size - 1 && c > 0 && c < size - 1;

    grid[START.to_nd_index()] = Cell::Open;
    let mut stack = vec![START];

    while let Some(&current) = stack.last() {
        let neighbors: SmallVec<[((i8, i8), Coord2); 4]> = CARVE_STEPS
            .iter()
            .filter_map(|&delta| Some((delta, apply_delta(current, delta, bounds)?)))
            .filter(|&(_, next)| inner(next) && grid[next.to_nd_index()] == Cell::Wall)
            .collect();

        match neighbors.choose(rng) {
            Some(&((dr, dc), next)) => {
                // The wall cell halfway is in bounds whenever `next` is.
                if let Some(between) = apply_delta(current, (dr / 2, dc / 2), bounds) {
                    grid[between.to_nd_index()] = Cell::Open;
                }
                grid[next.to_nd_index()] = Cell::Open;
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }

    let exit = (size - 2, size - 2);
    grid[exit.to_nd_index()] = Cell::Open;
    grid
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn reachable(maze: &Maze, from: Coord2, to: Coord2) -> bool {
        let bounds = maze.grid().bounds();
        let mut seen = Array2::from_elem(maze.grid().dim(), false);
        let mut queue = VecDeque::from([from]);
        seen[from.to_nd_index()] = true;
        while let Some(pos) = queue.pop_front() {
            if pos == to {
                return true;
            }
            for dir in Direction::ALL {
                if let Some(next) = apply_delta(pos, dir.delta(), bounds)
                    && maze.is_open(next)
                    && !seen[next.to_nd_index()]
                {
                    seen[next.to_nd_index()] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    #[test]
    fn start_always_connects_to_exit() {
        for seed in 0..32 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let maze = Maze::generate(MazeConfig::default(), &mut rng);

            assert_eq!(maze.size(), 17);
            assert_eq!(maze.exit(), (15, 15));
            assert!(reachable(&maze, START, maze.exit()), "seed {seed}");
        }
    }

    #[test]
    fn border_stays_walled() {
        let mut rng = SmallRng::seed_from_u64(5);
        let maze = Maze::generate(MazeConfig::default(), &mut rng);
        let last = maze.size() - 1;

        for i in 0..=last {
            assert!(!maze.is_open((0, i)));
            assert!(!maze.is_open((last, i)));
            assert!(!maze.is_open((i, 0)));
            assert!(!maze.is_open((i, last)));
        }
    }

    #[test]
    fn every_odd_cell_is_carved() {
        let mut rng = SmallRng::seed_from_u64(9);
        let maze = Maze::generate(MazeConfig { size: 11 }, &mut rng);

        for r in (1..11).step_by(2) {
            for c in (1..11).step_by(2) {
                assert!(maze.is_open((r, c)));
            }
        }
    }

    #[test]
    fn walls_block_and_exit_wins() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut maze = Maze::generate(MazeConfig { size: 5 }, &mut rng);

        assert_eq!(maze.step(Direction::Up), Err(GameError::IllegalMove));

        // Walk to the exit along any open route.
        let path = [Direction::Right, Direction::Right, Direction::Down, Direction::Down];
        let alt = [Direction::Down, Direction::Down, Direction::Right, Direction::Right];
        let route = if maze.is_open((1, 2)) && maze.is_open((2, 3)) { path } else { alt };
        for (i, dir) in route.into_iter().enumerate() {
            let outcome = maze.step(dir).unwrap();
            if i == 3 {
                assert_eq!(outcome, StepOutcome::Escaped);
            }
        }
        assert_eq!(maze.step(Direction::Up), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn largest_maze_still_connects() {
        let mut rng = SmallRng::seed_from_u64(0);
        let maze = Maze::generate(MazeConfig { size: Coord::MAX }, &mut rng);

        assert_eq!(maze.size(), 255);
        assert_eq!(maze.exit(), (253, 253));
        assert!(reachable(&maze, START, maze.exit()));
    }

    #[test]
    fn even_size_is_rounded_down() {
        let mut rng = SmallRng::seed_from_u64(0);
        let maze = Maze::generate(MazeConfig { size: 12 }, &mut rng);

        assert_eq!(maze.size(), 11);
    }
}
