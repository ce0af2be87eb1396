//! Picture jigsaw: a sliding puzzle over a sliced photo, with levels.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sliding::{Goal, SlideOutcome, SlidingPuzzle};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub images: [&'static str; 5],
}

pub const CATEGORIES: [Category; 5] = [
    Category {
        id: "beaches",
        name: "Beaches",
        images: [
            "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?w=800&q=80",
            "https://images.unsplash.com/photo-1519046904884-53103b34b206?w=800&q=80",
            "https://images.unsplash.com/photo-1473496169904-658ba7c44d8a?w=800&q=80",
            "https://images.unsplash.com/photo-1506929199175-6090a78713d3?w=800&q=80",
            "https://images.unsplash.com/photo-1520483601560-389dff434f1c?w=800&q=80",
        ],
    },
    Category {
        id: "landscapes",
        name: "Landscapes",
        images: [
            "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b?w=800&q=80",
            "https://images.unsplash.com/photo-1472214103451-9374bd1c798e?w=800&q=80",
            "https://images.unsplash.com/photo-1501785888041-af3ef285b470?w=800&q=80",
            "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=800&q=80",
            "https://images.unsplash.com/photo-1506744038136-46273834b3fb?w=800&q=80",
        ],
    },
    Category {
        id: "countries",
        name: "Countries",
        images: [
            "https://images.unsplash.com/photo-1523906834658-6e24ef2386f9?w=800&q=80",
            "https://images.unsplash.com/photo-1502602898657-3e91760cbb34?w=800&q=80",
            "https://images.unsplash.com/photo-1513635269975-59663e0ac1ad?w=800&q=80",
            "https://images.unsplash.com/photo-1493976040374-85c8e12f0c0e?w=800&q=80",
            "https://images.unsplash.com/photo-1533929736458-ca588d08c8be?w=800&q=80",
        ],
    },
    Category {
        id: "cars",
        name: "Cars",
        images: [
            "https://images.unsplash.com/photo-1503376780353-7e6692767b70?w=800&q=80",
            "https://images.unsplash.com/photo-1583121274602-3e2820c69888?w=800&q=80",
            "https://images.unsplash.com/photo-1494976388531-d1058494cdd8?w=800&q=80",
            "https://images.unsplash.com/photo-1525609004556-c46c7d6cf048?w=800&q=80",
            "https://images.unsplash.com/photo-1552519507-da3b142c6e3d?w=800&q=80",
        ],
    },
    Category {
        id: "pets",
        name: "Pets",
        images: [
            "https://images.unsplash.com/photo-1543466835-00a7907e9de1?w=800&q=80",
            "https://images.unsplash.com/photo-1517849845537-4d257902454a?w=800&q=80",
            "https://images.unsplash.com/photo-1583511655857-d19b40a7a54e?w=800&q=80",
            "https://images.unsplash.com/photo-1537151608828-ea2b11777ee8?w=800&q=80",
            "https://images.unsplash.com/photo-1514888286974-6c03e2ca1dba?w=800&q=80",
        ],
    },
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Selection,
    ImageSelection { category: usize },
    Playing { category: usize, image: usize },
    Won { category: usize, image: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jigsaw {
    level: u32,
    stage: Stage,
    puzzle: SlidingPuzzle,
}

impl Default for Jigsaw {
    fn default() -> Self {
        Self::new()
    }
}

impl Jigsaw {
    pub fn new() -> Self {
        let level = 1;
        Self {
            level,
            stage: Stage::Selection,
            puzzle: SlidingPuzzle::new(grid_size(level), Goal::HoleFirst),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn grid_size(&self) -> Coord {
        grid_size(self.level)
    }

    pub fn puzzle(&self) -> &SlidingPuzzle {
        &self.puzzle
    }

    pub fn image_url(&self) -> Option<&'static str> {
        match self.stage {
            Stage::Playing { category, image } | Stage::Won { category, image } => {
                CATEGORIES.get(category)?.images.get(image).copied()
            }
            _ => None,
        }
    }

    pub fn choose_category(&mut self, category: usize) -> Result<()> {
        if category >= CATEGORIES.len() {
            return Err(GameError::UnknownItem);
        }
        match self.stage {
            Stage::Selection | Stage::ImageSelection { .. } => {
                self.stage = Stage::ImageSelection { category };
                Ok(())
            }
            _ => Err(GameError::WrongPhase),
        }
    }

    /// Starts a game on the picked image, scrambling the grid for the level.
    pub fn choose_image<R: Rng + ?Sized>(&mut self, image: usize, rng: &mut R) -> Result<()> {
        let Stage::ImageSelection { category } = self.stage else {
            return Err(GameError::WrongPhase);
        };
        if image >= CATEGORIES[category].images.len() {
            return Err(GameError::UnknownItem);
        }

        let mut puzzle = SlidingPuzzle::new(self.grid_size(), Goal::HoleFirst);
        puzzle.scramble(rng, scramble_moves(self.level));
        self.puzzle = puzzle;
        self.stage = Stage::Playing { category, image };
        log::debug!(
            "jigsaw: level {} on {}/{}",
            self.level,
            CATEGORIES[category].id,
            image
        );
        Ok(())
    }

    pub fn slide(&mut self, index: usize) -> Result<SlideOutcome> {
        let Stage::Playing { category, image } = self.stage else {
            return Err(GameError::WrongPhase);
        };
        let outcome = self.puzzle.slide(index)?;
        if outcome == SlideOutcome::Solved {
            self.stage = Stage::Won { category, image };
        }
        Ok(outcome)
    }

    /// Back to category selection, keeping the current level.
    pub fn back_to_selection(&mut self) {
        self.stage = Stage::Selection;
    }

    pub fn next_level(&mut self) -> Result<()> {
        if !matches!(self.stage, Stage::Won { .. }) {
            return Err(GameError::WrongPhase);
        }
        self.level += 1;
        self.stage = Stage::Selection;
        Ok(())
    }

    /// CSS `background-position` percentages for a tile value, so that each
    /// tile shows its own slice of the picture.
    pub fn background_offset(&self, tile: u8) -> (f32, f32) {
        let size = self.grid_size();
        let last = f32::from(size - 1);
        let row = tile / size;
        let col = tile % size;
        (f32::from(col) / last * 100.0, f32::from(row) / last * 100.0)
    }
}

pub fn grid_size(level: u32) -> Coord {
    2 + level.min(3) as Coord
}

pub fn scramble_moves(level: u32) -> usize {
    100 + 50 * level as usize
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn grid_grows_with_level_up_to_five() {
        assert_eq!(grid_size(1), 3);
        assert_eq!(grid_size(2), 4);
        assert_eq!(grid_size(3), 5);
        assert_eq!(grid_size(9), 5);
        assert_eq!(scramble_moves(2), 200);
    }

    #[test]
    fn flow_through_selection_to_play() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut jigsaw = Jigsaw::new();

        assert_eq!(jigsaw.choose_image(0, &mut rng), Err(GameError::WrongPhase));
        jigsaw.choose_category(4).unwrap();
        jigsaw.choose_image(2, &mut rng).unwrap();

        assert_eq!(
            jigsaw.stage(),
            Stage::Playing {
                category: 4,
                image: 2
            }
        );
        assert_eq!(jigsaw.image_url(), Some(CATEGORIES[4].images[2]));
        assert_eq!(jigsaw.puzzle().tiles().len(), 9);
        assert!(!jigsaw.puzzle().is_solved());
        assert!(jigsaw.puzzle().is_solvable());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut jigsaw = Jigsaw::new();

        assert_eq!(jigsaw.choose_category(5), Err(GameError::UnknownItem));
    }

    #[test]
    fn solving_wins_and_next_level_grows_grid() {
        let mut jigsaw = Jigsaw::new();
        jigsaw.stage = Stage::Playing {
            category: 0,
            image: 0,
        };
        jigsaw.puzzle =
            SlidingPuzzle::from_tiles(3, Goal::HoleFirst, vec![1, 0, 2, 3, 4, 5, 6, 7, 8])
                .unwrap();

        assert_eq!(jigsaw.next_level(), Err(GameError::WrongPhase));
        assert_eq!(jigsaw.slide(0).unwrap(), SlideOutcome::Solved);
        assert!(matches!(jigsaw.stage(), Stage::Won { .. }));

        jigsaw.next_level().unwrap();
        assert_eq!(jigsaw.level(), 2);
        assert_eq!(jigsaw.grid_size(), 4);
        assert_eq!(jigsaw.stage(), Stage::Selection);
    }

    #[test]
    fn background_offsets_span_the_image() {
        let jigsaw = Jigsaw::new();

        assert_eq!(jigsaw.background_offset(0), (0.0, 0.0));
        assert_eq!(jigsaw.background_offset(5), (100.0, 50.0));
        assert_eq!(jigsaw.background_offset(8), (100.0, 100.0));
    }
}
