use std::ops::Index;

use arrayvec::ArrayVec;

pub mod bench;
mod fmt;
pub mod generate;
pub mod heuristic;
mod parse;
pub mod solve;

pub use fmt::Grid;
pub use heuristic::Heuristic;
pub use parse::ParseBoardError;
pub use solve::{solve, Solution, SolveError};

pub const SIDE: usize = 3;
pub const CELLS: usize = SIDE * SIDE;

// Cells reachable by one slide from each cell.
const ADJACENT: [&[u8]; CELLS] = [
    &[1, 3],
    &[0, 2, 4],
    &[1, 5],
    &[0, 4, 6],
    &[1, 3, 5, 7],
    &[2, 4, 8],
    &[3, 7],
    &[4, 6, 8],
    &[5, 7],
];

// `tiles` is always a permutation of `0..9`, row-major, 0 for the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Board {
    tiles: [u8; CELLS],
    blank: u8,
}

impl Index<usize> for Board {
    type Output = u8;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.tiles[idx]
    }
}

pub fn row(idx: usize) -> usize {
    idx / SIDE
}

pub fn col(idx: usize) -> usize {
    idx % SIDE
}

pub fn neighbours(idx: usize) -> impl Iterator<Item = usize> {
    ADJACENT[idx].iter().map(|&i| i as usize)
}

impl Board {
    pub const GOAL: Self = Self {
        tiles: [0, 1, 2, 3, 4, 5, 6, 7, 8],
        blank: 0,
    };

    pub(crate) fn new_unchecked(tiles: [u8; CELLS]) -> Self {
        debug_assert!(parse::check_permutation(&tiles).is_ok());
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or_default() as u8;
        Self { tiles, blank }
    }

    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    pub fn blank(&self) -> usize {
        self.blank as usize
    }

    pub fn is_goal(&self) -> bool {
        self.tiles.iter().zip(0..).all(|(&tile, i)| tile == i)
    }

    pub fn inversions(&self) -> usize {
        let tiles = self
            .tiles
            .iter()
            .copied()
            .filter(|&t| t != 0)
            .collect::<ArrayVec<u8, CELLS>>();
        tiles
            .iter()
            .enumerate()
            .map(|(i, &a)| tiles[i + 1..].iter().filter(|&&b| a > b).count())
            .sum()
    }

    pub fn is_solvable(&self) -> bool {
        self.inversions() % 2 == 0
    }

    fn swap_blank(&self, from: usize) -> Self {
        let mut tiles = self.tiles;
        tiles.swap(self.blank(), from);
        Self {
            tiles,
            blank: from as u8,
        }
    }

    pub fn successors(&self) -> ArrayVec<Self, 4> {
        neighbours(self.blank())
            .map(|from| self.swap_blank(from))
            .collect()
    }
}
