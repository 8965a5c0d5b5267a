use std::fmt;

use crate::{col, row, Board};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Heuristic {
    Misplaced,
    Manhattan,
}

impl Heuristic {
    pub const ALL: [Self; 2] = [Self::Misplaced, Self::Manhattan];

    pub fn estimate(self, board: &Board) -> u32 {
        match self {
            Self::Misplaced => misplaced(board),
            Self::Manhattan => manhattan(board),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Misplaced => "H1",
            Self::Manhattan => "H2",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

fn placed_tiles(board: &Board) -> impl Iterator<Item = (usize, usize)> + '_ {
    board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != 0)
        .map(|(idx, &tile)| (idx, tile as usize))
}

pub fn misplaced(board: &Board) -> u32 {
    placed_tiles(board).filter(|(idx, tile)| idx != tile).count() as u32
}

pub fn manhattan(board: &Board) -> u32 {
    placed_tiles(board)
        .map(|(idx, tile)| row(idx).abs_diff(row(tile)) + col(idx).abs_diff(col(tile)))
        .sum::<usize>() as u32
}
