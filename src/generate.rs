use rand::seq::SliceRandom;
use rand::Rng;

use crate::Board;

// Rejection sampling keeps the draw uniform over solvable non-goal boards.
pub fn random_board(rng: &mut impl Rng) -> Board {
    let mut tiles = *Board::GOAL.tiles();
    loop {
        tiles.shuffle(rng);
        let board = Board::new_unchecked(tiles);
        if board.is_solvable() && !board.is_goal() {
            return board;
        }
    }
}

pub fn random_boards(rng: &mut impl Rng, count: usize) -> Vec<Board> {
    (0..count).map(|_| random_board(rng)).collect()
}
