use std::str::FromStr;

use thiserror::Error;

use crate::{Board, CELLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("expecting 9 tiles, got {0}")]
    WrongLength(usize),
    #[error("invalid tile {0:?}, expecting a digit 0-8")]
    InvalidDigit(char),
    #[error("tile {0} out of range 0-8")]
    OutOfRange(u8),
    #[error("duplicate tile {0}")]
    DuplicateTile(u8),
}

pub(crate) fn check_permutation(tiles: &[u8; CELLS]) -> Result<(), ParseBoardError> {
    let mut seen = [false; CELLS];
    for &tile in tiles {
        let slot = seen
            .get_mut(tile as usize)
            .ok_or(ParseBoardError::OutOfRange(tile))?;
        if *slot {
            return Err(ParseBoardError::DuplicateTile(tile));
        }
        *slot = true;
    }
    Ok(())
}

impl TryFrom<[u8; CELLS]> for Board {
    type Error = ParseBoardError;

    fn try_from(tiles: [u8; CELLS]) -> Result<Self, Self::Error> {
        check_permutation(&tiles)?;
        Ok(Self::new_unchecked(tiles))
    }
}

// Nine digits, row-major, 0 for the blank.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let len = s.chars().count();
        if len != CELLS {
            return Err(ParseBoardError::WrongLength(len));
        }

        let mut tiles = [0u8; CELLS];
        for (tile, ch) in tiles.iter_mut().zip(s.chars()) {
            *tile = match ch {
                '0'..='8' => ch as u8 - b'0',
                _ => return Err(ParseBoardError::InvalidDigit(ch)),
            };
        }
        tiles.try_into()
    }
}
