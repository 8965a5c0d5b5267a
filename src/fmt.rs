use std::fmt;

use crate::{Board, Solution, SIDE};

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for tile in self.tiles() {
            write!(f, "{tile}")?;
        }
        f.write_str("]")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Grid<'a>(pub &'a Board);

impl Board {
    pub fn grid(&self) -> Grid<'_> {
        Grid(self)
    }
}

impl fmt::Display for Grid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, i) in self.0.tiles().chunks(SIDE).zip(0..) {
            if i != 0 {
                f.write_str("\n")?;
            }
            for (&tile, j) in row.iter().zip(0..) {
                if j != 0 {
                    f.write_str(" ")?;
                }
                match tile {
                    0 => f.write_str(".")?,
                    _ => write!(f, "{tile}")?,
                }
            }
        }
        Ok(())
    }
}

// `Depth0-[..] -> Depth1-[..] -> ...`, wrapped before every fourth depth.
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (board, depth) in self.path.iter().zip(0..) {
            if depth != 0 && depth % 4 == 0 {
                f.write_str("\n")?;
            }
            write!(f, "Depth{depth}-{board} -> ")?;
        }
        write!(f, "Solved Puzzle at Depth {}", self.depth())
    }
}
