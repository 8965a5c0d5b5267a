use std::fmt::Write;

use common::*;

mod common;

fn main() {
    run_tests("move", |content| {
        let (input, board) = parse_input(content)?;
        let mut got = format!("{input}\n\n{SEPARATOR}");
        for next in board.successors() {
            writeln!(got, "{next}").unwrap();
        }
        Ok(got)
    });
}
