//! Reading the operator's pick.

use std::io::BufRead;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("input closed before a selection was made")]
    InputClosed,

    #[error("could not read selection: {0}")]
    Read(String),

    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("{input} is out of range, pick a row between 1 and {count}")]
    OutOfRange { input: i64, count: usize },
}

/// Parses a 1-based row number out of `line` and returns the 0-based index.
/// Only the first whitespace-separated token counts.
pub fn parse_selection(line: &str, count: usize) -> Result<usize, SelectionError> {
    let token = line.split_whitespace().next().unwrap_or_default();
    let input: i64 = token
        .parse()
        .map_err(|_| SelectionError::NotANumber(token.to_string()))?;

    match usize::try_from(input) {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(SelectionError::OutOfRange { input, count }),
    }
}

/// Reads one line from `input` and parses it with [`parse_selection`].
pub fn read_selection<R: BufRead>(mut input: R, count: usize) -> Result<usize, SelectionError> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Err(SelectionError::InputClosed),
        Ok(_) => parse_selection(&line, count),
        Err(e) => Err(SelectionError::Read(e.to_string())),
    }
}
