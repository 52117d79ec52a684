use std::io::{self, BufRead};

use thiserror::Error;

use crate::common::{Grid, P};
use crate::pipe::BoardError;

/// The type for errors occurring in reading grid data.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid format")]
    InvalidFormat,
    #[error("invalid value {0:?}")]
    InvalidValue(String),
    #[error(transparent)]
    InvalidBoard(#[from] BoardError),
}

fn is_comment(s: &str) -> bool {
    s.trim_start().starts_with('%')
}

/// Reads the next line that is neither blank nor a `%` comment into `buf`.
pub fn next_valid_line<R: BufRead + ?Sized>(reader: &mut R, buf: &mut String) -> io::Result<usize> {
    loop {
        buf.clear();
        let len = reader.read_line(buf)?;

        if len == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "grid ended early"));
        }

        if !buf.trim().is_empty() && !is_comment(buf) {
            return Ok(len);
        }
    }
}

/// Largest height or width `read_grid` accepts.
pub const MAX_GRID_DIMENSION: i32 = 1024;

fn parse_dimension(token: Option<&str>) -> Result<i32, ReadError> {
    let token = token.ok_or(ReadError::InvalidFormat)?;
    match token.parse::<i32>() {
        Ok(n) if 0 < n && n <= MAX_GRID_DIMENSION => Ok(n),
        _ => Err(ReadError::InvalidValue(token.to_string())),
    }
}

/// Reads a `height width` header followed by `height` rows of space separated tokens.
pub fn read_grid<R, F, T>(reader: &mut R, converter: F, default: T) -> Result<Grid<T>, ReadError>
where
    R: BufRead + ?Sized,
    F: Fn(&str) -> Result<T, ReadError>,
    T: Clone,
{
    let mut buffer = String::new();

    next_valid_line(reader, &mut buffer)?;
    let mut header = buffer.split_whitespace();
    let height = parse_dimension(header.next())?;
    let width = parse_dimension(header.next())?;

    let mut ret = Grid::new(height, width, default);

    for y in 0..height {
        next_valid_line(reader, &mut buffer)?;
        let mut row = buffer.split_whitespace();

        for x in 0..width {
            let elem = row.next().ok_or(ReadError::InvalidFormat)?;
            ret[P(y, x)] = converter(elem)?;
        }
        if row.next().is_some() {
            return Err(ReadError::InvalidFormat);
        }
    }

    Ok(ret)
}

/// Inverse of `read_grid`.
pub fn write_grid<T, F>(grid: &Grid<T>, mut converter: F) -> String
where
    T: Clone,
    F: FnMut(&T) -> String,
{
    let mut ret = format!("{} {}\n", grid.height(), grid.width());
    for y in 0..grid.height() {
        let row = (0..grid.width())
            .map(|x| converter(&grid[P(y, x)]))
            .collect::<Vec<_>>();
        ret.push_str(&row.join(" "));
        ret.push('\n');
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_grid() {
        let mut src = "
3 4
% this line is a comment!
1 2 3 4
x y z w
p q r s
"
        .as_bytes();
        let grid = read_grid(&mut src, |s| Ok(s.to_string()), String::new()).unwrap();

        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid[P(1, 2)], "z".to_string());

        assert_eq!(write_grid(&grid, |s| s.clone()), "3 4\n1 2 3 4\nx y z w\np q r s\n");
    }

    #[test]
    fn test_read_grid_errors() {
        let parse = |src: &str| read_grid(&mut src.as_bytes(), |s| Ok(s.to_string()), String::new());

        assert!(matches!(parse("2 x\n"), Err(ReadError::InvalidValue(ref s)) if s == "x"));
        assert!(matches!(parse("0 2\n"), Err(ReadError::InvalidValue(_))));
        assert!(matches!(parse("2\n"), Err(ReadError::InvalidFormat)));
        assert!(matches!(parse("1 2\na\n"), Err(ReadError::InvalidFormat)));
        assert!(matches!(parse("1 2\na b c\n"), Err(ReadError::InvalidFormat)));
        assert!(matches!(parse("2 1\na\n"), Err(ReadError::Io(_))));
    }

    #[test]
    fn test_read_grid_rejects_huge_dimensions() {
        let parse = |src: &str| read_grid(&mut src.as_bytes(), |s| Ok(s.to_string()), String::new());

        assert!(matches!(parse("50000 50000\na\n"), Err(ReadError::InvalidValue(ref s)) if s == "50000"));
        assert!(matches!(parse("1 1025\na\n"), Err(ReadError::InvalidValue(_))));
        assert!(matches!(parse("99999999999 1\n"), Err(ReadError::InvalidValue(_))));
        // the largest allowed header is accepted, then the rows run out
        assert!(matches!(parse("1 1024\n"), Err(ReadError::Io(_))));
    }
}
