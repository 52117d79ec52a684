use std::io::BufRead;

use super::*;
use crate::io::{read_grid, write_grid, ReadError};

/// Parses one cell token: `S`, `E`, `I<r>` (straight) or `L<r>` (corner).
pub fn parse_tile(token: &str) -> Result<Tile, ReadError> {
    let invalid = || ReadError::InvalidValue(token.to_string());
    let mut chars = token.chars();
    let kind = match chars.next() {
        Some('S') => PipeKind::Start,
        Some('E') => PipeKind::End,
        Some('I') => PipeKind::Straight,
        Some('L') => PipeKind::Corner,
        _ => return Err(invalid()),
    };
    let rest = chars.as_str();
    if kind.is_terminal() {
        return if rest.is_empty() {
            Ok(if kind == PipeKind::Start {
                Tile::start()
            } else {
                Tile::end()
            })
        } else {
            Err(invalid())
        };
    }
    match rest.parse::<u8>() {
        Ok(rotation) if rotation < 4 => Ok(Tile::new(kind, rotation)),
        _ => Err(invalid()),
    }
}

pub fn tile_token(tile: &Tile) -> String {
    match tile.kind {
        PipeKind::Start => "S".to_string(),
        PipeKind::End => "E".to_string(),
        PipeKind::Straight => format!("I{}", tile.rotation),
        PipeKind::Corner => format!("L{}", tile.rotation),
    }
}

pub fn read_board<R: BufRead + ?Sized>(reader: &mut R) -> Result<Board, ReadError> {
    let tiles = read_grid(reader, parse_tile, Tile::straight(0))?;
    Ok(Board::from_tiles(tiles)?)
}

pub fn write_board(board: &Board) -> String {
    write_grid(board.tiles(), tile_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::P;

    #[test]
    fn test_parse_tile() {
        assert_eq!(parse_tile("S").unwrap(), Tile::start());
        assert_eq!(parse_tile("E").unwrap(), Tile::end());
        assert_eq!(parse_tile("I1").unwrap(), Tile::straight(1));
        assert_eq!(parse_tile("L3").unwrap(), Tile::corner(3));

        for bad in &["", "S1", "I", "I4", "L-1", "X0", "l2"] {
            assert!(matches!(parse_tile(bad), Err(ReadError::InvalidValue(_))), "{}", bad);
        }
    }

    #[test]
    fn test_read_board() {
        let src = "
% single corner fixture
3 3
S  L2 I0
I0 L0 E
I0 I0 I0
";
        let board = read_board(&mut src.as_bytes()).unwrap();
        assert_eq!(board.start(), P(0, 0));
        assert_eq!(board.end(), P(1, 2));
        assert_eq!(board.flow_path(), Some(vec![P(0, 0), P(0, 1), P(1, 1), P(1, 2)]));

        assert_eq!(write_board(&board), "3 3\nS L2 I0\nI0 L0 E\nI0 I0 I0\n");
    }

    #[test]
    fn test_read_board_invalid() {
        let err = read_board(&mut "2 2\nI0 S\nI0 E\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReadError::InvalidBoard(BoardError::MisplacedStart(P(0, 1)))));

        let err = read_board(&mut "2 3\nS I0 E\nI0 I0 I0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReadError::InvalidBoard(BoardError::NotSquare { .. })));

        let err = read_board(&mut "2 2\nS Q\nI0 E\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "invalid value \"Q\"");
    }
}
