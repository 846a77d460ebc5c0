use std::{
    fmt::{self, Display, Formatter},
    iter::{once, repeat},
    str::FromStr,
};

use thiserror::Error;

use crate::{
    board::Board,
    coord::{Coord, home_rank, pawn_home_rank, pawn_promotion_rank},
    piece::{ParsePieceKindError, Piece, PieceKind},
    team::{ParseTeamError, Team},
};

/// Piece placement plus side to move, written rank 8 first:
/// `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    pub grid: [[Option<Piece>; 8]; 8],
    pub turn: Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseLayoutError {
    #[error("a row has fewer than 8 squares")]
    NotEnoughSquaresOnRow,
    #[error("a row has more than 8 squares")]
    ExceedingSquaresOnRow,
    #[error("{0}")]
    InvalidPiece(#[from] ParsePieceKindError),
    #[error("{0}")]
    InvalidTeam(#[from] ParseTeamError),
    #[error("unexpected `{0}`")]
    UnexpectedChar(char),
    #[error("unexpected end of layout")]
    UnexpectedEol,
    #[error("{0} pawn on its promotion rank at {1}")]
    PawnOnPromotionRank(Team, Coord),
    #[error("{0} has more than one king")]
    ExtraKing(Team),
}
impl Layout {
    pub fn from_board(board: &Board) -> Self {
        Layout {
            grid: *board.grid(),
            turn: board.current_team_turn(),
        }
    }
    pub fn into_board(self) -> Board {
        Board::from_grid(self.grid, self.turn)
    }
}
/// Whether a piece found on `position` could still be in its starting spot.
fn unmoved(piece: Piece, position: Coord) -> bool {
    let home = home_rank(piece.team);
    match piece.kind {
        PieceKind::Pawn => position.y() == pawn_home_rank(piece.team),
        PieceKind::King => position.y() == home && position.x() == 4,
        PieceKind::Rook => position.y() == home && matches!(position.x(), 0 | 7),
        PieceKind::Bishop | PieceKind::Knight | PieceKind::Queen => position.y() == home,
    }
}
impl FromStr for Layout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (placement, turn) = s
            .trim()
            .split_once(' ')
            .ok_or(ParseLayoutError::UnexpectedEol)?;
        let turn = turn.trim().parse::<Team>()?;
        let mut grid = [[None; 8]; 8];
        let mut kings = [false; 2];
        let mut rows = placement.split('/');
        for y in (0..8).rev() {
            let row = rows.next().ok_or(ParseLayoutError::UnexpectedEol)?;
            let mut x: u8 = 0;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10).filter(|skip| (1..=8).contains(skip)) {
                    x = x
                        .checked_add(skip as u8)
                        .filter(|x| *x <= 8)
                        .ok_or(ParseLayoutError::ExceedingSquaresOnRow)?;
                    continue;
                }
                if x >= 8 {
                    return Err(ParseLayoutError::ExceedingSquaresOnRow);
                }
                let position = Coord::new(x, y);
                let piece = Piece::from_layout_char(c)?;
                if piece.kind == PieceKind::Pawn && y == pawn_promotion_rank(piece.team) {
                    return Err(ParseLayoutError::PawnOnPromotionRank(piece.team, position));
                }
                if piece.kind == PieceKind::King {
                    let seen = &mut kings[piece.team as usize];
                    if *seen {
                        return Err(ParseLayoutError::ExtraKing(piece.team));
                    }
                    *seen = true;
                }
                grid[y as usize][x as usize] = Some(if unmoved(piece, position) {
                    piece
                } else {
                    piece.to_moved()
                });
                x += 1;
            }
            if x < 8 {
                return Err(ParseLayoutError::NotEnoughSquaresOnRow);
            }
        }
        if rows.next().is_some() {
            return Err(ParseLayoutError::UnexpectedChar('/'));
        }
        Ok(Layout { grid, turn })
    }
}
impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (row, first) in self.grid.iter().rev().zip(once(true).chain(repeat(false))) {
            if !first {
                write!(f, "/")?;
            }
            let mut squares = row.iter().peekable();
            while let Some(square) = squares.next() {
                if let Some(piece) = square {
                    write!(f, "{}", piece.layout_char())?;
                } else {
                    let mut count = 1;
                    while squares.peek().is_some_and(|square| square.is_none()) {
                        squares.next();
                        count += 1;
                    }
                    write!(f, "{count}")?;
                }
            }
        }
        write!(f, " {}", self.turn.lowercase())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        coord,
        coord::Coord,
        layout::{Layout, ParseLayoutError},
        piece::ParsePieceKindError,
        team::Team,
    };

    const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

    #[test]
    fn starting_layout_matches_starting_position() {
        let board = STARTING.parse::<Layout>().unwrap().into_board();
        assert_eq!(board, Board::starting_position());
        assert_eq!(Layout::from_board(&board).to_string(), STARTING);
    }
    #[test]
    fn prints_what_it_parsed() {
        for layout in ["4k3/8/8/8/8/8/3q4/4K3 w", "r3k2r/8/8/3pP3/8/8/8/R3K2R b"] {
            assert_eq!(layout.parse::<Layout>().unwrap().to_string(), layout);
        }
    }
    #[test]
    fn infers_moved_flags() {
        let layout: Layout = "4k3/8/8/8/8/4P3/P7/R3K1R1 w".parse().unwrap();
        let moved = |position: Coord| {
            layout.grid[position.y() as usize][position.x() as usize]
                .unwrap()
                .moved
        };
        assert!(!moved(coord!("a2")));
        assert!(moved(coord!("e3")));
        assert!(!moved(coord!("a1")));
        assert!(moved(coord!("g1")));
        assert!(!moved(coord!("e1")));
        assert!(!moved(coord!("e8")));
        assert_eq!(layout.turn, Team::White);
    }
    #[test]
    fn rejects_bad_layouts() {
        assert_eq!(
            "4k3/8/8/8/8/8/8/4K2 w".parse::<Layout>(),
            Err(ParseLayoutError::NotEnoughSquaresOnRow)
        );
        assert_eq!(
            "4k3/8/8/8/8/8/8/4K4 w".parse::<Layout>(),
            Err(ParseLayoutError::ExceedingSquaresOnRow)
        );
        assert_eq!(
            "4k3/8/8/8/8/8/8 w".parse::<Layout>(),
            Err(ParseLayoutError::UnexpectedEol)
        );
        assert_eq!(
            "4k3/8/8/8/8/8/8/4K3".parse::<Layout>(),
            Err(ParseLayoutError::UnexpectedEol)
        );
        assert_eq!(
            "4k3/8/8/8/8/8/8/4X3 w".parse::<Layout>(),
            Err(ParseLayoutError::InvalidPiece(ParsePieceKindError('X')))
        );
        assert_eq!(
            "P3k3/8/8/8/8/8/8/4K3 w".parse::<Layout>(),
            Err(ParseLayoutError::PawnOnPromotionRank(Team::White, coord!("a8")))
        );
        assert_eq!(
            "4k2k/8/8/8/8/8/8/4K3 w".parse::<Layout>(),
            Err(ParseLayoutError::ExtraKing(Team::Black))
        );
        assert!(matches!(
            "4k3/8/8/8/8/8/8/4K3 x".parse::<Layout>(),
            Err(ParseLayoutError::InvalidTeam(_))
        ));
    }
    #[test]
    fn missing_king_is_accepted() {
        assert!("4k3/8/8/8/8/8/8/8 w".parse::<Layout>().is_ok());
    }
}
