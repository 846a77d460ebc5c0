use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::{
    board::Board,
    coord::{Coord, ParseCoordError, pawn_promotion_rank},
    piece::{Piece, PieceKind},
};

/// A piece removed by an action, and where it stood. For en passant this
/// differs from the capturing piece's destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture {
    pub piece: Piece,
    pub position: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Toward the a-file rook.
    Long,
    /// Toward the h-file rook.
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Castle {
    pub side: CastleSide,
    pub rook: Piece,
    pub origin: Coord,
    pub destination: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    Capture(Capture),
    Promotion,
    CapturePromotion(Capture),
    Castle(Castle),
}

/// One complete, reversible board transition.
///
/// `piece` is the acting piece exactly as it stood on `origin` before the
/// action, including its `moved` flag, which is what lets [`Action::reverse`]
/// restore the board bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    piece: Piece,
    origin: Coord,
    destination: Coord,
    kind: ActionKind,
}
impl Action {
    /// Plain move, promoting when a pawn reaches its last rank.
    pub(crate) fn movement(piece: Piece, origin: Coord, destination: Coord) -> Self {
        let kind = if promotes(piece, destination) {
            ActionKind::Promotion
        } else {
            ActionKind::Move
        };
        Action {
            piece,
            origin,
            destination,
            kind,
        }
    }
    pub(crate) fn capture(
        piece: Piece,
        origin: Coord,
        destination: Coord,
        capture: Capture,
    ) -> Self {
        debug_assert_ne!(piece.team, capture.piece.team);
        let kind = if promotes(piece, destination) {
            ActionKind::CapturePromotion(capture)
        } else {
            ActionKind::Capture(capture)
        };
        Action {
            piece,
            origin,
            destination,
            kind,
        }
    }
    pub(crate) fn castle(king: Piece, origin: Coord, destination: Coord, castle: Castle) -> Self {
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(castle.rook.kind, PieceKind::Rook);
        assert_eq!(king.team, castle.rook.team);
        assert_ne!(destination, castle.destination);
        Action {
            piece: king,
            origin,
            destination,
            kind: ActionKind::Castle(castle),
        }
    }
    pub fn piece(&self) -> Piece {
        self.piece
    }
    pub fn origin(&self) -> Coord {
        self.origin
    }
    pub fn destination(&self) -> Coord {
        self.destination
    }
    pub fn kind(&self) -> ActionKind {
        self.kind
    }
    pub fn captured(&self) -> Option<Capture> {
        match self.kind {
            ActionKind::Capture(capture) | ActionKind::CapturePromotion(capture) => Some(capture),
            ActionKind::Move | ActionKind::Promotion | ActionKind::Castle(_) => None,
        }
    }
    pub fn is_capture(&self) -> bool {
        self.captured().is_some()
    }
    pub fn is_promotion(&self) -> bool {
        matches!(
            self.kind,
            ActionKind::Promotion | ActionKind::CapturePromotion(_)
        )
    }
    pub fn castle_rook(&self) -> Option<Castle> {
        match self.kind {
            ActionKind::Castle(castle) => Some(castle),
            _ => None,
        }
    }
    /// A never-moved pawn advancing two rows, the only action that opens an
    /// en passant window.
    pub fn is_pawn_double_step(&self) -> bool {
        self.piece.kind == PieceKind::Pawn
            && !self.piece.moved
            && self.kind == ActionKind::Move
            && (self.destination - self.origin).y.abs() == 2
    }
    /// The piece standing on the destination once the action is applied.
    pub fn placed_piece(&self) -> Piece {
        if self.is_promotion() {
            Piece::new(self.piece.team, PieceKind::Queen).to_moved()
        } else {
            self.piece.to_moved()
        }
    }
    pub fn as_lan(&self) -> Lan {
        Lan {
            origin: self.origin,
            destination: self.destination,
        }
    }
    pub(crate) fn apply(&self, board: &mut Board) {
        assert_eq!(
            board[self.origin],
            Some(self.piece),
            "{self} applied to a board without its piece"
        );
        if let Some(capture) = self.captured() {
            assert_eq!(board[capture.position], Some(capture.piece));
            board.set(capture.position, None);
        }
        board.set(self.origin, None);
        board.set(self.destination, Some(self.placed_piece()));
        if let ActionKind::Castle(castle) = self.kind {
            assert_eq!(board[castle.origin], Some(castle.rook));
            board.set(castle.origin, None);
            board.set(castle.destination, Some(castle.rook.to_moved()));
        }
    }
    pub(crate) fn reverse(&self, board: &mut Board) {
        assert_eq!(
            board[self.destination],
            Some(self.placed_piece()),
            "{self} reversed without being applied"
        );
        board.set(self.destination, None);
        board.set(self.origin, Some(self.piece));
        if let Some(capture) = self.captured() {
            board.set(capture.position, Some(capture.piece));
        }
        if let ActionKind::Castle(castle) = self.kind {
            board.set(castle.destination, None);
            board.set(castle.origin, Some(castle.rook));
        }
    }
}
fn promotes(piece: Piece, destination: Coord) -> bool {
    piece.kind == PieceKind::Pawn && destination.y() == pawn_promotion_rank(piece.team)
}
impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let separator = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{separator}{}", self.piece.kind.uppercase(), self.origin, self.destination)?;
        match self.kind {
            ActionKind::Promotion | ActionKind::CapturePromotion(_) => write!(f, "=Q")?,
            ActionKind::Castle(Castle {
                side: CastleSide::Long,
                ..
            }) => write!(f, " (O-O-O)")?,
            ActionKind::Castle(Castle {
                side: CastleSide::Short,
                ..
            }) => write!(f, " (O-O)")?,
            ActionKind::Move | ActionKind::Capture(_) => (),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseLanError {
    #[error("provided string contains invalid character")]
    InvalidChar,
    #[error("{0}")]
    ParseCoordError(#[from] ParseCoordError),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

/// Long algebraic notation without a promotion suffix, since pawns always
/// promote to a queen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lan {
    pub origin: Coord,
    pub destination: Coord,
}
impl Display for Lan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        Ok(())
    }
}
impl std::str::FromStr for Lan {
    type Err = ParseLanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let origin = s.get(0..2).ok_or(ParseLanError::InvalidChar)?.parse()?;
        let destination = s.get(2..4).ok_or(ParseLanError::InvalidChar)?.parse()?;
        if let Some(c) = s.get(4..).and_then(|rest| rest.chars().next()) {
            return Err(ParseLanError::Unexpected(c));
        }
        Ok(Lan {
            origin,
            destination,
        })
    }
}
