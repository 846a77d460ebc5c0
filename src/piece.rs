use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::team::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Bishop,
    Knight,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const STARTING_CONFIGURATION: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    pub fn uppercase(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
    pub fn lowercase(self) -> char {
        self.uppercase().to_ascii_lowercase()
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error(
    "found `{0}`, expected one of `p`, `n`, `b`, `r`, `k`, `q`, or uppercase forms of these letters"
)]
pub struct ParsePieceKindError(pub char);

impl TryFrom<char> for PieceKind {
    type Error = ParsePieceKindError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let piece = match value {
            'p' | 'P' => PieceKind::Pawn,
            'n' | 'N' => PieceKind::Knight,
            'b' | 'B' => PieceKind::Bishop,
            'r' | 'R' => PieceKind::Rook,
            'q' | 'Q' => PieceKind::Queen,
            'k' | 'K' => PieceKind::King,
            c => return Err(ParsePieceKindError(c)),
        };
        Ok(piece)
    }
}

/// A piece standing on a square. Empty squares hold no `Piece` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub team: Team,
    pub moved: bool,
}
impl Piece {
    pub fn new(team: Team, kind: PieceKind) -> Self {
        Piece {
            kind,
            team,
            moved: false,
        }
    }
    pub fn is(self, team: Team, kind: PieceKind) -> bool {
        self.team == team && self.kind == kind
    }
    pub fn to_moved(self) -> Self {
        Piece {
            moved: true,
            ..self
        }
    }
    pub fn layout_char(self) -> char {
        match self.team {
            Team::White => self.kind.uppercase(),
            Team::Black => self.kind.lowercase(),
        }
    }
    pub fn from_layout_char(c: char) -> Result<Self, ParsePieceKindError> {
        let kind = PieceKind::try_from(c)?;
        let team = if c.is_ascii_uppercase() {
            Team::White
        } else {
            Team::Black
        };
        Ok(Piece::new(team, kind))
    }
    pub fn figurine(self) -> char {
        match (self.team, self.kind) {
            (Team::White, PieceKind::Pawn) => '♙',
            (Team::White, PieceKind::Knight) => '♘',
            (Team::White, PieceKind::Bishop) => '♗',
            (Team::White, PieceKind::Rook) => '♖',
            (Team::White, PieceKind::Queen) => '♕',
            (Team::White, PieceKind::King) => '♔',
            (Team::Black, PieceKind::Pawn) => '♟',
            (Team::Black, PieceKind::Knight) => '♞',
            (Team::Black, PieceKind::Bishop) => '♝',
            (Team::Black, PieceKind::Rook) => '♜',
            (Team::Black, PieceKind::Queen) => '♛',
            (Team::Black, PieceKind::King) => '♚',
        }
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.team, self.kind)?;
        Ok(())
    }
}
