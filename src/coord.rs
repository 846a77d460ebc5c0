use std::{
    fmt::{self, Display, Formatter},
    num::NonZero,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use thiserror::Error;

use crate::{team::Team, topology};

#[macro_export]
macro_rules! coord_x {
    ("a") => {
        0
    };
    ("b") => {
        1
    };
    ("c") => {
        2
    };
    ("d") => {
        3
    };
    ("e") => {
        4
    };
    ("f") => {
        5
    };
    ("g") => {
        6
    };
    ("h") => {
        7
    };
}
#[macro_export]
macro_rules! coord_y {
    ("1") => {
        0
    };
    ("2") => {
        1
    };
    ("3") => {
        2
    };
    ("4") => {
        3
    };
    ("5") => {
        4
    };
    ("6") => {
        5
    };
    ("7") => {
        6
    };
    ("8") => {
        7
    };
}
/// Square from its name, checked at compile time: `coord!("e2")`.
#[macro_export]
macro_rules! coord {
    ($name:literal) => {
        const { $crate::coord::Coord::from_name($name) }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseCoordError {
    #[error("found `{0}`, characters from `a` to `h` were expected instead")]
    InvalidX(char),
    #[error("found `{0}`, characters from `1` to `8` were expected instead")]
    InvalidY(char),
    #[error("provided string have length of {0} characters, 2 were expected")]
    NotEnoughCharacter(u8),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

/// An on-board square. Column `x` runs from the a-file to the h-file, row `y`
/// runs from white's back rank (0) to black's back rank (7).
///
/// Off-board coordinates never exist as a `Coord`; raw positions are
/// [`Vector`]s that go through [`topology::wrap`].
// Bit structure: 10XXXYYY
// first two bits is always `10` for `NonZero` size optimizations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord(NonZero<u8>);

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < 8);
        debug_assert!(y < 8);
        let byte = 0b1000_0000 | (x << 3) | y;
        Coord(NonZero::new(byte).unwrap())
    }
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        assert!(bytes.len() == 2, "square names are two characters long");
        assert!(bytes[0] >= b'a' && bytes[0] <= b'h', "file must be `a` to `h`");
        assert!(bytes[1] >= b'1' && bytes[1] <= b'8', "rank must be `1` to `8`");
        Coord::new(bytes[0] - b'a', bytes[1] - b'1')
    }
    pub fn from_chars(x: char, y: char) -> Result<Self, ParseCoordError> {
        let x = match x {
            'a'..='h' => x as u8 - b'a',
            _ => return Err(ParseCoordError::InvalidX(x)),
        };
        let y = match y {
            '1'..='8' => y as u8 - b'1',
            _ => return Err(ParseCoordError::InvalidY(y)),
        };
        Ok(Coord::new(x, y))
    }
    pub const fn x(self) -> u8 {
        (self.0.get() >> 3) & 0b_111
    }
    pub const fn y(self) -> u8 {
        self.0.get() & 0b_111
    }
    pub fn as_vector(self) -> Vector {
        Vector {
            x: i32::from(self.x()),
            y: i32::from(self.y()),
        }
    }
    /// Moves by a raw delta and lands wherever the sphere takes it.
    pub fn offset(self, movement: Vector) -> Self {
        topology::wrap(self.as_vector() + movement)
    }
    /// Shade of the square, used only for display.
    pub fn color(self) -> Team {
        match (self.x() + self.y()) % 2 {
            0 => Team::Black,
            1 => Team::White,
            _ => unreachable!(),
        }
    }
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).flat_map(|y| (0..8).map(move |x| Coord::new(x, y)))
    }
}
pub fn home_rank(team: Team) -> u8 {
    match team {
        Team::White => coord_y!("1"),
        Team::Black => coord_y!("8"),
    }
}
pub fn pawn_home_rank(team: Team) -> u8 {
    match team {
        Team::White => coord_y!("2"),
        Team::Black => coord_y!("7"),
    }
}
pub fn pawn_promotion_rank(team: Team) -> u8 {
    match team {
        Team::White => coord_y!("8"),
        Team::Black => coord_y!("1"),
    }
}
/// Rank a pawn must stand on to capture en passant.
pub fn en_passant_rank(team: Team) -> u8 {
    match team {
        Team::White => coord_y!("5"),
        Team::Black => coord_y!("4"),
    }
}
pub fn pawn_direction(team: Team) -> i32 {
    match team {
        Team::White => 1,
        Team::Black => -1,
    }
}
impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let x = (self.x() + b'a') as char;
        let y = self.y() + 1;
        write!(f, "{x}{y}")?;
        Ok(())
    }
}
impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(x) = chars.next() else {
            return Err(ParseCoordError::NotEnoughCharacter(0));
        };
        let Some(y) = chars.next() else {
            return Err(ParseCoordError::NotEnoughCharacter(1));
        };
        if let Some(c) = chars.next() {
            return Err(ParseCoordError::Unexpected(c));
        }
        Coord::from_chars(x, y)
    }
}
impl Sub<Self> for Coord {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        self.as_vector() - rhs.as_vector()
    }
}

/// A raw, unbounded column/row pair. Only [`topology::wrap`] turns it back
/// into a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}
impl Vector {
    pub const ZERO: Self = Vector { x: 0, y: 0 };

    pub const KNIGHT_MOVES: [Self; 8] = [
        Vector { x: 1, y: 2 },
        Vector { x: 2, y: 1 },
        Vector { x: 1, y: -2 },
        Vector { x: 2, y: -1 },
        Vector { x: -1, y: -2 },
        Vector { x: -2, y: -1 },
        Vector { x: -1, y: 2 },
        Vector { x: -2, y: 1 },
    ];
    pub const KING_MOVES: [Self; 8] = [
        Vector { x: -1, y: 1 },
        Vector { x: 0, y: 1 },
        Vector { x: 1, y: 1 },
        Vector { x: -1, y: 0 },
        Vector { x: 1, y: 0 },
        Vector { x: -1, y: -1 },
        Vector { x: 0, y: -1 },
        Vector { x: 1, y: -1 },
    ];
    // each axis is walked both ways
    pub const HORIZONTAL: Self = Vector { x: 1, y: 0 };
    pub const VERTICAL: Self = Vector { x: 0, y: 1 };
    pub const DIAGONALS: [Self; 2] = [Vector { x: 1, y: 1 }, Vector { x: -1, y: 1 }];

    pub fn new(x: i32, y: i32) -> Self {
        Vector { x, y }
    }
    pub fn pawn_single_move(team: Team) -> Self {
        Vector {
            x: 0,
            y: pawn_direction(team),
        }
    }
    pub fn pawn_double_move(team: Team) -> Self {
        Vector::pawn_single_move(team) * 2
    }
    pub fn pawn_attacks(team: Team) -> [Self; 2] {
        [1, -1].map(|x| Vector {
            x,
            y: pawn_direction(team),
        })
    }
}
impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Self::Output {
        Vector {
            x: -self.x,
            y: -self.y,
        }
    }
}
impl Add<Self> for Vector {
    type Output = Vector;

    fn add(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}
impl Sub<Self> for Vector {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
impl Mul<i32> for Vector {
    type Output = Vector;

    fn mul(self, rhs: i32) -> Self::Output {
        Vector {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}
#[cfg(test)]
mod test {
    use crate::{
        coord,
        coord::{Coord, ParseCoordError},
    };

    #[test]
    fn names_round_trip() {
        for position in Coord::all() {
            assert_eq!(position.to_string().parse(), Ok(position));
        }
    }
    #[test]
    fn white_back_rank_is_row_zero() {
        assert_eq!(coord!("a1"), Coord::new(0, 0));
        assert_eq!(coord!("e2"), Coord::new(4, 1));
        assert_eq!(coord!("h8"), Coord::new(7, 7));
    }
    #[test]
    fn bad_names_are_rejected() {
        assert_eq!("i1".parse::<Coord>(), Err(ParseCoordError::InvalidX('i')));
        assert_eq!("a9".parse::<Coord>(), Err(ParseCoordError::InvalidY('9')));
        assert_eq!("a".parse::<Coord>(), Err(ParseCoordError::NotEnoughCharacter(1)));
        assert_eq!("a1b".parse::<Coord>(), Err(ParseCoordError::Unexpected('b')));
    }
}
