use std::{
    fmt::{self, Display, Formatter},
    ops::Not,
    str::FromStr,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("provided string was not `w`, `b`, `W`, `B`, `white`, or `black`")]
pub struct ParseTeamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    White,
    Black,
}
impl Team {
    pub const ALL: [Self; 2] = [Team::White, Team::Black];

    pub fn lowercase(self) -> char {
        match self {
            Team::White => 'w',
            Team::Black => 'b',
        }
    }
}
impl Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Team::White => write!(f, "white")?,
            Team::Black => write!(f, "black")?,
        }
        Ok(())
    }
}
impl FromStr for Team {
    type Err = ParseTeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let team = match s {
            "w" | "W" | "white" => Team::White,
            "b" | "B" | "black" => Team::Black,
            _ => return Err(ParseTeamError),
        };
        Ok(team)
    }
}
impl Not for Team {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }
}
