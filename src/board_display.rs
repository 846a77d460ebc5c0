use std::fmt::{self, Display, Formatter};

use crate::{
    board::Board,
    coord::{Coord, Vector},
    team::Team,
    topology::wrap,
};

const WHITE: &str = "\x1b[30;107m";
const BLACK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const POLE: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// The board as seen by `view`, with `info` lines printed beside it.
///
/// Above and below the grid, each column is labelled with the file it runs
/// into over that pole.
pub struct BoardDisplay<'a> {
    pub board: &'a Board,
    pub view: Team,
    pub highlighted: &'a [Coord],
    pub info: &'a str,
}
impl BoardDisplay<'_> {
    fn columns(&self) -> impl Iterator<Item = u8> {
        let view = self.view;
        (0..8).map(move |column| match view {
            Team::White => column,
            Team::Black => 7 - column,
        })
    }
    fn rows(&self) -> impl Iterator<Item = u8> {
        let view = self.view;
        (0..8).map(move |row| match view {
            Team::White => 7 - row,
            Team::Black => row,
        })
    }
    /// `beyond` is a raw row just past the pole being drawn.
    fn write_pole(&self, f: &mut Formatter<'_>, beyond: i32) -> fmt::Result {
        for x in self.columns() {
            let across = wrap(Vector::new(i32::from(x), beyond));
            write!(f, "{POLE}{} {RESET}", (across.x() + b'a') as char)?;
        }
        Ok(())
    }
}
impl Display for BoardDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut lines = self.info.lines().fuse();
        let (top, bottom) = match self.view {
            Team::White => (8, -1),
            Team::Black => (-1, 8),
        };
        self.write_pole(f, top)?;
        writeln!(f)?;
        for y in self.rows() {
            for x in self.columns() {
                let position = Coord::new(x, y);
                let color = if self.highlighted.contains(&position) {
                    HIGHLIGHTED
                } else {
                    match position.color() {
                        Team::White => WHITE,
                        Team::Black => BLACK,
                    }
                };
                let figurine = self.board[position].map_or(' ', |piece| piece.figurine());
                write!(f, "{color}{figurine} {RESET}")?;
            }
            write!(f, "{}", y + 1)?;
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        self.write_pole(f, bottom)?;
        writeln!(f)?;
        for (i, x) in self.columns().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", (x + b'a') as char)?;
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "                  {line}")?;
        }
        Ok(())
    }
}
