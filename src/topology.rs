//! The board is the surface of a sphere. Columns run around the equator and
//! wrap freely. Rows run from pole to pole: stepping past a pole comes back
//! down the antipodal meridian, half a board away.

use std::iter::FusedIterator;

use crate::coord::{Coord, Vector};

pub const SIZE: i32 = 8;
const HALF: i32 = SIZE / 2;
const TWICE: i32 = SIZE * 2;

// a ray closes after at most two laps of the board
const MAX_RAY_LENGTH: usize = 2 * (SIZE * SIZE) as usize;

const _: () = assert!(SIZE % 2 == 0, "the half-board shift needs an even size");

/// Maps any raw position onto the board.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "both components are reduced into 0..SIZE before the cast"
)]
pub fn wrap(position: Vector) -> Coord {
    let size = i64::from(SIZE);
    let half = i64::from(HALF);
    let twice = i64::from(TWICE);

    let mut x = i64::from(position.x);
    let mut y = i64::from(position.y);

    if y < 0 {
        y = -y - 1;
        x += half;
    }
    y %= twice;
    if y >= size {
        y = (twice - 1) - y;
        x += half;
    }
    let x = x.rem_euclid(size);
    Coord::new(x as u8, y as u8)
}
fn in_rows(y: i32) -> bool {
    (0..SIZE).contains(&y)
}

/// How a sliding ray takes its next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stride {
    /// Ranks and files. Going over a pole flips the vertical direction, so
    /// the ray carries on down the other side.
    Orthogonal,
    /// Diagonals. Crossing a pole is a pure vertical step that reverses the
    /// whole direction, keeping the ray on squares of one shade.
    Diagonal,
}
impl Stride {
    pub fn advance(self, from: Coord, delta: &mut Vector) -> Coord {
        let mut next = from.as_vector() + *delta;
        if !in_rows(next.y) {
            match self {
                Stride::Orthogonal => delta.y = -delta.y,
                Stride::Diagonal => {
                    next = from.as_vector() + Vector::new(0, delta.y);
                    *delta = -*delta;
                }
            }
        }
        wrap(next)
    }
}

/// Squares visited walking from `origin` (exclusive) until `end` (exclusive).
///
/// Pass `end == origin` to walk a full lap.
#[derive(Debug, Clone)]
pub struct Ray {
    position: Coord,
    delta: Vector,
    stride: Stride,
    end: Coord,
    remaining: usize,
}
impl Ray {
    pub fn new(origin: Coord, delta: Vector, stride: Stride, end: Coord) -> Self {
        debug_assert_ne!(delta, Vector::ZERO);
        Ray {
            position: origin,
            delta,
            stride,
            end,
            remaining: MAX_RAY_LENGTH,
        }
    }
    pub fn lap(origin: Coord, delta: Vector, stride: Stride) -> Self {
        Ray::new(origin, delta, stride, origin)
    }
}
impl Iterator for Ray {
    type Item = Coord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let next = self.stride.advance(self.position, &mut self.delta);
        if next == self.end {
            self.remaining = 0;
            return None;
        }
        self.remaining -= 1;
        self.position = next;
        Some(next)
    }
}
impl FusedIterator for Ray {}
