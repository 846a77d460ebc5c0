#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

//! Rules engine for chess played on the surface of a sphere.
//!
//! Columns wrap around the equator and rows run over the poles, so every
//! piece, pawns included, can reach across the edges of the flat board.

pub mod action;
pub mod board;
pub mod board_display;
pub mod coord;
pub mod evaluator;
pub mod fuzz;
pub mod layout;
pub mod movegen;
pub mod piece;
pub mod state;
pub mod team;
pub mod topology;
