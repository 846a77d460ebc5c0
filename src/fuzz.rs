//! Random self-play that checks the engine against itself on every ply.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    action::Action,
    board::Board,
    coord::Coord,
    evaluator::evaluate,
    layout::Layout,
    state::State,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FuzzError {
    #[error("applying then reversing {action} changed the board\n{layout}")]
    ReverseMismatch { action: Action, layout: Layout },
    #[error("rejecting {action} changed the board\n{layout}")]
    RejectionMutated { action: Action, layout: Layout },
    #[error("{action} was committed but the turn did not pass\n{layout}")]
    TurnNotPassed { action: Action, layout: Layout },
    #[error("{action} was committed with its own king attacked\n{layout}")]
    SelfCheck { action: Action, layout: Layout },
    #[error("{action} is accepted but missing from the legal actions\n{layout}")]
    MissingLegalAction { action: Action, layout: Layout },
    #[error("{action} is listed as legal but gets rejected\n{layout}")]
    RejectedLegalAction { action: Action, layout: Layout },
    #[error("{state} reported with {legal} legal actions left\n{layout}")]
    StateMismatch {
        state: State,
        legal: usize,
        layout: Layout,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FuzzReport {
    pub plies: usize,
    pub checkmates: usize,
    pub stalemates: usize,
}

/// Plays `plies` random actions from the starting position, starting a new
/// game whenever one ends.
pub fn fuzz(seed: u64, plies: usize) -> Result<FuzzReport, FuzzError> {
    fuzz_from(Board::starting_position(), seed, plies)
}
/// Like [`fuzz`], but the first game starts from `board`. Later games start
/// from the starting position.
pub fn fuzz_from(board: Board, seed: u64, plies: usize) -> Result<FuzzReport, FuzzError> {
    debug!(seed, plies, "fuzzing");
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = board;
    let mut report = FuzzReport::default();
    while report.plies < plies {
        let legal = check_position(&board)?;
        let state = board.current_team_state();
        if state.is_over() != legal.is_empty() {
            return Err(FuzzError::StateMismatch {
                state,
                legal: legal.len(),
                layout: Layout::from_board(&board),
            });
        }
        if legal.is_empty() {
            info!(%state, loser = %board.current_team_turn(), "game over");
            match state {
                State::Checkmate => report.checkmates += 1,
                State::Stalemate => report.stalemates += 1,
                State::Playing | State::Check => unreachable!(),
            }
            board = Board::starting_position();
            continue;
        }
        let action = legal[rng.random_range(0..legal.len())];
        let result = board.apply_action_if_valid(&action);
        debug_assert!(!result.rejects_move());
        report.plies += 1;
    }
    Ok(report)
}
/// Tries every pseudo-legal action of the side to move on a copy of `board`
/// and returns the accepted ones.
fn check_position(board: &Board) -> Result<Vec<Action>, FuzzError> {
    let team = board.current_team_turn();
    let layout = || Layout::from_board(board);
    let positions: Vec<Coord> = board
        .pieces()
        .filter(|(_, piece)| piece.team == team)
        .map(|(position, _)| position)
        .collect();
    let mut legal = Vec::new();
    for position in positions {
        let listed: FxHashSet<Action> = board.legal_actions(position).into_iter().collect();
        for action in board.calculate_possible_actions(position) {
            let mut scratch = board.clone();
            action.apply(&mut scratch);
            action.reverse(&mut scratch);
            if scratch != *board {
                return Err(FuzzError::ReverseMismatch {
                    action,
                    layout: layout(),
                });
            }
            if scratch.apply_action_if_valid(&action).rejects_move() {
                if scratch != *board {
                    return Err(FuzzError::RejectionMutated {
                        action,
                        layout: layout(),
                    });
                }
                if listed.contains(&action) {
                    return Err(FuzzError::RejectedLegalAction {
                        action,
                        layout: layout(),
                    });
                }
                continue;
            }
            if scratch.current_team_turn() == team {
                return Err(FuzzError::TurnNotPassed {
                    action,
                    layout: layout(),
                });
            }
            if evaluate(&mut scratch, team).rejects_move() {
                return Err(FuzzError::SelfCheck {
                    action,
                    layout: layout(),
                });
            }
            if !listed.contains(&action) {
                return Err(FuzzError::MissingLegalAction {
                    action,
                    layout: layout(),
                });
            }
            legal.push(action);
        }
    }
    Ok(legal)
}
