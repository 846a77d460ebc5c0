//! One-ply exhaustive search classifying a team's position.
//!
//! Every candidate reply is applied to the board, tested, and reversed
//! before the next one, so the board is back as it was whenever
//! these functions return.

use tracing::{trace, warn};

use crate::{
    action::Action,
    board::Board,
    coord::Coord,
    piece::{Piece, PieceKind},
    state::State,
    team::Team,
};

pub fn is_square_attacked_by(board: &Board, square: Coord, attacker: Team) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.team == attacker)
        .any(|(position, piece)| piece.can_capture_destination(board, position, square))
}

/// Whether the mover of `action` still has a king, unattacked, once the
/// action is played.
pub fn leaves_king_safe(board: &mut Board, action: &Action) -> bool {
    let team = action.piece().team;
    action.apply(board);
    let safe = board
        .find_piece(PieceKind::King, team)
        .is_some_and(|king| !is_square_attacked_by(board, king, !team));
    action.reverse(board);
    safe
}

/// Whether `team` has any action after which its king, standing on `king`,
/// is not attacked.
pub fn has_legal_escape(board: &mut Board, team: Team, king: Coord) -> bool {
    let king_piece = board[king];
    debug_assert!(king_piece.is_some_and(|piece| piece.is(team, PieceKind::King)));
    let Some(king_piece) = king_piece else {
        return false;
    };
    // the king first: its own escapes move the square under attack
    for action in king_piece.possible_actions(board, king) {
        if survives(board, &action, action.destination()) {
            trace!(%action, "king escape");
            return true;
        }
    }
    let defenders: Vec<(Coord, Piece)> = board
        .pieces()
        .filter(|(_, piece)| piece.team == team && piece.kind != PieceKind::King)
        .collect();
    for (position, piece) in defenders {
        for action in piece.possible_actions(board, position) {
            if survives(board, &action, king) {
                trace!(%action, "escape");
                return true;
            }
        }
    }
    false
}
fn survives(board: &mut Board, action: &Action, king: Coord) -> bool {
    let team = action.piece().team;
    action.apply(board);
    let safe = !is_square_attacked_by(board, king, !team);
    action.reverse(board);
    safe
}

pub fn evaluate(board: &mut Board, team: Team) -> State {
    let Some(king) = board.find_piece(PieceKind::King, team) else {
        warn!(%team, "no king on the board");
        return State::Checkmate;
    };
    let check = is_square_attacked_by(board, king, !team);
    let state = match (check, has_legal_escape(board, team, king)) {
        (true, true) => State::Check,
        (true, false) => State::Checkmate,
        (false, true) => State::Playing,
        (false, false) => State::Stalemate,
    };
    trace!(%team, %state, "evaluated");
    state
}

#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        coord,
        evaluator::{evaluate, has_legal_escape, is_square_attacked_by, leaves_king_safe},
        layout::Layout,
        state::State,
        team::Team,
    };

    fn board(layout: &str) -> Board {
        layout.parse::<Layout>().unwrap().into_board()
    }

    #[test]
    fn starting_position_is_quiet() {
        let mut board = Board::starting_position();
        assert_eq!(evaluate(&mut board, Team::White), State::Playing);
        assert_eq!(evaluate(&mut board, Team::Black), State::Playing);
    }
    #[test]
    fn rook_attacks_over_the_pole() {
        // a8 rook runs over the north pole down the e-file
        let board = board("r7/8/8/8/8/8/8/4K3 w");
        assert!(is_square_attacked_by(&board, coord!("e1"), Team::Black));
        assert!(!is_square_attacked_by(&board, coord!("d1"), Team::Black));
    }
    #[test]
    fn evaluation_leaves_the_board_untouched() {
        let mut board = board("4k3/8/8/8/8/8/3q4/4K3 w");
        let before = board.clone();
        evaluate(&mut board, Team::White);
        evaluate(&mut board, Team::Black);
        assert_eq!(board, before);
    }
    #[test]
    fn checked_king_that_can_step_away_is_in_check() {
        let mut board = board("4k3/8/8/8/8/8/3q4/4K3 w");
        assert!(is_square_attacked_by(&board, coord!("e1"), Team::Black));
        assert!(has_legal_escape(&mut board, Team::White, coord!("e1")));
        assert_eq!(evaluate(&mut board, Team::White), State::Check);
    }
    #[test]
    fn lone_queen_mates_over_the_pole() {
        // h1 touches c1, d1 and e1 across the south pole, and a1, a2 across
        // the seam; the d2 queen covers all of them
        let mut board = board("4k3/8/8/8/8/8/3q4/7K w");
        assert!(is_square_attacked_by(&board, coord!("h1"), Team::Black));
        assert_eq!(evaluate(&mut board, Team::White), State::Checkmate);
    }
    #[test]
    fn king_with_every_neighbor_covered_is_stalemated() {
        let mut board = board("4k3/8/8/8/8/8/1q4n1/7K w");
        assert!(!is_square_attacked_by(&board, coord!("h1"), Team::Black));
        assert!(!has_legal_escape(&mut board, Team::White, coord!("h1")));
        assert_eq!(evaluate(&mut board, Team::White), State::Stalemate);
    }
    #[test]
    fn mate_stands_when_no_defender_helps() {
        let mut board = board("4k3/8/8/8/8/P7/3q4/7K w");
        assert!(!has_legal_escape(&mut board, Team::White, coord!("h1")));
        assert_eq!(evaluate(&mut board, Team::White), State::Checkmate);
    }
    #[test]
    fn defender_capturing_the_checker_is_an_escape() {
        let mut board = board("4k3/8/8/8/8/8/3q3R/7K w");
        let rook = board[coord!("h2")].unwrap();
        let capture = rook
            .possible_actions(&board, coord!("h2"))
            .into_iter()
            .find(|action| action.destination() == coord!("d2"))
            .unwrap();
        assert!(capture.is_capture());
        assert!(leaves_king_safe(&mut board, &capture));
        assert!(has_legal_escape(&mut board, Team::White, coord!("h1")));
        assert_eq!(evaluate(&mut board, Team::White), State::Check);
    }
    #[test]
    fn missing_king_counts_as_mate() {
        let mut board = board("4k3/8/8/8/8/8/8/8 w");
        assert_eq!(evaluate(&mut board, Team::White), State::Checkmate);
        assert_eq!(evaluate(&mut board, Team::Black), State::Playing);
    }
    #[test]
    fn stepping_into_attack_is_unsafe() {
        // the a2 rook reaches e1 down the a-file and over the pole
        let mut board = board("4k3/8/8/8/8/8/r7/4K3 w");
        assert_eq!(evaluate(&mut board, Team::White), State::Check);
        let king = board[coord!("e1")].unwrap();
        let actions = king.possible_actions(&board, coord!("e1"));
        let up = actions
            .iter()
            .find(|action| action.destination() == coord!("e2"))
            .unwrap();
        let across = actions
            .iter()
            .find(|action| action.destination() == coord!("d1"))
            .unwrap();
        assert!(!leaves_king_safe(&mut board, up));
        assert!(leaves_king_safe(&mut board, across));
    }
}
