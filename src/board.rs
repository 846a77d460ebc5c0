use std::ops::Index;

use tracing::{debug, warn};

use crate::{
    action::Action,
    coord::{Coord, home_rank, pawn_home_rank},
    evaluator,
    piece::{Piece, PieceKind},
    state::State,
    team::Team,
};

/// The whole game: the grid, what each team has played, and whose turn it
/// is.
///
/// All mutation goes through [`Board::apply_action_if_valid`]. The evaluator
/// also applies and reverses actions speculatively, but always leaves the
/// board as it found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
    white_history: Vec<Action>,
    black_history: Vec<Action>,
    turn: Team,
    state: State,
}
impl Board {
    pub fn starting_position() -> Self {
        let mut grid = [[None; 8]; 8];
        for team in Team::ALL {
            grid[home_rank(team) as usize] =
                PieceKind::STARTING_CONFIGURATION.map(|kind| Some(Piece::new(team, kind)));
            grid[pawn_home_rank(team) as usize] = [Some(Piece::new(team, PieceKind::Pawn)); 8];
        }
        Board::from_grid(grid, Team::White)
    }
    /// A board with an arbitrary arrangement and no history.
    pub fn from_grid(grid: [[Option<Piece>; 8]; 8], turn: Team) -> Self {
        let mut board = Board {
            grid,
            white_history: Vec::new(),
            black_history: Vec::new(),
            turn,
            state: State::Playing,
        };
        let state = evaluator::evaluate(&mut board, turn);
        board.state = state;
        board
    }
    pub fn grid(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.grid
    }
    pub fn piece_at(&self, position: Coord) -> Option<Piece> {
        self[position]
    }
    pub(crate) fn set(&mut self, position: Coord, piece: Option<Piece>) {
        self.grid[position.y() as usize][position.x() as usize] = piece;
    }
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(|position| self[position].map(|piece| (position, piece)))
    }
    pub fn find_piece(&self, kind: PieceKind, team: Team) -> Option<Coord> {
        self.pieces()
            .find(|(_, piece)| piece.is(team, kind))
            .map(|(position, _)| position)
    }
    pub fn current_team_turn(&self) -> Team {
        self.turn
    }
    pub fn current_team_state(&self) -> State {
        self.state
    }
    pub fn history(&self, team: Team) -> &[Action] {
        match team {
            Team::White => &self.white_history,
            Team::Black => &self.black_history,
        }
    }
    fn history_mut(&mut self, team: Team) -> &mut Vec<Action> {
        match team {
            Team::White => &mut self.white_history,
            Team::Black => &mut self.black_history,
        }
    }
    /// The most recently committed action, from either team.
    pub fn last_action(&self) -> Option<&Action> {
        self.history(!self.turn).last()
    }
    /// Pseudo-legal actions of whatever stands on `position`.
    pub fn calculate_possible_actions(&self, position: Coord) -> Vec<Action> {
        self[position]
            .map(|piece| piece.possible_actions(self, position))
            .unwrap_or_default()
    }
    /// The actions of the piece on `position` that
    /// [`Board::apply_action_if_valid`] would accept, ignoring whose turn it
    /// is.
    pub fn legal_actions(&self, position: Coord) -> Vec<Action> {
        let mut scratch = self.clone();
        self.calculate_possible_actions(position)
            .into_iter()
            .filter(|action| evaluator::leaves_king_safe(&mut scratch, action))
            .collect()
    }
    fn is_current(&self, action: &Action) -> bool {
        action.piece().team == self.turn
            && self
                .calculate_possible_actions(action.origin())
                .contains(action)
    }
    /// Plays `action` unless it leaves the mover's own king attacked.
    ///
    /// Returns the mover's state after the action. `Check` or `Checkmate`
    /// means the action was rejected and the board is unchanged; anything
    /// else means it was committed and the turn has passed.
    pub fn apply_action_if_valid(&mut self, action: &Action) -> State {
        if !self.is_current(action) {
            warn!(%action, turn = %self.turn, "rejected action not playable here");
            return State::Check;
        }
        let team = action.piece().team;
        action.apply(self);
        let state = evaluator::evaluate(self, team);
        if state.rejects_move() {
            action.reverse(self);
            debug!(%action, %state, "rejected");
            return state;
        }
        self.history_mut(team).push(*action);
        self.pass_turn();
        debug!(%action, next = %self.turn, state = %self.state, "committed");
        state
    }
    fn pass_turn(&mut self) {
        self.turn = !self.turn;
        let turn = self.turn;
        self.state = evaluator::evaluate(self, turn);
        if self.state.is_over() {
            debug!(team = %turn, state = %self.state, "game over");
        }
    }
}
impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}
impl Index<Coord> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index.y() as usize][index.x() as usize]
    }
}
