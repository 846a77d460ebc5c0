use rustc_hash::FxHashSet;

use crate::{
    action::{Action, Capture, Castle, CastleSide},
    board::Board,
    coord::{Coord, Vector, en_passant_rank, home_rank, pawn_home_rank, pawn_promotion_rank},
    coord_x,
    piece::{Piece, PieceKind},
    topology::{Ray, Stride},
};

impl Piece {
    /// Every pseudo-legal action of this piece standing on `position`.
    ///
    /// Whether an action leaves the mover's own king attacked is not checked
    /// here; [`Board::apply_action_if_valid`] rejects those.
    pub fn possible_actions(self, board: &Board, position: Coord) -> Vec<Action> {
        debug_assert_eq!(board[position], Some(self));
        let mut actions = Vec::new();
        match self.kind {
            PieceKind::Pawn => self.pawn_actions(board, position, &mut actions),
            PieceKind::Knight => {
                let destinations = self.step_destinations(board, position, &Vector::KNIGHT_MOVES);
                self.add_from_destinations(board, position, destinations, &mut actions);
            }
            PieceKind::Bishop => {
                let mut destinations = FxHashSet::default();
                self.diagonal_destinations(board, position, &mut destinations);
                self.add_from_destinations(board, position, destinations, &mut actions);
            }
            PieceKind::Rook => {
                let mut destinations = FxHashSet::default();
                self.orthogonal_destinations(board, position, &mut destinations);
                self.add_from_destinations(board, position, destinations, &mut actions);
            }
            PieceKind::Queen => {
                let mut destinations = FxHashSet::default();
                self.diagonal_destinations(board, position, &mut destinations);
                self.orthogonal_destinations(board, position, &mut destinations);
                self.add_from_destinations(board, position, destinations, &mut actions);
            }
            PieceKind::King => {
                let destinations = self.step_destinations(board, position, &Vector::KING_MOVES);
                self.add_from_destinations(board, position, destinations, &mut actions);
                self.castling_actions(board, position, &mut actions);
            }
        }
        actions
    }
    /// Whether this piece, standing on `position`, threatens to capture
    /// whatever stands on `destination`.
    pub fn can_capture_destination(self, board: &Board, position: Coord, destination: Coord) -> bool {
        self.possible_actions(board, position)
            .iter()
            .any(|action| action.is_capture() && action.destination() == destination)
    }
    fn accepts(self, board: &Board, destination: Coord) -> bool {
        board[destination].is_none_or(|piece| piece.team != self.team)
    }
    fn step_destinations(self, board: &Board, position: Coord, moves: &[Vector]) -> FxHashSet<Coord> {
        moves
            .iter()
            .map(|movement| position.offset(*movement))
            .filter(|destination| self.accepts(board, *destination))
            .collect()
    }
    /// Walks one way until blocked or back home. Returns the blocking square,
    /// or `end` if nothing blocked the ray.
    fn walk(
        self,
        board: &Board,
        position: Coord,
        end: Coord,
        delta: Vector,
        stride: Stride,
        destinations: &mut FxHashSet<Coord>,
    ) -> Coord {
        for destination in Ray::new(position, delta, stride, end) {
            if let Some(piece) = board[destination] {
                if piece.team != self.team {
                    destinations.insert(destination);
                }
                return destination;
            }
            destinations.insert(destination);
        }
        end
    }
    fn axis_destinations(
        self,
        board: &Board,
        position: Coord,
        axis: Vector,
        stride: Stride,
        destinations: &mut FxHashSet<Coord>,
    ) {
        let blocker = self.walk(board, position, position, axis, stride, destinations);
        // an unobstructed lap already saw the whole line
        if blocker != position {
            self.walk(board, position, blocker, -axis, stride, destinations);
        }
    }
    fn orthogonal_destinations(
        self,
        board: &Board,
        position: Coord,
        destinations: &mut FxHashSet<Coord>,
    ) {
        for axis in [Vector::HORIZONTAL, Vector::VERTICAL] {
            self.axis_destinations(board, position, axis, Stride::Orthogonal, destinations);
        }
    }
    fn diagonal_destinations(
        self,
        board: &Board,
        position: Coord,
        destinations: &mut FxHashSet<Coord>,
    ) {
        for axis in Vector::DIAGONALS {
            self.axis_destinations(board, position, axis, Stride::Diagonal, destinations);
        }
    }
    fn add_from_destinations(
        self,
        board: &Board,
        position: Coord,
        destinations: FxHashSet<Coord>,
        actions: &mut Vec<Action>,
    ) {
        actions.extend(destinations.into_iter().map(|destination| {
            if let Some(piece) = board[destination] {
                Action::capture(
                    self,
                    position,
                    destination,
                    Capture {
                        piece,
                        position: destination,
                    },
                )
            } else {
                Action::movement(self, position, destination)
            }
        }));
    }
    fn pawn_actions(self, board: &Board, position: Coord, actions: &mut Vec<Action>) {
        // reaching the last rank always promotes within the same action
        debug_assert_ne!(position.y(), pawn_promotion_rank(self.team));
        if position.y() == pawn_promotion_rank(self.team) {
            return;
        }
        let single = position.offset(Vector::pawn_single_move(self.team));
        if board[single].is_none() {
            actions.push(Action::movement(self, position, single));

            if !self.moved && position.y() == pawn_home_rank(self.team) {
                let double = position.offset(Vector::pawn_double_move(self.team));
                if board[double].is_none() {
                    actions.push(Action::movement(self, position, double));
                }
            }
        }
        let captures: FxHashSet<Coord> = Vector::pawn_attacks(self.team)
            .into_iter()
            .map(|attack| position.offset(attack))
            .collect();
        for destination in captures {
            if let Some(piece) = board[destination]
                && piece.team != self.team
            {
                actions.push(Action::capture(
                    self,
                    position,
                    destination,
                    Capture {
                        piece,
                        position: destination,
                    },
                ));
            }
        }
        if let Some(action) = self.en_passant_action(board, position) {
            actions.push(action);
        }
    }
    fn en_passant_action(self, board: &Board, position: Coord) -> Option<Action> {
        if position.y() != en_passant_rank(self.team) {
            return None;
        }
        let last = board.last_action()?;
        if last.piece().team == self.team || !last.is_pawn_double_step() {
            return None;
        }
        let victim_position = last.destination();
        let victim = board[victim_position]?;
        if !victim.is(!self.team, PieceKind::Pawn) {
            return None;
        }
        Vector::pawn_attacks(self.team)
            .into_iter()
            .map(|attack| position.offset(attack))
            .find(|destination| {
                destination.x() == victim_position.x() && board[*destination].is_none()
            })
            .map(|destination| {
                Action::capture(
                    self,
                    position,
                    destination,
                    Capture {
                        piece: victim,
                        position: victim_position,
                    },
                )
            })
    }
    fn castling_actions(self, board: &Board, position: Coord, actions: &mut Vec<Action>) {
        if self.moved || position != Coord::new(coord_x!("e"), home_rank(self.team)) {
            return;
        }
        for (side, rook_x, direction) in [
            (CastleSide::Long, coord_x!("a"), -1),
            (CastleSide::Short, coord_x!("h"), 1),
        ] {
            let rook_position = Coord::new(rook_x, position.y());
            let Some(rook) = board[rook_position] else {
                continue;
            };
            if !rook.is(self.team, PieceKind::Rook) || rook.moved {
                continue;
            }
            let step = Vector::new(direction, 0);
            if Ray::new(position, step, Stride::Orthogonal, rook_position)
                .any(|between| board[between].is_some())
            {
                continue;
            }
            actions.push(Action::castle(
                self,
                position,
                position.offset(step * 2),
                Castle {
                    side,
                    rook,
                    origin: rook_position,
                    destination: position.offset(step),
                },
            ));
        }
    }
}

#[cfg(test)]
mod test {
    use rustc_hash::FxHashSet;

    use crate::{
        action::{ActionKind, CastleSide},
        board::Board,
        coord,
        coord::Coord,
        layout::Layout,
    };

    fn board(layout: &str) -> Board {
        layout.parse::<Layout>().unwrap().into_board()
    }
    fn destinations(board: &Board, position: Coord) -> FxHashSet<Coord> {
        board[position]
            .unwrap()
            .possible_actions(board, position)
            .iter()
            .map(|action| action.destination())
            .collect()
    }
    fn squares(names: &[&str]) -> FxHashSet<Coord> {
        names.iter().map(|name| name.parse().unwrap()).collect()
    }

    #[test]
    fn opening_pawn_has_single_and_double_step() {
        let board = Board::starting_position();
        assert_eq!(destinations(&board, coord!("e2")), squares(&["e3", "e4"]));
        assert_eq!(destinations(&board, coord!("d7")), squares(&["d6", "d5"]));
    }
    #[test]
    fn opening_knight_is_hemmed_in_by_its_own_army() {
        let board = Board::starting_position();
        assert_eq!(destinations(&board, coord!("g1")), squares(&["f3", "h3"]));
    }
    #[test]
    fn knight_jumps_across_seam_and_pole() {
        let board = board("4k3/8/8/8/8/8/8/N3K3 w");
        assert_eq!(
            destinations(&board, coord!("a1")),
            squares(&["b3", "c2", "f2", "g1", "d2", "c1", "h3", "g2"])
        );
        let board = self::board("4k3/8/8/8/8/8/8/1N2K3 w");
        assert_eq!(
            destinations(&board, coord!("b1")),
            squares(&["c3", "d2", "g2", "h1", "e2", "d1", "a3", "h2"])
        );
    }
    #[test]
    fn rook_bounces_over_the_pole() {
        let board = board("8/8/8/8/8/8/8/R3K2k w");
        let found = destinations(&board, coord!("a1"));
        // up the a-file, over the north pole, down the e-file to the king
        for name in ["a2", "a8", "e8", "e2"] {
            assert!(found.contains(&name.parse().unwrap()), "{name}");
        }
        assert!(!found.contains(&coord!("e1")));
        // along the rank both ways, meeting the kings
        assert!(found.contains(&coord!("d1")));
        assert!(found.contains(&coord!("h1")));
        assert!(!found.contains(&coord!("g1")));
    }
    #[test]
    fn lone_rook_sees_its_lines() {
        let board = board("8/8/8/8/3R4/8/8/8 w");
        let found = destinations(&board, coord!("d4"));
        // 7 on the rank, 15 on the d/h great circle, sharing h4
        assert_eq!(found.len(), 21);
        assert!(found.iter().all(|square| square.y() == 3 || matches!(square.x(), 3 | 7)));
    }
    #[test]
    fn bishop_crosses_the_pole_on_its_color() {
        let board = board("8/8/8/8/8/8/8/B7 w");
        let found = destinations(&board, coord!("a1"));
        assert!(found.contains(&coord!("h8")));
        assert!(found.contains(&coord!("d8")));
        assert!(found.contains(&coord!("c7")));
        assert!(found.iter().all(|square| square.color() == coord!("a1").color()));
    }
    #[test]
    fn sliders_capture_only_the_enemy() {
        let board = board("8/8/8/8/8/8/8/R1n1N3 w");
        let actions = board[coord!("a1")]
            .unwrap()
            .possible_actions(&board, coord!("a1"));
        let captures: Vec<_> = actions
            .iter()
            .filter(|action| action.is_capture())
            .map(|action| action.destination())
            .collect();
        assert_eq!(captures, vec![coord!("c1")]);
        assert!(!actions.iter().any(|action| action.destination() == coord!("e1")));
    }
    #[test]
    fn pawn_captures_across_the_seam() {
        let board = board("4k3/8/8/8/7p/P7/8/4K3 w");
        let pawn = board[coord!("a3")].unwrap();
        assert!(pawn.can_capture_destination(&board, coord!("a3"), coord!("h4")));
        assert!(!pawn.can_capture_destination(&board, coord!("a3"), coord!("a4")));
    }
    #[test]
    fn pawn_is_blocked_straight_ahead() {
        let board = board("4k3/8/8/8/8/4p3/4P3/4K3 w");
        assert!(destinations(&board, coord!("e2")).is_empty());
        let board = self::board("4k3/8/8/8/4p3/8/4P3/4K3 w");
        assert_eq!(destinations(&board, coord!("e2")), squares(&["e3"]));
    }
    #[test]
    fn pawn_promotes_on_its_last_rank() {
        let board = board("3rk3/2P5/8/8/8/8/8/4K3 w");
        let actions = board[coord!("c7")]
            .unwrap()
            .possible_actions(&board, coord!("c7"));
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|action| action.is_promotion()));
        assert!(actions
            .iter()
            .any(|action| matches!(action.kind(), ActionKind::CapturePromotion(_))));
    }
    #[test]
    fn castling_both_sides_from_clear_rank() {
        let board = board("4k3/8/8/8/8/8/8/R3K2R w");
        let castles: Vec<_> = board[coord!("e1")]
            .unwrap()
            .possible_actions(&board, coord!("e1"))
            .into_iter()
            .filter_map(|action| action.castle_rook().map(|castle| (action, castle)))
            .collect();
        assert_eq!(castles.len(), 2);
        for (action, castle) in castles {
            match castle.side {
                CastleSide::Long => {
                    assert_eq!(action.destination(), coord!("c1"));
                    assert_eq!(castle.origin, coord!("a1"));
                    assert_eq!(castle.destination, coord!("d1"));
                }
                CastleSide::Short => {
                    assert_eq!(action.destination(), coord!("g1"));
                    assert_eq!(castle.origin, coord!("h1"));
                    assert_eq!(castle.destination, coord!("f1"));
                }
            }
        }
    }
    #[test]
    fn castling_blocked_by_any_piece_between() {
        for layout in [
            "4k3/8/8/8/8/8/8/RN2K2R w",
            "4k3/8/8/8/8/8/8/R2nK2R w",
            "4k3/8/8/8/8/8/8/R1B1K2R w",
        ] {
            let board = board(layout);
            let sides: Vec<_> = board[coord!("e1")]
                .unwrap()
                .possible_actions(&board, coord!("e1"))
                .into_iter()
                .filter_map(|action| action.castle_rook().map(|castle| castle.side))
                .collect();
            assert_eq!(sides, vec![CastleSide::Short], "{layout}");
        }
    }
    #[test]
    fn castling_needs_unmoved_pieces() {
        let mut board = board("4k3/8/8/8/8/8/8/R3K2R w");
        let rook = board[coord!("h1")].unwrap();
        board.set(coord!("h1"), Some(rook.to_moved()));
        let sides: Vec<_> = board[coord!("e1")]
            .unwrap()
            .possible_actions(&board, coord!("e1"))
            .into_iter()
            .filter_map(|action| action.castle_rook().map(|castle| castle.side))
            .collect();
        assert_eq!(sides, vec![CastleSide::Long]);
    }
}
