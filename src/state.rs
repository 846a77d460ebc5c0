use std::fmt::{self, Display, Formatter};

/// Standing of one team, as seen before its next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Playing,
    Check,
    Checkmate,
    Stalemate,
}
impl State {
    pub fn is_over(self) -> bool {
        matches!(self, State::Checkmate | State::Stalemate)
    }
    /// For the mover's own state right after an action, this means the
    /// action was rejected.
    pub fn rejects_move(self) -> bool {
        matches!(self, State::Check | State::Checkmate)
    }
}
impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            State::Playing => write!(f, "playing")?,
            State::Check => write!(f, "check")?,
            State::Checkmate => write!(f, "checkmate")?,
            State::Stalemate => write!(f, "stalemate")?,
        }
        Ok(())
    }
}
