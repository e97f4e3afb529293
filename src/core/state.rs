//! Game state and rules for 3x3 tic-tac-toe.
//!
//! ## Design
//!
//! A `GameState` is a small immutable value: one 9-bit occupancy board per
//! stable player identity plus the identity of the player to move. Every
//! transition returns a new value.
//!
//! Callers that reason in negamax terms use the perspective-relative view:
//! [`GameState::own_cells`] belongs to the player to move and
//! [`GameState::enemy_cells`] to the opponent. A state "is lost" when the
//! opponent (the player who just moved) owns a complete line.

use serde::{Deserialize, Serialize};

use super::action::{Action, ActionList, ACTION_SPACE};
use super::player::{to_reference, PlayerId, PlayerMap};
use crate::error::{Error, Result};

/// Mask of all nine cells.
const FULL_BOARD: u16 = 0b1_1111_1111;

/// The eight winning lines as cell masks.
const LINES: [u16; 8] = [
    0b000_000_111, // rows
    0b000_111_000,
    0b111_000_000,
    0b001_001_001, // columns
    0b010_010_010,
    0b100_100_100,
    0b100_010_001, // diagonals
    0b001_010_100,
];

#[inline]
fn has_line(board: u16) -> bool {
    LINES.iter().any(|&line| board & line == line)
}

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Single winner.
    Winner(PlayerId),
    /// Board filled without a line.
    Draw,
}

impl GameOutcome {
    /// Signed result for `player`: +1 win, 0 draw, -1 loss.
    #[must_use]
    pub fn value_for(self, player: PlayerId) -> i32 {
        match self {
            GameOutcome::Winner(winner) => to_reference(1, winner, player),
            GameOutcome::Draw => 0,
        }
    }

    /// Match point for `player`: 1 win, 0.5 draw, 0 loss.
    #[must_use]
    pub fn point_for(self, player: PlayerId) -> f64 {
        (self.value_for(player) as f64 + 1.0) / 2.0
    }
}

/// Immutable tic-tac-toe position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Occupied cells per player.
    boards: PlayerMap<u16>,

    /// Player about to move.
    to_move: PlayerId,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// The empty board with the first player to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boards: PlayerMap::with_value(0),
            to_move: PlayerId::FIRST,
        }
    }

    /// Parse a position from nine `X`/`O`/`-` characters, row-major.
    ///
    /// `X` is the first player. Whitespace is ignored so boards may be written
    /// as three rows. The side to move follows from the piece counts.
    ///
    /// ```
    /// use zero_ttt::core::{GameState, PlayerId};
    ///
    /// let state = GameState::from_cells("XO- -X- --O").unwrap();
    /// assert_eq!(state.to_move(), PlayerId::FIRST);
    /// assert_eq!(state.legal_actions().len(), 5);
    /// ```
    pub fn from_cells(cells: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidPosition {
            cells: cells.to_string(),
            reason,
        };

        let chars: Vec<char> = cells.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != ACTION_SPACE {
            return Err(invalid(format!("expected 9 cells, got {}", chars.len())));
        }

        let mut boards = PlayerMap::with_value(0u16);
        for (i, c) in chars.iter().enumerate() {
            match c {
                'X' | 'x' => boards[PlayerId::FIRST] |= 1 << i,
                'O' | 'o' => boards[PlayerId::SECOND] |= 1 << i,
                '-' | '.' => {}
                other => return Err(invalid(format!("unexpected character '{other}' at {i}"))),
            }
        }

        let x = boards[PlayerId::FIRST].count_ones();
        let o = boards[PlayerId::SECOND].count_ones();
        let to_move = match x.checked_sub(o) {
            Some(0) => PlayerId::FIRST,
            Some(1) => PlayerId::SECOND,
            _ => return Err(invalid(format!("piece counts X={x}, O={o} are unreachable"))),
        };

        if has_line(boards[PlayerId::FIRST]) && has_line(boards[PlayerId::SECOND]) {
            return Err(invalid("both players own a line".to_string()));
        }

        let state = Self { boards, to_move };
        // The player to move can never own a line: it would have ended the game
        // on their previous turn.
        if has_line(state.own_cells()) {
            return Err(invalid(format!("{to_move} to move already owns a line")));
        }

        Ok(state)
    }

    /// Player about to move.
    #[inline]
    #[must_use]
    pub fn to_move(&self) -> PlayerId {
        self.to_move
    }

    /// Cells of `player`.
    #[inline]
    #[must_use]
    pub fn cells_of(&self, player: PlayerId) -> u16 {
        self.boards[player]
    }

    /// Cells of the player to move.
    #[inline]
    #[must_use]
    pub fn own_cells(&self) -> u16 {
        self.boards[self.to_move]
    }

    /// Cells of the player who just moved.
    #[inline]
    #[must_use]
    pub fn enemy_cells(&self) -> u16 {
        self.boards[self.to_move.other()]
    }

    /// Owner of a cell, if any.
    #[must_use]
    pub fn cell(&self, action: Action) -> Option<PlayerId> {
        PlayerId::all().find(|&p| self.boards[p] & action.bit() != 0)
    }

    /// Number of marks on the board.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        (self.own_cells() | self.enemy_cells()).count_ones()
    }

    /// Empty cells in ascending index order.
    ///
    /// This is the fixed scan order used by every strategy for tie-breaking.
    #[must_use]
    pub fn legal_actions(&self) -> ActionList {
        let occupied = self.own_cells() | self.enemy_cells();
        Action::all().filter(|a| occupied & a.bit() == 0).collect()
    }

    /// Check whether `action` is an empty cell.
    #[must_use]
    pub fn is_legal(&self, action: Action) -> bool {
        (self.own_cells() | self.enemy_cells()) & action.bit() == 0
    }

    /// The player to move has lost: the opponent owns a complete line.
    #[must_use]
    pub fn is_lose(&self) -> bool {
        has_line(self.enemy_cells())
    }

    /// The board is full and nobody lost.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        !self.is_lose() && (self.own_cells() | self.enemy_cells()) == FULL_BOARD
    }

    /// The game is over.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.is_lose() || self.is_draw()
    }

    /// The first player is to move.
    #[must_use]
    pub fn is_first_player(&self) -> bool {
        self.to_move.is_first()
    }

    /// Final result, or `None` while the game continues.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.is_lose() {
            Some(GameOutcome::Winner(self.to_move.other()))
        } else if self.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// Exact value of a terminal state for the player to move: -1 lost, 0 draw.
    ///
    /// `None` while the game continues.
    #[must_use]
    pub fn terminal_value(&self) -> Option<f64> {
        self.outcome()
            .map(|outcome| outcome.value_for(self.to_move) as f64)
    }

    /// Final result for the first player: +1 win, 0 draw, -1 loss.
    #[must_use]
    pub fn first_player_value(&self) -> Option<i32> {
        self.outcome().map(|o| o.value_for(PlayerId::FIRST))
    }

    /// Match point for the first player: 1 win, 0.5 draw, 0 loss.
    #[must_use]
    pub fn first_player_point(&self) -> Option<f64> {
        self.outcome().map(|o| o.point_for(PlayerId::FIRST))
    }

    /// Apply `action` for the player to move.
    ///
    /// Fails with [`Error::InvalidMove`] if the cell is occupied or the game is
    /// already over.
    pub fn next(&self, action: Action) -> Result<GameState> {
        if !self.is_legal(action) || self.is_done() {
            return Err(Error::InvalidMove { action });
        }

        let mut boards = self.boards;
        boards[self.to_move] |= action.bit();

        Ok(Self {
            boards,
            to_move: self.to_move.other(),
        })
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for action in Action::all() {
            let c = match self.cell(action) {
                Some(p) if p.is_first() => 'X',
                Some(_) => 'O',
                None => '-',
            };
            write!(f, "{c}")?;
            if action.index() % 3 == 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(i: usize) -> Action {
        Action::new(i).unwrap()
    }

    fn play(moves: &[usize]) -> GameState {
        moves
            .iter()
            .fold(GameState::new(), |s, &m| s.next(cell(m)).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.legal_actions().len(), 9);
        assert!(state.is_first_player());
        assert!(!state.is_done());
        assert_eq!(state.outcome(), None);
        assert_eq!(state.terminal_value(), None);
    }

    #[test]
    fn test_next_swaps_roles() {
        let state = GameState::new();
        let after = state.next(Action::CENTER).unwrap();

        assert_eq!(after.enemy_cells(), Action::CENTER.bit());
        assert_eq!(after.own_cells(), 0);
        assert!(!after.is_first_player());
        assert_eq!(after.cell(Action::CENTER), Some(PlayerId::FIRST));
        // The original value is untouched.
        assert_eq!(state.move_count(), 0);
    }

    #[test]
    fn test_next_rejects_occupied_cell() {
        let state = play(&[4]);
        let err = state.next(Action::CENTER).unwrap_err();
        assert!(matches!(err, Error::InvalidMove { action } if action == Action::CENTER));
    }

    #[test]
    fn test_next_rejects_move_after_win() {
        // X wins on the top row.
        let state = play(&[0, 3, 1, 4, 2]);
        assert!(state.is_lose());
        assert!(state.next(cell(8)).is_err());
    }

    #[test]
    fn test_lose_detection_for_player_to_move() {
        let state = play(&[0, 3, 1, 4, 2]);
        assert!(state.is_lose());
        assert!(!state.is_draw());
        assert!(!state.is_first_player());
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(PlayerId::FIRST)));
        assert_eq!(state.terminal_value(), Some(-1.0));
    }

    #[test]
    fn test_second_player_win() {
        // O completes the left column.
        let state = play(&[1, 0, 2, 3, 4, 6]);
        assert!(state.is_lose());
        assert!(state.is_first_player());
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(PlayerId::SECOND)));
        assert_eq!(state.first_player_value(), Some(-1));
        assert_eq!(state.first_player_point(), Some(0.0));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / X O O / O X X
        let state = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(state.is_draw());
        assert!(!state.is_lose());
        assert!(state.legal_actions().is_empty());
        assert_eq!(state.terminal_value(), Some(0.0));
    }

    #[test]
    fn test_full_board_with_line_is_lose_not_draw() {
        let state = GameState::from_cells("XOX OXO OXX").unwrap();
        assert!(state.is_lose());
        assert!(!state.is_draw());
    }

    #[test]
    fn test_outcome_values_and_points() {
        let win = GameOutcome::Winner(PlayerId::FIRST);
        assert_eq!(win.value_for(PlayerId::FIRST), 1);
        assert_eq!(win.value_for(PlayerId::SECOND), -1);
        assert_eq!(win.point_for(PlayerId::FIRST), 1.0);
        assert_eq!(win.point_for(PlayerId::SECOND), 0.0);
        assert_eq!(GameOutcome::Draw.point_for(PlayerId::SECOND), 0.5);
    }

    #[test]
    fn test_from_cells_round_trip_display() {
        let state = GameState::from_cells("XO-\n-X-\n--O").unwrap();
        assert_eq!(state.to_string(), "XO-\n-X-\n--O\n");
        assert_eq!(state, play(&[0, 1, 4, 8]));
    }

    #[test]
    fn test_from_cells_rejects_bad_input() {
        assert!(GameState::from_cells("XX-------").is_err()); // counts
        assert!(GameState::from_cells("OX-------").is_ok());
        assert!(GameState::from_cells("O--------").is_err()); // O ahead
        assert!(GameState::from_cells("XO?------").is_err()); // character
        assert!(GameState::from_cells("XO").is_err()); // length
        assert!(GameState::from_cells("XXXOOO---").is_err()); // two lines
        assert!(GameState::from_cells("OOOXX-XX-").is_err()); // mover owns line
    }

    #[test]
    fn test_legal_actions_ascending() {
        let state = play(&[4, 0]);
        let cells: Vec<usize> = state.legal_actions().iter().map(|a| a.index()).collect();
        assert_eq!(cells, vec![1, 2, 3, 5, 6, 7, 8]);
    }
}
