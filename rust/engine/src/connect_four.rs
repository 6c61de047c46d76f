use crate::env::{opponent, Environment, GameOutcome, PlayerId, Winners};
use crate::errors::{GameError, StepError};

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 6;

/// Reference two-player game: drop discs into columns, four in a row wins.
///
/// Moves are column numbers, either bare (`3`) or bracketed (`[3]`).
///
/// # Examples
///
/// ```
/// use derby_engine::connect_four::ConnectFour;
/// use derby_engine::env::Environment;
///
/// let mut game = ConnectFour::new();
/// for col in ["[0]", "[1]", "[0]", "[1]", "[0]", "[1]"] {
///     assert!(!game.step(col).unwrap().done);
/// }
/// let outcome = game.step("[0]").unwrap();
/// assert!(outcome.done);
/// assert_eq!(outcome.winners.unwrap().players, vec![0]);
/// ```
#[derive(Debug, Clone)]
pub struct ConnectFour {
    /// `grid[row][col]`, row 0 is the top
    grid: [[Option<PlayerId>; COLUMNS]; ROWS],
    current: PlayerId,
    outcome: GameOutcome,
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectFour {
    pub fn new() -> Self {
        Self {
            grid: [[None; COLUMNS]; ROWS],
            current: 0,
            outcome: GameOutcome::in_progress(),
        }
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<PlayerId> {
        self.grid[row][col]
    }

    pub fn render(&self) -> String {
        let mut s = String::new();
        s.push_str(
            &(0..COLUMNS)
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        );
        s.push('\n');
        for row in &self.grid {
            let line: Vec<&str> = row
                .iter()
                .map(|c| match c {
                    Some(0) => "X",
                    Some(_) => "O",
                    None => ".",
                })
                .collect();
            s.push_str(&line.join(" "));
            s.push('\n');
        }
        s
    }

    fn parse_column(action: &str) -> Result<usize, GameError> {
        let trimmed = action.trim();
        let token = match (trimmed.find('['), trimmed.find(']')) {
            (Some(open), Some(close)) if open < close => &trimmed[open + 1..close],
            _ => trimmed,
        };
        token
            .trim()
            .parse::<usize>()
            .map_err(|_| GameError::UnparseableMove(action.to_string()))
    }

    fn drop_disc(&mut self, col: usize) -> Result<usize, GameError> {
        if col >= COLUMNS {
            return Err(GameError::ColumnOutOfRange {
                column: col,
                columns: COLUMNS,
            });
        }
        let row = (0..ROWS)
            .rev()
            .find(|&r| self.grid[r][col].is_none())
            .ok_or(GameError::ColumnFull { column: col })?;
        self.grid[row][col] = Some(self.current);
        Ok(row)
    }

    fn connects_four(&self, row: usize, col: usize) -> bool {
        let Some(player) = self.grid[row][col] else {
            return false;
        };
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let run = |sign: isize| {
                let mut n = 0;
                let (mut r, mut c) = (row as isize, col as isize);
                loop {
                    r += dr * sign;
                    c += dc * sign;
                    if r < 0 || c < 0 || r >= ROWS as isize || c >= COLUMNS as isize {
                        break;
                    }
                    if self.grid[r as usize][c as usize] != Some(player) {
                        break;
                    }
                    n += 1;
                }
                n
            };
            1 + run(1) + run(-1) >= 4
        })
    }

    fn board_full(&self) -> bool {
        self.grid[0].iter().all(|c| c.is_some())
    }
}

impl Environment for ConnectFour {
    fn reset(&mut self) {
        *self = Self::new();
    }

    fn step(&mut self, action: &str) -> Result<GameOutcome, StepError> {
        if self.outcome.done {
            return Err(GameError::GameOver.into());
        }
        let col = Self::parse_column(action)?;
        let row = self.drop_disc(col)?;
        if self.connects_four(row, col) {
            self.outcome = GameOutcome {
                done: true,
                winners: Some(Winners {
                    players: vec![self.current],
                    reason: format!("Player {} connected four.", self.current),
                }),
            };
        } else if self.board_full() {
            self.outcome = GameOutcome {
                done: true,
                winners: Some(Winners {
                    players: vec![],
                    reason: "The board is full. It's a draw.".to_string(),
                }),
            };
        } else {
            self.current = opponent(self.current);
        }
        Ok(self.outcome.clone())
    }

    fn observation(&self) -> (PlayerId, String) {
        let moves = self.legal_actions().join(", ");
        let text = format!(
            "You are Player {} ({}) in Connect Four. Current board:\n{}Valid moves: {}\n",
            self.current,
            if self.current == 0 { "X" } else { "O" },
            self.render(),
            moves
        );
        (self.current, text)
    }

    fn outcome(&self) -> GameOutcome {
        self.outcome.clone()
    }

    fn set_winners(&mut self, players: Vec<PlayerId>, reason: String) {
        // declared winners end the game
        self.outcome = GameOutcome {
            done: true,
            winners: Some(Winners { players, reason }),
        };
    }

    fn legal_actions(&self) -> Vec<String> {
        if self.outcome.done {
            return Vec::new();
        }
        (0..COLUMNS)
            .filter(|&c| self.grid[0][c].is_none())
            .map(|c| format!("[{}]", c))
            .collect()
    }
}
