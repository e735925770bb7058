use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::types::{GameState, GameStatus, Position, Tile, TileStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("board size must be at least 1")]
    ZeroBoardSize,
    #[error("{mines} mines do not fit a board of {tiles} tiles; at least one tile must stay safe")]
    TooManyMines { mines: usize, tiles: usize },
    #[error("mine position ({0}, {1}) is outside the board")]
    MineOutOfBounds(usize, usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealResult {
    NoOp,
    Revealed,
    HitMine,
    Won,
}

/// Where mine coordinates come from on the first reveal.
#[derive(Debug)]
enum Placement {
    Random(SmallRng),
    Preset(Vec<Position>),
}

/// Single-match game engine. Owns the board and mutates it exclusively
/// through `reveal`, `toggle_flag`, and `reset`; everything else is a query.
///
/// Mines are not placed at construction. The first `reveal` places them,
/// excluding the revealed position, so the opening move can never lose.
#[derive(Debug)]
pub struct Game {
    board_size: usize,
    total_mines: usize,
    placement: Placement,
    mines_placed: bool,
    state: GameState,
}

impl Game {
    /// New match with entropy-seeded mine placement.
    pub fn new(board_size: usize, total_mines: usize) -> Result<Self, GameError> {
        Self::seeded(board_size, total_mines, rand::random())
    }

    /// New match with a deterministic placement sequence.
    pub fn seeded(board_size: usize, total_mines: usize, seed: u64) -> Result<Self, GameError> {
        Self::validate(board_size, total_mines)?;
        Ok(Self {
            board_size,
            total_mines,
            placement: Placement::Random(SmallRng::seed_from_u64(seed)),
            mines_placed: false,
            state: GameState::new(board_size, total_mines),
        })
    }

    /// New match with an exact mine layout, for scripted boards and tests.
    /// Placement is still deferred to the first reveal, but the preset
    /// layout ignores the revealed position, so first-click safety is only
    /// a property of random placement.
    pub fn with_mines(board_size: usize, mines: &[Position]) -> Result<Self, GameError> {
        let mut coords = mines.to_vec();
        coords.sort_unstable();
        coords.dedup();
        Self::validate(board_size, coords.len())?;
        for &(x, y) in &coords {
            if x >= board_size || y >= board_size {
                return Err(GameError::MineOutOfBounds(x, y));
            }
        }
        let total_mines = coords.len();
        Ok(Self {
            board_size,
            total_mines,
            placement: Placement::Preset(coords),
            mines_placed: false,
            state: GameState::new(board_size, total_mines),
        })
    }

    fn validate(board_size: usize, total_mines: usize) -> Result<(), GameError> {
        if board_size == 0 {
            return Err(GameError::ZeroBoardSize);
        }
        let tiles = board_size * board_size;
        // Strictly fewer mines than tiles, or the placement loop below
        // could never collect enough distinct positions.
        if total_mines >= tiles {
            return Err(GameError::TooManyMines { mines: total_mines, tiles });
        }
        Ok(())
    }

    /// Reveal the tile at `(x, y)`. Out-of-bounds positions, non-hidden
    /// tiles (flags included), and finished matches are silent no-ops.
    pub fn reveal(&mut self, x: usize, y: usize) -> RevealResult {
        if self.state.status != GameStatus::Playing {
            return RevealResult::NoOp;
        }
        if !self.state.board.contains((x, y)) {
            return RevealResult::NoOp;
        }
        if self.state.board[(x, y)].status != TileStatus::Hidden {
            return RevealResult::NoOp;
        }

        if !self.mines_placed {
            self.place_mines((x, y));
        }

        if self.state.board[(x, y)].mine {
            self.disclose_mines();
            self.state.status = GameStatus::Lost;
            self.state.ended_at.get_or_insert_with(Instant::now);
            return RevealResult::HitMine;
        }

        self.flood_reveal(x, y);
        if self.board_cleared() {
            self.state.status = GameStatus::Won;
            self.state.ended_at.get_or_insert_with(Instant::now);
            RevealResult::Won
        } else {
            RevealResult::Revealed
        }
    }

    /// Flag or unflag a hidden tile, tracking the running estimate of mines
    /// left. The estimate counts flags, not actual mines: flagging a safe
    /// tile still decrements it, and over-flagging takes it negative.
    pub fn toggle_flag(&mut self, x: usize, y: usize) -> bool {
        if self.state.status != GameStatus::Playing {
            return false;
        }
        if !self.state.board.contains((x, y)) {
            return false;
        }
        match self.state.board[(x, y)].status {
            TileStatus::Hidden => {
                self.state.board[(x, y)].status = TileStatus::Flagged;
                self.state.mines_left -= 1;
                true
            }
            TileStatus::Flagged => {
                self.state.board[(x, y)].status = TileStatus::Hidden;
                self.state.mines_left += 1;
                true
            }
            _ => false,
        }
    }

    /// Discard the match and start over; mines stay unplaced until the next
    /// first reveal.
    pub fn reset(&mut self) {
        self.state = GameState::new(self.board_size, self.total_mines);
        self.mines_placed = false;
    }

    /// Whole seconds from start to end, once the match is over.
    pub fn duration(&self) -> Option<u64> {
        self.state
            .ended_at
            .map(|end| end.duration_since(self.state.started_at).as_secs())
    }

    /// Deep copy of the current state. Callers can hold or mutate it freely
    /// without touching the engine.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    fn place_mines(&mut self, excluded: Position) {
        match &mut self.placement {
            Placement::Random(rng) => {
                // Rejection sampling: draw, skip duplicates and the opening
                // tile. Terminates because total_mines < board_size².
                let mut placed = 0;
                while placed < self.total_mines {
                    let pos = (
                        rng.random_range(0..self.board_size),
                        rng.random_range(0..self.board_size),
                    );
                    if pos == excluded || self.state.board[pos].mine {
                        continue;
                    }
                    self.state.board[pos].mine = true;
                    placed += 1;
                }
            }
            Placement::Preset(coords) => {
                for &pos in coords.iter() {
                    self.state.board[pos].mine = true;
                }
            }
        }
        self.recount_adjacency();
        self.mines_placed = true;
    }

    fn recount_adjacency(&mut self) {
        for y in 0..self.board_size {
            for x in 0..self.board_size {
                if self.state.board[(x, y)].mine {
                    continue;
                }
                let count = self
                    .state
                    .board
                    .neighbors(x, y)
                    .filter(|&pos| self.state.board[pos].mine)
                    .count();
                self.state.board[(x, y)].adjacent_mines = count as u8;
            }
        }
    }

    fn flood_reveal(&mut self, x: usize, y: usize) {
        let mut pending = vec![(x, y)];
        while let Some((cx, cy)) = pending.pop() {
            if self.state.board[(cx, cy)].status != TileStatus::Hidden {
                continue;
            }
            self.state.board[(cx, cy)].status = TileStatus::Number;
            // Zero-adjacency tiles open their whole neighborhood; a zero
            // tile cannot border a mine, so no mine is ever enqueued from
            // one. Flagged tiles fail the Hidden check and stay put.
            if self.state.board[(cx, cy)].adjacent_mines == 0 {
                pending.extend(self.state.board.neighbors(cx, cy));
            }
        }
    }

    fn disclose_mines(&mut self) {
        for tile in self.state.board.tiles_mut() {
            if tile.mine {
                tile.status = TileStatus::Mine;
            }
        }
    }

    fn board_cleared(&self) -> bool {
        // Won when every safe tile is revealed; mines may be hidden or
        // flagged in any mix. Flags are never checked for correctness.
        self.state.board.tiles().all(|tile| {
            if tile.mine {
                matches!(tile.status, TileStatus::Hidden | TileStatus::Flagged)
            } else {
                tile.status == TileStatus::Number
            }
        })
    }
}

// Read-only getters for presentation layers.
impl Game {
    pub fn board_size(&self) -> usize { self.board_size }
    pub fn total_mines(&self) -> usize { self.total_mines }
    pub fn status(&self) -> GameStatus { self.state.status }
    pub fn mines_left(&self) -> i64 { self.state.mines_left }
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.state.board.tile(x, y)
    }
}
