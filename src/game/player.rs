use serde::{Deserialize, Serialize};
use crate::engine::rect::Rect;
use super::config::GameConfig;

// Float accumulation of many small dt steps must still land the hop.
const HOP_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// One tile step as (columns, rows). Up is towards negative rows.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PlayerState {
    Idle,
    Hopping,
    Dead,
}

/// Height of the jump arc at `progress`: zero at both ends, `peak` halfway.
pub fn hop_arc(peak: f32, progress: f32) -> f32 {
    4.0 * peak * progress * (1.0 - progress)
}

/// The chicken. Rows are integers so forward progress never drifts;
/// `x` stays a float because logs carry it sideways.
#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub row: i32,
    pub state: PlayerState,
    pub start_x: f32,
    pub start_row: i32,
    pub target_x: f32,
    pub target_row: i32,
    pub progress: f32,
    elapsed: f32,
    tile_size: f32,
    hop_duration: f32,
    hop_peak: f32,
}

impl Player {
    pub fn new(x: f32, row: i32, config: &GameConfig) -> Self {
        Player {
            x,
            y: row as f32 * config.tile_size,
            width: config.player_size,
            height: config.player_size,
            row,
            state: PlayerState::Idle,
            start_x: x,
            start_row: row,
            target_x: x,
            target_row: row,
            progress: 0.0,
            elapsed: 0.0,
            tile_size: config.tile_size,
            hop_duration: config.hop_duration,
            hop_peak: config.hop_height,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.state == PlayerState::Hopping
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    pub fn is_idle(&self) -> bool {
        self.state == PlayerState::Idle
    }

    pub fn target_y(&self) -> f32 {
        self.target_row as f32 * self.tile_size
    }

    /// Where a hop in `direction` would land, as (x, row).
    pub fn destination(&self, direction: Direction) -> (f32, i32) {
        let (dx, drow) = direction.step();
        (self.target_x + dx as f32 * self.tile_size, self.target_row + drow)
    }

    pub fn hop_height(&self) -> f32 {
        match self.state {
            PlayerState::Hopping => hop_arc(self.hop_peak, self.progress),
            PlayerState::Idle | PlayerState::Dead => 0.0,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.hop_height() <= 0.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Starts a hop towards (`x`, `row`). Refused unless idle.
    pub fn start_hop(&mut self, x: f32, row: i32) -> bool {
        if self.state != PlayerState::Idle {
            return false;
        }
        self.state = PlayerState::Hopping;
        self.start_x = self.x;
        self.start_row = self.row;
        self.target_x = x;
        self.target_row = row;
        self.progress = 0.0;
        self.elapsed = 0.0;
        true
    }

    pub fn update(&mut self, dt: f32) {
        if self.state != PlayerState::Hopping {
            return;
        }
        self.elapsed += dt;
        let t = (self.elapsed / self.hop_duration).min(1.0);
        if t >= 1.0 - HOP_EPSILON {
            self.land();
            return;
        }
        self.progress = t;
        let start_y = self.start_row as f32 * self.tile_size;
        self.x = self.start_x + (self.target_x - self.start_x) * t;
        self.y = start_y + (self.target_y() - start_y) * t;
    }

    /// Carries the player sideways, hop included.
    pub fn shift_x(&mut self, dx: f32) {
        self.x += dx;
        self.start_x += dx;
        self.target_x += dx;
    }

    pub fn die(&mut self) {
        self.state = PlayerState::Dead;
    }

    fn land(&mut self) {
        self.state = PlayerState::Idle;
        self.progress = 0.0;
        self.elapsed = 0.0;
        self.x = self.target_x;
        self.row = self.target_row;
        self.y = self.target_y();
    }
}
