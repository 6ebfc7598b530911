use serde::{Deserialize, Serialize};
use crate::engine::rect::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Vehicle,
    Train,
    Log,
    Player,
}

impl EntityKind {
    /// Blocks hops onto its tile.
    pub fn is_static(self) -> bool {
        matches!(self, EntityKind::Obstacle)
    }

    /// Kills on contact.
    pub fn is_lethal(self) -> bool {
        matches!(self, EntityKind::Vehicle | EntityKind::Train)
    }
}

/// Which way a sprite should face; derived from the sign of the velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Signed horizontal velocity in px/s.
    pub speed: f32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(kind: EntityKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Entity { x, y, width, height, speed: 0.0, kind }
    }

    pub fn obstacle(x: f32, y: f32, tile: f32) -> Self {
        Entity::new(EntityKind::Obstacle, x, y, tile, tile)
    }

    pub fn vehicle(x: f32, y: f32, width: f32, speed: f32, tile: f32) -> Self {
        Entity::new(EntityKind::Vehicle, x, y, width, tile - 10.0).with_speed(speed)
    }

    pub fn train(x: f32, y: f32, width: f32, speed: f32, tile: f32) -> Self {
        Entity::new(EntityKind::Train, x, y, width, tile - 10.0).with_speed(speed)
    }

    pub fn log(x: f32, y: f32, width: f32, speed: f32, tile: f32) -> Self {
        Entity::new(EntityKind::Log, x, y, width, tile).with_speed(speed)
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn advance(&mut self, dt: f32) {
        self.x += self.speed * dt;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn facing(&self) -> Facing {
        if self.speed < 0.0 { Facing::Left } else { Facing::Right }
    }

    /// True once the whole footprint sits beyond `[min_x, max_x]` on the side
    /// the entity is heading to. Entities still driving in from the far side stay.
    pub fn has_left(&self, min_x: f32, max_x: f32) -> bool {
        let past_left = self.x + self.width < min_x;
        let past_right = self.x > max_x;
        if self.speed > 0.0 {
            past_right
        } else if self.speed < 0.0 {
            past_left
        } else {
            past_left || past_right
        }
    }
}
