use log::warn;
use serde::Serialize;
use crate::engine::rect::Rect;
use super::config::GameConfig;
use super::lane::{Biome, Lane};
use super::player::Player;

// Hitbox tuning in pixels.
const MOVE_PROBE_INSET: f32 = 5.0;
const HIT_SHRINK: f32 = 4.0;
const LOG_GRACE: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Status {
    Alive,
    Riding,
    Hit,
    Drowned,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Hit | Status::Drowned)
    }
}

/// Stateless judge of hops and contacts. The player and lanes are lent per call.
#[derive(Clone, Debug)]
pub struct CollisionManager {
    tile_size: f32,
}

impl CollisionManager {
    pub fn new(config: &GameConfig) -> Self {
        CollisionManager { tile_size: config.tile_size }
    }

    /// Static obstacle check for a hop landing at (`target_x`, `target_y`).
    /// Only trees and rocks block; traffic and logs are judged after the hop.
    pub fn can_move(&self, target_x: f32, target_y: f32, lanes: &[Lane]) -> bool {
        let probe = Rect::new(
            target_x + MOVE_PROBE_INSET,
            target_y + MOVE_PROBE_INSET,
            self.tile_size - 2.0 * MOVE_PROBE_INSET,
            self.tile_size - 2.0 * MOVE_PROBE_INSET,
        );
        !lanes
            .iter()
            .filter(|lane| (lane.y - target_y).abs() < self.tile_size)
            .flat_map(|lane| lane.entities.iter())
            .any(|entity| entity.kind.is_static() && probe.intersects(&entity.rect()))
    }

    pub fn lane_under<'a>(&self, y: f32, lanes: &'a [Lane]) -> Option<&'a Lane> {
        lanes.iter().find(|lane| lane.contains_y(y, self.tile_size))
    }

    /// Judges the player against the lane under their centre. Riding moves the player with the log.
    pub fn resolve(&self, player: &mut Player, lanes: &[Lane], dt: f32) -> Status {
        let body = player.rect();
        let Some(lane) = self.lane_under(body.center_y(), lanes) else {
            warn!("no lane under player at y={}, generation fell behind", player.y);
            return Status::Alive;
        };

        match lane.biome() {
            Biome::Road | Biome::Rail => {
                let hitbox = body.inflate(-HIT_SHRINK, -HIT_SHRINK);
                if lane.entities.iter().any(|e| e.rect().intersects(&hitbox)) {
                    Status::Hit
                } else {
                    Status::Alive
                }
            }
            Biome::River => {
                let log = lane
                    .entities
                    .iter()
                    .find(|e| e.rect().inflate(LOG_GRACE, LOG_GRACE).intersects(&body));
                match log {
                    Some(log) => {
                        player.shift_x(log.speed * dt);
                        Status::Riding
                    }
                    // Still in the air over water: judged once the hop lands.
                    None if !player.is_grounded() => Status::Alive,
                    None => Status::Drowned,
                }
            }
            Biome::Grass => Status::Alive,
        }
    }
}
