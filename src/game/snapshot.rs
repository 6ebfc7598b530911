use serde::Serialize;
use super::camera::Camera;
use super::entity::{Entity, EntityKind, Facing};
use super::lane::{Biome, Lane};
use super::player::{Player, PlayerState};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PlayerPose {
    pub x: f32,
    pub y: f32,
    pub hop_height: f32,
    pub state: PlayerState,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EntityView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: EntityKind,
    pub facing: Facing,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LaneView {
    pub biome: Biome,
    pub y: f32,
    pub index: u32,
    /// Rail crossing lights are on.
    pub warning: bool,
    pub entities: Vec<EntityView>,
}

/// Read-only picture of one frame for whoever draws it.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub camera_y: f32,
    pub player: PlayerPose,
    pub lanes: Vec<LaneView>,
}

impl Snapshot {
    pub fn capture(player: &Player, camera: &Camera, lanes: &[Lane]) -> Self {
        Snapshot {
            camera_y: camera.scroll_y,
            player: PlayerPose {
                x: player.x,
                y: player.y,
                hop_height: player.hop_height(),
                state: player.state,
            },
            lanes: lanes
                .iter()
                .map(|lane| LaneView {
                    biome: lane.biome(),
                    y: lane.y,
                    index: lane.index,
                    warning: lane.is_warning(),
                    entities: lane.entities.iter().map(EntityView::from).collect(),
                })
                .collect(),
        }
    }
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        EntityView {
            x: entity.x,
            y: entity.y,
            width: entity.width,
            height: entity.height,
            kind: entity.kind,
            facing: entity.facing(),
        }
    }
}
