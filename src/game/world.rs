use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::Rng;
use super::config::GameConfig;
use super::event::GameEvent;
use super::lane::{Biome, Flow, Lane};

/// A run of same-biome lanes generated in one go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Batch {
    pub biome: Biome,
    pub len: u32,
}

/// Owns the live lanes and grows the world ahead of the camera.
pub struct WorldGenerator {
    pub lanes: Vec<Lane>,
    config: GameConfig,
    rng: SmallRng,
    frontier_row: i32,
    next_index: u32,
    last_biome: Option<Biome>,
}

impl WorldGenerator {
    pub fn new(config: &GameConfig, rng: SmallRng) -> Self {
        let mut world = WorldGenerator {
            lanes: Vec::new(),
            config: config.clone(),
            rng,
            frontier_row: 0,
            next_index: 0,
            last_biome: None,
        };
        for _ in 0..config.safe_lanes {
            let lane = Lane::safe_grass(world.frontier_row, world.next_index, &world.config);
            world.push(lane);
        }
        world
    }

    /// Y of the next lane to be generated. Always above every live lane.
    pub fn frontier_y(&self) -> f32 {
        self.frontier_row as f32 * self.config.tile_size
    }

    pub fn last_biome(&self) -> Option<Biome> {
        self.last_biome
    }

    /// Live lanes, oldest first, which is also bottom of the world first.
    pub fn active_lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane_at_row(&self, row: i32) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.row == row)
    }

    /// Culls lanes below the camera, generates ahead of it and ticks what is left.
    /// Rail cues raised by the lanes are appended to `events`.
    pub fn advance(&mut self, camera_y: f32, dt: f32, events: &mut Vec<GameEvent>) {
        let cull_below = camera_y + self.config.screen_height + self.config.lane_cull_buffer;
        let before = self.lanes.len();
        self.lanes.retain(|lane| lane.y < cull_below);
        if self.lanes.len() != before {
            trace!("culled {} lanes below y={}", before - self.lanes.len(), cull_below);
        }

        let generate_until = camera_y - self.config.generation_buffer;
        while self.frontier_y() > generate_until {
            self.generate_batch();
        }

        for lane in &mut self.lanes {
            if let Some(event) = lane.tick(dt, &self.config, &mut self.rng) {
                events.push(event);
            }
        }
    }

    /// Picks a biome other than the previous one and lays down its lanes.
    pub fn generate_batch(&mut self) -> Batch {
        let candidates: Vec<Biome> = Biome::ALL
            .iter()
            .copied()
            .filter(|biome| Some(*biome) != self.last_biome)
            .collect();
        let biome = candidates[self.rng.gen_range(0..candidates.len())];
        let len = biome.batch_len(&mut self.rng);
        debug!("batch {:?} x{} from row {}", biome, len, self.frontier_row);

        // Rivers weave: each lane flows against the one below it.
        let mut flow = Flow::random(&mut self.rng);
        for _ in 0..len {
            let row = self.frontier_row;
            let index = self.next_index;
            let lane = match biome {
                Biome::Grass => Lane::grass(row, index, &self.config, &mut self.rng),
                Biome::Road => {
                    let direction = Flow::random(&mut self.rng);
                    Lane::road(row, index, direction, &self.config, &mut self.rng)
                }
                Biome::River => {
                    let lane = Lane::river(row, index, flow, &self.config, &mut self.rng);
                    flow = flow.reversed();
                    lane
                }
                Biome::Rail => Lane::rail(row, index, &self.config, &mut self.rng),
            };
            self.push(lane);
        }
        self.last_biome = Some(biome);
        Batch { biome, len }
    }

    fn push(&mut self, lane: Lane) {
        self.lanes.push(lane);
        self.frontier_row -= 1;
        self.next_index += 1;
    }
}
