use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use super::config::GameConfig;
use super::entity::{Entity, EntityKind};
use super::event::GameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Grass,
    Road,
    River,
    Rail,
}

impl Biome {
    pub const ALL: [Biome; 4] = [Biome::Grass, Biome::Road, Biome::River, Biome::Rail];

    /// How many lanes one batch of this biome spans.
    pub fn batch_len<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        match self {
            Biome::Rail => 1,
            Biome::Grass | Biome::Road | Biome::River => rng.gen_range(3..=5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    LeftToRight,
    RightToLeft,
}

impl Flow {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) { Flow::LeftToRight } else { Flow::RightToLeft }
    }

    pub fn sign(self) -> f32 {
        match self {
            Flow::LeftToRight => 1.0,
            Flow::RightToLeft => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Flow::LeftToRight => Flow::RightToLeft,
            Flow::RightToLeft => Flow::LeftToRight,
        }
    }

    /// Where something of `width` enters the screen when travelling this way.
    pub fn entry_x(self, width: f32, screen_width: f32) -> f32 {
        match self {
            Flow::LeftToRight => -width,
            Flow::RightToLeft => screen_width,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RailPhase {
    Quiet { remaining: f32 },
    /// Lights and bells only, the track is still safe.
    Warning { remaining: f32 },
    Passing,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LaneKind {
    Grass,
    Road { flow: Flow, speed: f32, min_interval: f32, spawn_timer: f32 },
    River { flow: Flow, speed: f32, spawn_timer: f32 },
    Rail { phase: RailPhase },
}

impl LaneKind {
    pub fn biome(&self) -> Biome {
        match self {
            LaneKind::Grass => Biome::Grass,
            LaneKind::Road { .. } => Biome::Road,
            LaneKind::River { .. } => Biome::River,
            LaneKind::Rail { .. } => Biome::Rail,
        }
    }
}

/// One tile-high strip of the world. `y` is fixed at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    pub row: i32,
    pub y: f32,
    pub index: u32,
    pub kind: LaneKind,
    pub entities: Vec<Entity>,
}

impl Lane {
    pub fn new(row: i32, index: u32, kind: LaneKind, config: &GameConfig) -> Self {
        Lane {
            row,
            y: row as f32 * config.tile_size,
            index,
            kind,
            entities: Vec::new(),
        }
    }

    /// Grass with nothing on it, used for the starting area.
    pub fn safe_grass(row: i32, index: u32, config: &GameConfig) -> Self {
        Lane::new(row, index, LaneKind::Grass, config)
    }

    pub fn grass<R: Rng + ?Sized>(row: i32, index: u32, config: &GameConfig, rng: &mut R) -> Self {
        let mut lane = Lane::safe_grass(row, index, config);
        let column_width = config.column_width();
        let layout = obstacle_columns(
            config.columns,
            config.grass.obstacle_chance,
            config.grass.max_consecutive,
            rng,
        );
        for (column, blocked) in layout.into_iter().enumerate() {
            if blocked {
                lane.entities.push(Entity::obstacle(column as f32 * column_width, lane.y, config.tile_size));
            }
        }
        lane
    }

    pub fn road<R: Rng + ?Sized>(row: i32, index: u32, flow: Flow, config: &GameConfig, rng: &mut R) -> Self {
        let road = &config.road;
        let speed = (road.base_speed + index as f32 * road.speed_per_lane) * flow.sign();
        let min_interval = (road.min_interval - index as f32 * road.interval_decay_per_lane).max(road.interval_floor);
        // Staggered so a fresh batch of roads does not release a wall of cars.
        let spawn_timer = rng.gen_range(0.0..=min_interval);
        Lane::new(row, index, LaneKind::Road { flow, speed, min_interval, spawn_timer }, config)
    }

    pub fn river<R: Rng + ?Sized>(row: i32, index: u32, flow: Flow, config: &GameConfig, rng: &mut R) -> Self {
        let river = &config.river;
        let speed = (river.base_speed + index as f32 * river.speed_per_lane) * flow.sign();
        let spawn_timer = rng.gen_range(0.0..=river.first_spawn_max);
        Lane::new(row, index, LaneKind::River { flow, speed, spawn_timer }, config)
    }

    pub fn rail<R: Rng + ?Sized>(row: i32, index: u32, config: &GameConfig, rng: &mut R) -> Self {
        let remaining = rng.gen_range(config.rail.quiet_min..=config.rail.quiet_max);
        Lane::new(row, index, LaneKind::Rail { phase: RailPhase::Quiet { remaining } }, config)
    }

    pub fn biome(&self) -> Biome {
        self.kind.biome()
    }

    pub fn flow(&self) -> Option<Flow> {
        match self.kind {
            LaneKind::Road { flow, .. } | LaneKind::River { flow, .. } => Some(flow),
            LaneKind::Grass | LaneKind::Rail { .. } => None,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.kind, LaneKind::Rail { phase: RailPhase::Warning { .. } })
    }

    pub fn contains_y(&self, y: f32, tile: f32) -> bool {
        self.y <= y && y < self.y + tile
    }

    /// Moves every entity, drops the ones that drove off, then runs the spawn timers.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, config: &GameConfig, rng: &mut R) -> Option<GameEvent> {
        for entity in &mut self.entities {
            entity.advance(dt);
        }
        let min_x = -config.entity_margin;
        let max_x = config.screen_width + config.entity_margin;
        self.entities.retain(|e| !e.has_left(min_x, max_x));

        let tile = config.tile_size;
        match &mut self.kind {
            LaneKind::Grass => None,
            LaneKind::Road { flow, speed, min_interval, spawn_timer } => {
                *spawn_timer -= dt;
                if *spawn_timer <= 0.0 {
                    let width = tile * config.road.vehicle_length;
                    let x = flow.entry_x(width, config.screen_width);
                    self.entities.push(Entity::vehicle(x, self.y, width, *speed, tile));
                    *spawn_timer = rng.gen_range(*min_interval..=*min_interval * 2.0);
                }
                None
            }
            LaneKind::River { flow, speed, spawn_timer } => {
                *spawn_timer -= dt;
                if *spawn_timer <= 0.0 {
                    let lengths = &config.river.log_lengths;
                    let width = tile * lengths[rng.gen_range(0..lengths.len())];
                    let x = flow.entry_x(width, config.screen_width);
                    self.entities.push(Entity::log(x, self.y, width, *speed, tile));
                    *spawn_timer = rng.gen_range(config.river.min_interval..=config.river.max_interval);
                }
                None
            }
            LaneKind::Rail { phase } => match *phase {
                RailPhase::Quiet { remaining } => {
                    let remaining = remaining - dt;
                    if remaining <= 0.0 {
                        debug!("rail lane {} warning", self.index);
                        *phase = RailPhase::Warning { remaining: config.rail.warning };
                        Some(GameEvent::TrainWarning { lane: self.index })
                    } else {
                        *phase = RailPhase::Quiet { remaining };
                        None
                    }
                }
                RailPhase::Warning { remaining } => {
                    let remaining = remaining - dt;
                    if remaining <= 0.0 {
                        let flow = Flow::random(rng);
                        let width = tile * config.rail.train_length;
                        let speed = config.rail.base_speed * config.rail.speed_multiplier * flow.sign();
                        let x = flow.entry_x(width, config.screen_width);
                        self.entities.push(Entity::train(x, self.y, width, speed, tile));
                        debug!("rail lane {} train passing {:?}", self.index, flow);
                        *phase = RailPhase::Passing;
                        Some(GameEvent::TrainArrived { lane: self.index })
                    } else {
                        *phase = RailPhase::Warning { remaining };
                        None
                    }
                }
                RailPhase::Passing => {
                    if !self.entities.iter().any(|e| e.kind == EntityKind::Train) {
                        let remaining = rng.gen_range(config.rail.quiet_min..=config.rail.quiet_max);
                        *phase = RailPhase::Quiet { remaining };
                    }
                    None
                }
            },
        }
    }
}

/// Rolls each column independently, but never lets a run of blocked columns
/// grow past `max_run`, so a grass lane always has a way through.
pub fn obstacle_columns<R: Rng + ?Sized>(columns: u32, chance: f64, max_run: u32, rng: &mut R) -> Vec<bool> {
    let mut layout = Vec::with_capacity(columns as usize);
    let mut run = 0;
    for _ in 0..columns {
        if rng.gen_bool(chance) && run < max_run {
            layout.push(true);
            run += 1;
        } else {
            layout.push(false);
            run = 0;
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rail_lane(remaining: f32) -> Lane {
        let config = GameConfig::default();
        Lane::new(-3, 3, LaneKind::Rail { phase: RailPhase::Quiet { remaining } }, &config)
    }

    #[test]
    fn grass_never_blocks_three_columns() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        for row in 0..500 {
            let layout = obstacle_columns(config.columns, 0.9, config.grass.max_consecutive, &mut rng);
            assert!(
                !layout.windows(3).any(|w| w.iter().all(|b| *b)),
                "three blocked columns in a row at sample {}",
                row
            );
            let lane = Lane::grass(-row, row as u32, &config, &mut rng);
            assert!(lane.entities.iter().all(|e| e.kind == EntityKind::Obstacle && e.y == lane.y));
        }
    }

    #[test]
    fn grass_obstacles_sit_on_columns() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let lane = Lane::grass(-7, 7, &config, &mut rng);
        assert_eq!(lane.y, -280.0);
        for obstacle in &lane.entities {
            assert_eq!(obstacle.x % config.column_width(), 0.0);
            assert_eq!(obstacle.speed, 0.0);
        }
    }

    #[test]
    fn road_spawns_from_its_entry_side() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut lane = Lane::road(-2, 20, Flow::RightToLeft, &config, &mut rng);
        lane.tick(config.road.min_interval + 0.01, &config, &mut rng);

        assert_eq!(lane.entities.len(), 1);
        let car = &lane.entities[0];
        assert_eq!(car.kind, EntityKind::Vehicle);
        assert_eq!(car.x, config.screen_width);
        assert_eq!(car.speed, -110.0);
    }

    #[test]
    fn road_speed_grows_with_index() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let early = Lane::road(-1, 1, Flow::LeftToRight, &config, &mut rng);
        let late = Lane::road(-400, 400, Flow::LeftToRight, &config, &mut rng);
        match (&early.kind, &late.kind) {
            (
                LaneKind::Road { speed: s0, min_interval: i0, .. },
                LaneKind::Road { speed: s1, min_interval: i1, .. },
            ) => {
                assert!(s1 > s0);
                assert!(i1 < i0);
                assert!(*i1 >= config.road.interval_floor);
            }
            _ => panic!("expected road lanes"),
        }
    }

    #[test]
    fn river_logs_use_size_classes() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut lane = Lane::river(-4, 4, Flow::LeftToRight, &config, &mut rng);
        for _ in 0..600 {
            lane.tick(1.0 / 60.0, &config, &mut rng);
        }
        assert!(!lane.entities.is_empty());
        for log in &lane.entities {
            assert_eq!(log.kind, EntityKind::Log);
            assert!([80.0, 120.0, 160.0].contains(&log.width));
            assert!(log.speed > 0.0);
        }
    }

    #[test]
    fn entities_leaving_the_window_are_dropped() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut lane = Lane::safe_grass(0, 0, &config);
        lane.entities.push(Entity::vehicle(995.0, 0.0, 60.0, 100.0, 40.0));
        lane.entities.push(Entity::vehicle(400.0, 0.0, 60.0, 100.0, 40.0));

        lane.tick(0.1, &config, &mut rng);
        assert_eq!(lane.entities.len(), 1);
        assert_eq!(lane.entities[0].x, 410.0);

        for _ in 0..100 {
            lane.tick(0.1, &config, &mut rng);
        }
        assert!(lane.entities.is_empty());
    }

    #[test]
    fn rail_cycles_through_its_phases() {
        let config = GameConfig::default();
        let mut rng = SmallRng::seed_from_u64(21);
        let mut lane = rail_lane(0.5);

        assert_eq!(lane.tick(0.4, &config, &mut rng), None);
        assert_eq!(lane.tick(0.2, &config, &mut rng), Some(GameEvent::TrainWarning { lane: 3 }));
        assert!(lane.is_warning());
        assert!(lane.entities.is_empty(), "warning must not put a train on the track");

        assert_eq!(lane.tick(1.0, &config, &mut rng), None);
        assert!(lane.entities.is_empty());
        assert_eq!(lane.tick(1.0, &config, &mut rng), Some(GameEvent::TrainArrived { lane: 3 }));
        assert_eq!(lane.kind, LaneKind::Rail { phase: RailPhase::Passing });
        assert_eq!(lane.entities.len(), 1);
        assert_eq!(lane.entities[0].kind, EntityKind::Train);
        assert_eq!(lane.entities[0].width, 400.0);
        assert_eq!(lane.entities[0].speed.abs(), 2000.0);

        let mut ticks = 0;
        while lane.kind == (LaneKind::Rail { phase: RailPhase::Passing }) {
            lane.tick(0.05, &config, &mut rng);
            ticks += 1;
            assert!(ticks < 40, "train never cleared the lane");
        }
        assert!(lane.entities.is_empty());
        match lane.kind {
            LaneKind::Rail { phase: RailPhase::Quiet { remaining } } => {
                assert!((5.0..=10.0).contains(&remaining));
            }
            ref other => panic!("expected quiet rail, got {:?}", other),
        }
    }

    #[test]
    fn flow_helpers() {
        assert_eq!(Flow::LeftToRight.reversed(), Flow::RightToLeft);
        assert_eq!(Flow::LeftToRight.entry_x(60.0, 800.0), -60.0);
        assert_eq!(Flow::RightToLeft.entry_x(60.0, 800.0), 800.0);
    }
}
