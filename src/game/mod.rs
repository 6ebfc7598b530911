pub mod camera;
pub mod collision;
pub mod config;
pub mod entity;
pub mod event;
pub mod lane;
pub mod player;
pub mod progress;
pub mod snapshot;
pub mod world;

use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use crate::game::camera::Camera;
use crate::game::collision::{CollisionManager, Status};
use crate::game::config::{ConfigError, GameConfig};
use crate::game::event::{DeathCause, GameEvent};
use crate::game::player::{Direction, Player};
use crate::game::snapshot::Snapshot;
use crate::game::world::WorldGenerator;

/// What one tick produced.
///
/// `death` is the terminal signal. `status` is only the collision verdict, so
/// a player left behind or swept off screen dies with `status` still `Alive`
/// or `Riding`.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub status: Status,
    pub death: Option<DeathCause>,
    /// Furthest distance ever reached up the world, in pixels.
    pub max_distance: f32,
    pub score: u32,
    pub events: Vec<GameEvent>,
}

/// One run: the player, the camera and the world around them.
pub struct Game {
    pub config: GameConfig,
    pub player: Player,
    pub camera: Camera,
    pub world: WorldGenerator,
    pub collision: CollisionManager,
    pub status: Status,
    pub death: Option<DeathCause>,
    pub max_distance: f32,
    pub seed: u64,
    /// Furthest row a hop has been started towards. Rows grow negative going up.
    best_row: i32,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Game::with_seed(config, seed)
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Game::build(config, seed))
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(config.screen_width / 2.0, 0, &config);
        let camera = Camera::new(&config);
        let world = WorldGenerator::new(&config, SmallRng::seed_from_u64(seed));
        let collision = CollisionManager::new(&config);

        Game {
            config,
            player,
            camera,
            world,
            collision,
            status: Status::Alive,
            death: None,
            max_distance: 0.0,
            seed,
            best_row: 0,
            events: Vec::new(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.death.is_some()
    }

    pub fn score(&self) -> u32 {
        (self.max_distance / self.config.tile_size).floor() as u32
    }

    /// Tries to start a hop. Refused while hopping or dead, off the sides of
    /// the screen, or onto a tree.
    pub fn submit_move_intent(&mut self, direction: Direction) -> bool {
        if !self.player.is_idle() {
            return false;
        }
        let (x, row) = self.player.destination(direction);
        if x < 0.0 || x + self.player.width > self.config.screen_width {
            return false;
        }
        let y = row as f32 * self.config.tile_size;
        if !self.collision.can_move(x, y, self.world.active_lanes()) {
            return false;
        }
        if !self.player.start_hop(x, row) {
            return false;
        }
        if row < self.best_row {
            self.best_row = row;
            self.events.push(GameEvent::ForwardHop { row });
        }
        true
    }

    /// Advances the run by `dt` seconds: hop, world, camera, then collisions.
    /// Once the player is dead the world stays frozen.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        if self.player.is_dead() {
            return self.report(Vec::new());
        }
        let mut events = std::mem::take(&mut self.events);

        self.player.update(dt);
        self.max_distance = self.max_distance.max(-self.player.y);

        self.world.advance(self.camera.scroll_y, dt, &mut events);
        self.camera.track(self.player.y, dt);

        self.status = self.collision.resolve(&mut self.player, &self.world.lanes, dt);
        let death = match self.status {
            Status::Hit => Some(DeathCause::Hit),
            Status::Drowned => Some(DeathCause::Drowned),
            Status::Alive | Status::Riding => self.out_of_view(),
        };
        if let Some(cause) = death {
            info!("player died: {:?} at row {}, score {}", cause, self.player.row, self.score());
            self.player.die();
            self.death = Some(cause);
            events.push(GameEvent::Died(cause));
        }

        self.report(events)
    }

    pub fn snapshot_for_render(&self) -> Snapshot {
        Snapshot::capture(&self.player, &self.camera, self.world.active_lanes())
    }

    /// Fresh player, camera and world from the same config.
    pub fn restart(&mut self) {
        let config = self.config.clone();
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("restarting with seed {}", seed);
        *self = Game::build(config, seed);
    }

    fn out_of_view(&self) -> Option<DeathCause> {
        let tile = self.config.tile_size;
        if self.player.y > self.camera.trailing_edge() + tile {
            Some(DeathCause::LeftBehind)
        } else if self.player.x + self.player.width < 0.0 || self.player.x > self.config.screen_width {
            Some(DeathCause::SweptAway)
        } else {
            None
        }
    }

    fn report(&self, events: Vec<GameEvent>) -> TickReport {
        TickReport {
            status: self.status,
            death: self.death,
            max_distance: self.max_distance,
            score: self.score(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::Entity;
    use crate::game::lane::{Flow, Lane, LaneKind};

    fn game() -> Game {
        Game::with_seed(GameConfig::default(), 1234).unwrap()
    }

    fn hop(game: &mut Game, direction: Direction) -> Vec<GameEvent> {
        assert!(game.submit_move_intent(direction), "{:?} refused", direction);
        let mut events = game.tick(0.15).events;
        events.extend(game.tick(0.01).events);
        events
    }

    fn forward_hops(events: &[GameEvent]) -> usize {
        events.iter().filter(|e| matches!(e, GameEvent::ForwardHop { .. })).count()
    }

    #[test]
    fn regaining_lost_ground_is_not_a_forward_hop() {
        let mut game = game();
        let mut progress = crate::game::progress::Progress::new(&game.config.progress);
        for _ in 0..3 {
            for direction in [Direction::Down, Direction::Up] {
                for event in hop(&mut game, direction) {
                    progress.apply(&event);
                }
            }
        }
        assert_eq!(game.score(), 0);
        assert_eq!(progress.score, 0);
        assert_eq!(progress.xp, 0);

        assert_eq!(forward_hops(&hop(&mut game, Direction::Up)), 1);
        assert_eq!(forward_hops(&hop(&mut game, Direction::Down)), 0);
        assert_eq!(forward_hops(&hop(&mut game, Direction::Up)), 0);
        assert_eq!(forward_hops(&hop(&mut game, Direction::Up)), 1);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn invalid_config_is_refused_up_front() {
        let mut config = GameConfig::default();
        config.grass.obstacle_chance = 1.5;
        assert!(matches!(
            Game::with_seed(config, 1),
            Err(ConfigError::Invalid { field: "grass.obstacle_chance", .. })
        ));

        let mut config = GameConfig::default();
        config.camera_rate = -5.0;
        assert!(Game::new(config).is_err());
    }

    #[test]
    fn forward_hop_is_reported_on_next_tick() {
        let mut game = game();
        assert!(game.submit_move_intent(Direction::Up));
        let report = game.tick(0.01);
        assert_eq!(report.events, vec![GameEvent::ForwardHop { row: -1 }]);
        assert!(game.tick(0.01).events.iter().all(|e| !matches!(e, GameEvent::ForwardHop { .. })));
    }

    #[test]
    fn sideways_and_backwards_hops_do_not_score() {
        let mut game = game();
        assert!(game.submit_move_intent(Direction::Down));
        let report = game.tick(0.15);
        assert!(report.events.is_empty());
        assert_eq!(game.player.y, 40.0);
        assert_eq!(report.score, 0);
        assert_eq!(report.max_distance, 0.0);
    }

    #[test]
    fn hops_past_the_screen_edge_are_refused() {
        let mut game = game();
        game.player = Player::new(760.0, 0, &game.config);
        assert!(!game.submit_move_intent(Direction::Right));
        assert!(game.submit_move_intent(Direction::Left));

        game.player = Player::new(0.0, 0, &game.config);
        assert!(!game.submit_move_intent(Direction::Left));
    }

    #[test]
    fn carried_off_screen_by_a_log() {
        let mut game = game();
        let kind = LaneKind::River { flow: Flow::RightToLeft, speed: -80.0, spawn_timer: 99.0 };
        let mut river = Lane::new(0, 0, kind, &game.config);
        river.entities.push(Entity::log(-20.0, 0.0, 120.0, -80.0, 40.0));
        game.world.lanes[0] = river;
        game.player = Player::new(10.0, 0, &game.config);

        let mut death = None;
        for _ in 0..60 {
            let report = game.tick(1.0 / 30.0);
            if report.death.is_some() {
                death = report.death;
                break;
            }
            assert_eq!(report.status, Status::Riding);
        }
        assert_eq!(death, Some(DeathCause::SweptAway));
    }

    #[test]
    fn left_behind_by_the_camera() {
        let mut game = game();
        game.camera.scroll_y = -2000.0;
        let report = game.tick(0.016);
        assert_eq!(report.death, Some(DeathCause::LeftBehind));
        assert_eq!(report.status, Status::Alive);
        assert!(game.player.is_dead());
    }

    #[test]
    fn snapshot_mirrors_the_world() {
        let mut game = game();
        for _ in 0..30 {
            game.tick(1.0 / 60.0);
        }
        let snapshot = game.snapshot_for_render();
        assert_eq!(snapshot.lanes.len(), game.world.lanes.len());
        assert_eq!(snapshot.player.x, 400.0);
        assert_eq!(snapshot.player.hop_height, 0.0);
        assert_eq!(snapshot.camera_y, game.camera.scroll_y);
        for pair in snapshot.lanes.windows(2) {
            assert!(pair[1].y < pair[0].y);
        }
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"biome\":\"Grass\""));
    }

    #[test]
    fn restart_builds_a_fresh_run() {
        let mut game = game();
        game.submit_move_intent(Direction::Up);
        game.tick(0.2);
        game.player.die();
        game.restart();
        assert!(!game.is_over());
        assert!(game.player.is_idle());
        assert_eq!(game.player.y, 0.0);
        assert_eq!(game.max_distance, 0.0);
        assert_eq!(game.world.lanes.len(), 5);
    }
}
