use super::config::ProgressConfig;
use super::event::GameEvent;

/// Score, XP and level for the HUD. Lives with the driver, fed by game events.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    pub score: u32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next: u32,
    pub high_score: u32,
    xp_per_hop: u32,
    first_level_xp: u32,
    growth: f32,
}

impl Progress {
    pub fn new(config: &ProgressConfig) -> Self {
        Progress {
            score: 0,
            xp: 0,
            level: 1,
            xp_to_next: config.first_level_xp,
            high_score: 0,
            xp_per_hop: config.xp_per_hop,
            first_level_xp: config.first_level_xp,
            growth: config.level_growth,
        }
    }

    /// Returns the new level when this event caused a level-up.
    pub fn apply(&mut self, event: &GameEvent) -> Option<u32> {
        match event {
            GameEvent::ForwardHop { .. } => {
                self.score += 1;
                self.xp += self.xp_per_hop;
                let mut reached = None;
                while self.xp >= self.xp_to_next {
                    self.xp -= self.xp_to_next;
                    self.level += 1;
                    self.xp_to_next = ((self.xp_to_next as f32 * self.growth).round() as u32).max(1);
                    reached = Some(self.level);
                }
                reached
            }
            GameEvent::Died(_) => {
                self.high_score = self.high_score.max(self.score);
                None
            }
            GameEvent::TrainWarning { .. } | GameEvent::TrainArrived { .. } => None,
        }
    }

    /// Starts a new run. The high score survives.
    pub fn reset(&mut self) {
        self.score = 0;
        self.xp = 0;
        self.level = 1;
        self.xp_to_next = self.first_level_xp;
    }
}
