use super::config::GameConfig;

/// Vertical scroll that only ever moves up the world.
#[derive(Clone, Debug)]
pub struct Camera {
    pub scroll_y: f32,
    screen_height: f32,
    lead: f32,
    rate: f32,
}

impl Camera {
    pub fn new(config: &GameConfig) -> Self {
        Camera {
            scroll_y: 0.0,
            screen_height: config.screen_height,
            lead: config.camera_lead,
            rate: config.camera_rate,
        }
    }

    /// Eases towards keeping the player about two thirds down the view.
    pub fn track(&mut self, player_y: f32, dt: f32) {
        let target = player_y - self.screen_height * self.lead;
        if target < self.scroll_y {
            let step = (target - self.scroll_y) * (self.rate * dt).min(1.0);
            self.scroll_y += step;
        }
    }

    /// World Y of the bottom edge of the view.
    pub fn trailing_edge(&self) -> f32 {
        self.scroll_y + self.screen_height
    }

    pub fn to_screen(&self, y: f32) -> f32 {
        y - self.scroll_y
    }
}
