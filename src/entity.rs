use macroquad::prelude::*;

pub const GRAVITY_ACCEL: f32 = 1.0;
pub const MAX_FALL_SPEED: f32 = 40.0;

// Shared motion state for anything that moves on the map. Positions are
// exact integer pixels, velocities stay fractional until applied.
pub struct MovingEntity {
    pub x: i32,
    pub y: i32,
    pub vx: f32,
    pub vy: f32,
    pub w: i32,
    pub h: i32,
    pub gravity: f32,
}

impl MovingEntity {
    pub fn new(x: i32, y: i32, vx: f32, vy: f32, size: (i32, i32)) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            w: size.0,
            h: size.1,
            gravity: 1.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }

    // Whole-pixel displacement for this frame, truncated toward zero.
    pub fn displacement(&self, difficulty: f32) -> (i32, i32) {
        (
            (self.vx * difficulty) as i32,
            (self.vy * difficulty) as i32,
        )
    }

    // One frame of gravity pull. `factor` is 1.0 in free fall and 0.5
    // during an active ascent.
    pub fn fall(&mut self, difficulty: f32, factor: f32) {
        self.vy = (self.vy + difficulty * GRAVITY_ACCEL * factor * self.gravity)
            .clamp(-MAX_FALL_SPEED, MAX_FALL_SPEED);
    }

    // Ground contact drops any downward velocity and keeps upward motion.
    pub fn land(&mut self) {
        self.vy = self.vy.min(0.0);
    }

    pub fn hitbox(&self) -> (i32, i32) {
        (self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_truncates_toward_zero() {
        let mut body = MovingEntity::new(0, 0, 8.0, 0.0, (50, 50));
        body.vy = -17.9;
        assert_eq!(body.displacement(1.0), (8, -17));
        assert_eq!(body.displacement(1.5), (12, -26));
    }

    #[test]
    fn fall_clamps_to_max_speed() {
        let mut body = MovingEntity::new(0, 0, 0.0, MAX_FALL_SPEED - 0.25, (50, 50));
        body.fall(2.0, 1.0);
        assert_eq!(body.vy, MAX_FALL_SPEED);
    }

    #[test]
    fn ascend_factor_halves_the_pull() {
        let mut body = MovingEntity::new(0, 0, 0.0, -10.0, (50, 50));
        body.fall(1.0, 0.5);
        assert_eq!(body.vy, -9.5);
    }

    #[test]
    fn landing_keeps_upward_velocity() {
        let mut body = MovingEntity::new(0, 0, 0.0, 12.0, (50, 50));
        body.land();
        assert_eq!(body.vy, 0.0);
        body.vy = -6.0;
        body.land();
        assert_eq!(body.vy, -6.0);
    }
}
