use macroquad::prelude::*;

use crate::assets::SpriteTable;
use crate::entity::MovingEntity;
use crate::input::InputEvent;
use crate::map::Map;

pub const JUMP_IMPULSE: f32 = 18.0;
pub const DOUBLE_JUMP_IMPULSE: f32 = 18.0;
pub const ASCEND_FRAMES: u32 = 12;
pub const SPRITE_FRAMES: u32 = 5;
pub const RUN_CYCLE: [usize; 4] = [0, 1, 2, 1];

const SLOWDOWN_STEP: f32 = 0.25;
const SLOWDOWN_FLOOR: f32 = -0.5;
const SLOWDOWN_DECAY: f32 = 0.001;

pub const PLAYER_SIZE: (i32, i32) = (50, 50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Running,
    Jumping,
    Ascend,
}

#[derive(Clone, Copy, Debug)]
pub enum ActionEvent {
    JumpPressed { grounded: bool, double_jump: bool },
    JumpReleased,
    Tick { grounded: bool, ascend_expired: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionEffect {
    Nothing,
    StartAscend,
    DoubleJump,
    Land,
    AscendPull,
    FallPull,
}

/// The whole transition table in one place. Pure: effects are applied by the
/// caller, so the table can be exercised without any physics attached.
pub fn step_action(action: Action, event: ActionEvent) -> (Action, ActionEffect) {
    use Action::*;
    use ActionEffect::*;
    use ActionEvent::*;

    match (action, event) {
        (_, JumpPressed { grounded: true, .. }) => (Ascend, StartAscend),
        (Jumping, JumpPressed { double_jump: true, .. }) => (Jumping, DoubleJump),
        (a, JumpPressed { .. }) => (a, Nothing),
        (Ascend, JumpReleased) => (Jumping, Nothing),
        (a, JumpReleased) => (a, Nothing),
        (Ascend, Tick { ascend_expired: false, .. }) => (Ascend, AscendPull),
        (Ascend, Tick { ascend_expired: true, .. }) => (Jumping, FallPull),
        (_, Tick { grounded: true, .. }) => (Running, Land),
        (_, Tick { grounded: false, .. }) => (Jumping, FallPull),
    }
}

// Ping-pong run animation: the cycle index advances once every
// `SPRITE_FRAMES` running frames through `RUN_CYCLE`.
struct RunAnimation {
    timer: u32,
    cycle_pos: usize,
}

impl RunAnimation {
    fn new() -> Self {
        Self {
            timer: 0,
            cycle_pos: 0,
        }
    }

    fn tick(&mut self) {
        self.timer += 1;
        if self.timer >= SPRITE_FRAMES {
            self.timer = 0;
            self.cycle_pos = (self.cycle_pos + 1) % RUN_CYCLE.len();
        }
    }

    fn frame(&self) -> usize {
        RUN_CYCLE[self.cycle_pos]
    }
}

pub struct Player {
    pub body: MovingEntity,
    skin: String,
    jump_key: KeyCode,
    action: Action,
    ascend_frames: u32,
    double_jump_available: bool,
    anim: RunAnimation,
    poison: i32,
    mod_difficulty: f32,
    is_dead: bool,
}

impl Player {
    pub fn new(x0: i32, y0: i32, vx0: f32, vy0: f32, skin: &str, jump_key: KeyCode) -> Self {
        Self {
            body: MovingEntity::new(x0, y0, vx0, vy0, PLAYER_SIZE),
            skin: skin.to_string(),
            jump_key,
            action: Action::Jumping,
            ascend_frames: 0,
            double_jump_available: false,
            anim: RunAnimation::new(),
            poison: -1,
            mod_difficulty: 0.0,
            is_dead: false,
        }
    }

    pub fn get_event(&mut self, event: &InputEvent, map: &Map) {
        if self.is_dead {
            return;
        }
        match *event {
            InputEvent::KeyDown(key) if key == self.jump_key => {
                let event = ActionEvent::JumpPressed {
                    grounded: map.object_on_the_ground(&self.body),
                    double_jump: self.double_jump_available,
                };
                self.step(event);
            }
            InputEvent::KeyUp(key) if key == self.jump_key => {
                self.step(ActionEvent::JumpReleased);
            }
            _ => {}
        }
    }

    pub fn update(&mut self, map: &Map, difficulty: f32) {
        if self.is_dead {
            return;
        }

        self.ascend_frames += 1;

        let (dx, dy) = self.body.displacement(difficulty);
        let (fatal, (x, y)) = map.move_test(self.body.x, self.body.y, self.body.hitbox(), dx, dy);
        self.body.x = x;
        self.body.y = y;
        self.is_dead = fatal;

        let tick = ActionEvent::Tick {
            grounded: map.object_on_the_ground(&self.body),
            ascend_expired: self.ascend_frames > ASCEND_FRAMES,
        };
        let effect = self.step(tick);
        self.apply_pull(effect, difficulty);

        if self.action == Action::Running {
            self.anim.tick();
        }

        if self.poison == 0 {
            self.is_dead = true;
        }
        if self.poison != -1 {
            self.poison -= 1;
        }

        self.mod_difficulty = (self.mod_difficulty + SLOWDOWN_DECAY).min(0.0);
    }

    fn step(&mut self, event: ActionEvent) -> ActionEffect {
        let (next, effect) = step_action(self.action, event);
        self.action = next;
        match effect {
            ActionEffect::StartAscend => {
                self.body.vy = self.body.vy.min(-JUMP_IMPULSE);
                self.ascend_frames = 0;
            }
            ActionEffect::DoubleJump => {
                self.double_jump_available = false;
                self.body.vy = -DOUBLE_JUMP_IMPULSE;
            }
            ActionEffect::Land => {
                self.body.land();
                self.double_jump_available = true;
            }
            ActionEffect::Nothing | ActionEffect::AscendPull | ActionEffect::FallPull => {}
        }
        effect
    }

    fn apply_pull(&mut self, effect: ActionEffect, difficulty: f32) {
        match effect {
            ActionEffect::AscendPull => self.body.fall(difficulty, 0.5),
            ActionEffect::FallPull => self.body.fall(difficulty, 1.0),
            _ => {}
        }
    }

    // Applied on pickup; `-1` clears an active poisoning.
    pub fn set_poison(&mut self, frames: i32) {
        self.poison = frames;
    }

    pub fn poison(&self) -> i32 {
        self.poison
    }

    // Temporary difficulty relief, decaying back toward zero each frame.
    pub fn apply_slowdown(&mut self) {
        self.mod_difficulty = (self.mod_difficulty - SLOWDOWN_STEP).max(SLOWDOWN_FLOOR);
    }

    pub fn mod_difficulty(&self) -> f32 {
        self.mod_difficulty
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn kill(&mut self) {
        self.is_dead = true;
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn double_jump_available(&self) -> bool {
        self.double_jump_available
    }

    pub fn skin(&self) -> &str {
        &self.skin
    }

    pub fn sprite_name(&self) -> &'static str {
        match self.action {
            Action::Jumping => "jump",
            Action::Ascend => "ascend",
            Action::Running => match self.anim.frame() {
                0 => "run0",
                1 => "run1",
                _ => "run2",
            },
        }
    }

    pub fn off_screen_left(&self) -> bool {
        self.body.x + self.body.w < 0
    }

    pub fn draw(&self, sprites: &SpriteTable) {
        if self.is_dead {
            return;
        }
        let set = sprites.player(&self.skin);
        let texture = match self.action {
            Action::Jumping => &set.jump,
            Action::Ascend => &set.ascend,
            Action::Running => &set.run[self.anim.frame()],
        };
        draw_texture_ex(
            texture,
            self.body.x as f32,
            self.body.y as f32,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(self.body.w as f32, self.body.h as f32)),
                ..Default::default()
            },
        );
        if self.poison != -1 {
            draw_text(
                &self.poison.to_string(),
                (self.body.x - 25) as f32,
                (self.body.y - 25) as f32,
                24.0,
                set.color,
            );
        }
    }
}
