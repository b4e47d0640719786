use log::{debug, warn};
use macroquad::prelude::*;

use crate::assets::SpriteTable;
use crate::config::Options;
use crate::gameplay::Gameplay;
use crate::input::InputEvent;
use crate::map::{VIEW_H, VIEW_W};
use crate::score::{HighScores, SCORE_FILE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateId {
    Gameplay,
    Pause,
    GameOver,
}

// Everything that survives a state flip.
#[derive(Default)]
pub struct Persist {
    pub options: Options,
    pub high_scores: HighScores,
    pub last_score: i32,
    pub resume: bool,
}

pub trait GameState {
    fn start(&mut self, persist: Persist);
    fn get_event(&mut self, event: &InputEvent);
    fn update(&mut self);
    fn draw(&self, sprites: &SpriteTable);
    fn done(&self) -> bool;
    fn quit(&self) -> bool {
        false
    }
    fn next_state(&self) -> StateId;
    fn take_persist(&mut self) -> Persist;
}

// Owns every screen and routes events and updates to the active one.
pub struct StateMachine {
    gameplay: Gameplay,
    pause: Pause,
    game_over: GameOver,
    active: StateId,
    finished: bool,
}

impl StateMachine {
    pub fn new(persist: Persist) -> Self {
        Self {
            gameplay: Gameplay::new(persist),
            pause: Pause::new(),
            game_over: GameOver::new(),
            active: StateId::Gameplay,
            finished: false,
        }
    }

    fn active_ref(&self) -> &dyn GameState {
        match self.active {
            StateId::Gameplay => &self.gameplay,
            StateId::Pause => &self.pause,
            StateId::GameOver => &self.game_over,
        }
    }

    fn active_mut(&mut self) -> &mut dyn GameState {
        match self.active {
            StateId::Gameplay => &mut self.gameplay,
            StateId::Pause => &mut self.pause,
            StateId::GameOver => &mut self.game_over,
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        self.active_mut().get_event(event);
    }

    pub fn update(&mut self) {
        if self.active_ref().quit() {
            self.finished = true;
        } else if self.active_ref().done() {
            self.flip();
        }
        self.active_mut().update();
    }

    pub fn draw(&self, sprites: &SpriteTable) {
        self.active_ref().draw(sprites);
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn active_id(&self) -> StateId {
        self.active
    }

    fn flip(&mut self) {
        let next = self.active_ref().next_state();
        debug!("state flip {:?} -> {:?}", self.active, next);
        let persist = self.active_mut().take_persist();
        self.active = next;
        self.active_mut().start(persist);
    }
}

// Freeze screen. The gameplay state stays allocated underneath and is
// resumed untouched when the player comes back.
pub struct Pause {
    persist: Persist,
    done: bool,
    quit: bool,
}

impl Pause {
    pub fn new() -> Self {
        Self {
            persist: Persist::default(),
            done: false,
            quit: false,
        }
    }
}

impl GameState for Pause {
    fn start(&mut self, persist: Persist) {
        self.persist = persist;
        self.done = false;
        self.quit = false;
    }

    fn get_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(KeyCode::Escape) => {
                self.persist.resume = true;
                self.done = true;
            }
            InputEvent::KeyDown(KeyCode::Q) => self.quit = true,
            _ => {}
        }
    }

    fn update(&mut self) {}

    fn draw(&self, _sprites: &SpriteTable) {
        draw_rectangle(
            0.0,
            0.0,
            VIEW_W as f32,
            VIEW_H as f32,
            Color::new(0.0, 0.0, 0.0, 0.85),
        );
        draw_centered("Paused", VIEW_H as f32 / 2.0 - 40.0, 48, WHITE);
        draw_centered("Esc to resume, Q to quit", VIEW_H as f32 / 2.0 + 20.0, 28, GRAY);
    }

    fn done(&self) -> bool {
        self.done
    }

    fn quit(&self) -> bool {
        self.quit
    }

    fn next_state(&self) -> StateId {
        StateId::Gameplay
    }

    fn take_persist(&mut self) -> Persist {
        std::mem::take(&mut self.persist)
    }
}

// End screen. Records the finished run into the high-score table on entry
// and writes the table back to disk.
pub struct GameOver {
    persist: Persist,
    made_the_table: bool,
    done: bool,
    quit: bool,
}

impl GameOver {
    pub fn new() -> Self {
        Self {
            persist: Persist::default(),
            made_the_table: false,
            done: false,
            quit: false,
        }
    }
}

impl GameState for GameOver {
    fn start(&mut self, persist: Persist) {
        self.persist = persist;
        self.done = false;
        self.quit = false;

        let name = self.persist.options.name.clone();
        let value = self.persist.last_score;
        self.made_the_table = self.persist.high_scores.record(&name, value);
        if self.made_the_table {
            if let Err(err) = self.persist.high_scores.save(SCORE_FILE) {
                warn!("could not save high scores: {}", err);
            }
        }
    }

    fn get_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(KeyCode::Enter) => {
                self.persist.resume = false;
                self.done = true;
            }
            InputEvent::KeyDown(KeyCode::Escape) => self.quit = true,
            _ => {}
        }
    }

    fn update(&mut self) {}

    fn draw(&self, _sprites: &SpriteTable) {
        draw_rectangle(
            0.0,
            0.0,
            VIEW_W as f32,
            VIEW_H as f32,
            Color::new(0.05, 0.0, 0.0, 1.0),
        );
        draw_centered("Game over", 160.0, 56, RED);
        let line = if self.made_the_table {
            format!("Score: {}  (made the table!)", self.persist.last_score)
        } else {
            format!("Score: {}", self.persist.last_score)
        };
        draw_centered(&line, 220.0, 32, WHITE);

        for (i, entry) in self.persist.high_scores.entries().iter().enumerate() {
            let text = format!("{:2}. {}  {}", i + 1, entry.name, entry.value);
            draw_centered(&text, 280.0 + i as f32 * 32.0, 28, GRAY);
        }

        draw_centered("Enter to run again, Esc to quit", VIEW_H as f32 - 60.0, 28, GRAY);
    }

    fn done(&self) -> bool {
        self.done
    }

    fn quit(&self) -> bool {
        self.quit
    }

    fn next_state(&self) -> StateId {
        StateId::Gameplay
    }

    fn take_persist(&mut self) -> Persist {
        std::mem::take(&mut self.persist)
    }
}

fn draw_centered(text: &str, y: f32, font_size: u16, color: Color) {
    let dims = measure_text(text, None, font_size, 1.0);
    draw_text(
        text,
        (VIEW_W as f32 - dims.width) / 2.0,
        y,
        font_size as f32,
        color,
    );
}
