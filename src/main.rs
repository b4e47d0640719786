use log::{info, warn};
use macroquad::prelude::*;

use ridgerun::assets::SpriteTable;
use ridgerun::config::{OPTIONS_FILE, Options};
use ridgerun::input::gather_events;
use ridgerun::map::{VIEW_H, VIEW_W};
use ridgerun::score::{HighScores, SCORE_FILE};
use ridgerun::state::{Persist, StateMachine};

const FIXED_DT: f32 = 1.0 / 60.0;
const MAX_FRAME_TIME: f32 = 0.25;

fn window_conf() -> Conf {
    Conf {
        window_title: "ridgerun".to_owned(),
        window_width: VIEW_W,
        window_height: VIEW_H,
        window_resizable: false,
        sample_count: 1,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let options = match Options::load(OPTIONS_FILE) {
        Ok(options) => options,
        Err(err) => {
            warn!("options file rejected: {}, using defaults", err);
            Options::default()
        }
    };
    let high_scores = match HighScores::load(SCORE_FILE) {
        Ok(table) => table,
        Err(err) => {
            warn!("score file rejected: {}, starting fresh", err);
            HighScores::default()
        }
    };

    clear_background(BLACK);
    draw_text("loading...", 40.0, VIEW_H as f32 - 40.0, 32.0, WHITE);
    next_frame().await;

    let sprites = SpriteTable::load(&options).await;
    info!("textures ready, starting");

    let mut machine = StateMachine::new(Persist {
        options,
        high_scores,
        last_score: 0,
        resume: false,
    });

    let mut accumulator = 0.0f32;
    let mut i: f32 = 0.0;
    let mut fps: i32 = 0;

    loop {
        let frame_time = get_frame_time().min(MAX_FRAME_TIME);
        accumulator += frame_time;

        // Key edges are reported per render frame, so dispatch them before
        // the fixed ticks run.
        for event in gather_events() {
            machine.handle_event(&event);
        }

        while accumulator >= FIXED_DT {
            machine.update();
            accumulator -= FIXED_DT;
        }

        if machine.finished() {
            break;
        }

        machine.draw(&sprites);

        i += get_frame_time();
        if i >= 1.0 {
            fps = get_fps();
            i = 0.0;
        }
        draw_text(
            &format!("FPS: {:.0}", fps),
            VIEW_W as f32 - 120.0,
            40.0,
            30.0,
            WHITE,
        );

        next_frame().await;
    }
}
