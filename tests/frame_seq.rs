/// End-to-end frame sequences through the gameplay state, no window needed:
/// the state is driven exactly the way the state machine drives it.
use macroquad::prelude::KeyCode;

use ridgerun::config::{Options, PlayerOptions};
use ridgerun::gameplay::Gameplay;
use ridgerun::input::InputEvent;
use ridgerun::player::Action;
use ridgerun::state::{GameState, Persist, StateId};

fn persist_with_seed(seed: u64) -> Persist {
    Persist {
        options: Options {
            name: "AAA".to_string(),
            seed: Some(seed),
            players: vec![PlayerOptions {
                skin: "ember".to_string(),
                jump_key: KeyCode::Space,
            }],
        },
        ..Persist::default()
    }
}

// ── Opening ──────────────────────────────────────────────────────────────────

/// A fresh run drops the player onto the flat opening stretch: one minute
/// of frames in, the player is grounded, running and the world has
/// scrolled past them at full speed.
#[test]
fn the_opening_gives_a_clean_running_start() {
    let mut game = Gameplay::new(persist_with_seed(7));
    for _ in 0..60 {
        game.update();
    }

    assert_eq!(game.frame(), 60);
    assert!(!game.done());
    let player = &game.players()[0];
    assert!(!player.is_dead());
    assert_eq!(player.action(), Action::Running);
    // The lead player holds its screen column while the terrain streams by.
    assert_eq!(player.body.x, 50);
    assert_eq!(game.map().scroll_px(), 480);
}

/// Jump input travels from the event queue through the state into the
/// player: press to ascend, leave the ground, release to drop into the
/// jumping fall.
#[test]
fn jump_commands_flow_from_events_to_the_player() {
    let mut game = Gameplay::new(persist_with_seed(7));
    for _ in 0..60 {
        game.update();
    }
    assert_eq!(game.players()[0].action(), Action::Running);

    game.get_event(&InputEvent::KeyDown(KeyCode::Space));
    assert_eq!(game.players()[0].action(), Action::Ascend);

    game.update();
    assert!(!game.map().object_on_the_ground(&game.players()[0].body));

    game.get_event(&InputEvent::KeyUp(KeyCode::Space));
    assert_eq!(game.players()[0].action(), Action::Jumping);
}

// ── Spawns and endings ───────────────────────────────────────────────────────

/// Somewhere in the first stretch of any world the generator hands items
/// or monsters to the managers. A hopping player keeps the run alive long
/// enough to see it happen.
#[test]
fn terrain_spawns_reach_the_item_and_monster_managers() {
    for seed in 1..=5u64 {
        let mut game = Gameplay::new(persist_with_seed(seed));
        for _ in 0..4000 {
            game.get_event(&InputEvent::KeyDown(KeyCode::Space));
            game.update();
            if !game.items().is_empty() || !game.monsters().is_empty() {
                return;
            }
        }
    }
    panic!("five seeds produced no item or monster near the player");
}

/// A player who never jumps cannot outlive the terrain. The run must end
/// with the game-over flip and carry the final score across.
#[test]
fn a_coasting_run_always_reaches_the_game_over_flip() {
    let mut game = Gameplay::new(persist_with_seed(11));
    let mut frames = 0;
    while !game.done() && frames < 5000 {
        game.update();
        frames += 1;
    }

    assert!(game.done(), "nobody died in {frames} frames of coasting");
    assert_eq!(game.next_state(), StateId::GameOver);
    let persist = game.take_persist();
    assert!(persist.last_score > 0);
    assert_eq!(persist.last_score, game.score_value());
}
