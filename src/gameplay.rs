use log::{debug, info};
use macroquad::prelude::*;

use crate::assets::SpriteTable;
use crate::input::InputEvent;
use crate::item::ItemManager;
use crate::map::{BLOCK_SIZE, Map, Spawn};
use crate::monster::{MONSTER_SIZE, MonsterManager};
use crate::player::Player;
use crate::score::Score;
use crate::state::{GameState, Persist, StateId};

const PLAYER_START_X: i32 = 50;
const PLAYER_SPACING: i32 = 100;
const PLAYER_START_VX: f32 = 8.0;

// The running game: one map, the players on it and everything that wants
// them dead.
pub struct Gameplay {
    persist: Persist,
    map: Map,
    players: Vec<Player>,
    items: ItemManager,
    monsters: MonsterManager,
    score: Score,
    frame: i32,
    difficulty: f32,
    done: bool,
    next: StateId,
}

impl Gameplay {
    pub fn new(persist: Persist) -> Self {
        let seed = persist.options.seed.unwrap_or_else(::rand::random);
        info!(
            "new run: seed {}, {} player(s)",
            seed,
            persist.options.players.len()
        );

        let players = persist
            .options
            .players
            .iter()
            .enumerate()
            .map(|(i, seat)| {
                Player::new(
                    PLAYER_START_X + i as i32 * PLAYER_SPACING,
                    0,
                    PLAYER_START_VX,
                    0.0,
                    &seat.skin,
                    seat.jump_key,
                )
            })
            .collect();

        Self {
            persist,
            map: Map::new(seed),
            players,
            items: ItemManager::new(),
            monsters: MonsterManager::new(),
            score: Score::new(),
            frame: 0,
            difficulty: 1.0,
            done: false,
            next: StateId::Pause,
        }
    }

    pub fn frame(&self) -> i32 {
        self.frame
    }

    pub fn score_value(&self) -> i32 {
        self.score.value()
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn items(&self) -> &ItemManager {
        &self.items
    }

    pub fn monsters(&self) -> &MonsterManager {
        &self.monsters
    }

    fn place_spawns(&mut self) {
        for spawn in self.map.take_spawns() {
            debug!("spawn {:?}", spawn);
            match spawn {
                Spawn::Item { kind, col, row } => self.items.spawn(
                    kind,
                    col * BLOCK_SIZE - self.map.scroll_px(),
                    row * BLOCK_SIZE,
                ),
                Spawn::Monster { col, row } => self.monsters.spawn(
                    col * BLOCK_SIZE - self.map.scroll_px(),
                    row * BLOCK_SIZE - MONSTER_SIZE.1,
                ),
            }
        }
    }
}

impl GameState for Gameplay {
    fn start(&mut self, persist: Persist) {
        if persist.resume {
            self.persist = persist;
            self.persist.resume = false;
            self.done = false;
        } else {
            *self = Gameplay::new(persist);
        }
    }

    fn get_event(&mut self, event: &InputEvent) {
        if let InputEvent::KeyDown(KeyCode::Escape) = event {
            self.next = StateId::Pause;
            self.done = true;
            return;
        }
        for player in &mut self.players {
            player.get_event(event, &self.map);
        }
    }

    fn update(&mut self) {
        self.score.update(self.frame);

        for player in &mut self.players {
            player.update(&self.map, self.difficulty);
        }

        let scroll_delta = self
            .players
            .iter()
            .find(|p| !p.is_dead())
            .map_or(0, |p| (p.body.vx * self.difficulty) as i32);
        self.map.update(scroll_delta);

        // Players ride the scroll like everything else. A player the terrain
        // held back drifts left and dies on the trailing edge.
        for player in &mut self.players {
            player.body.x -= scroll_delta;
            if player.off_screen_left() {
                player.kill();
            }
        }

        self.items
            .update(scroll_delta, &mut self.players, &mut self.map);
        self.map.decay_antidote_hint();

        self.monsters
            .update(&self.map, self.difficulty, scroll_delta, &mut self.players);

        self.place_spawns();

        self.frame += 1;
        let lead_mod = self
            .players
            .iter()
            .find(|p| !p.is_dead())
            .map_or(0.0, |p| p.mod_difficulty());
        self.difficulty = 1.0 + self.score.value() as f32 / 2000.0 + lead_mod;

        if self.players.iter().all(|p| p.is_dead()) {
            info!("run over at score {}", self.score.value());
            self.persist.last_score = self.score.value();
            self.next = StateId::GameOver;
            self.done = true;
        }
    }

    fn draw(&self, sprites: &SpriteTable) {
        clear_background(Color::new(0.35, 0.55, 0.85, 1.0));
        self.map.draw(sprites);
        for player in &self.players {
            player.draw(sprites);
        }
        self.items.draw(sprites);
        self.score.draw();
        self.monsters.draw(sprites);
    }

    fn done(&self) -> bool {
        self.done
    }

    fn next_state(&self) -> StateId {
        self.next
    }

    fn take_persist(&mut self) -> Persist {
        std::mem::take(&mut self.persist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Options, PlayerOptions};

    fn seeded_persist(players: usize) -> Persist {
        let seats = (0..players)
            .map(|_| PlayerOptions {
                skin: "ember".to_string(),
                jump_key: KeyCode::Space,
            })
            .collect();
        Persist {
            options: Options {
                name: "AAA".to_string(),
                seed: Some(7),
                players: seats,
            },
            ..Persist::default()
        }
    }

    #[test]
    fn players_spawn_spaced_out_per_options() {
        let game = Gameplay::new(seeded_persist(2));
        let xs: Vec<i32> = game.players().iter().map(|p| p.body.x).collect();
        assert_eq!(xs, vec![50, 150]);
        assert_eq!(game.players()[0].body.vx, 8.0);
    }

    #[test]
    fn a_run_without_a_seed_draws_its_own() {
        let mut persist = seeded_persist(1);
        persist.options.seed = None;
        let mut game = Gameplay::new(persist);
        for _ in 0..10 {
            game.update();
        }
        // Whatever seed was drawn, the flat opening stretch plays the same.
        assert_eq!(game.frame(), 10);
        assert_eq!(game.map().scroll_px(), 80);
        assert!(!game.players()[0].is_dead());
    }

    #[test]
    fn frame_counter_and_score_advance_together() {
        let mut game = Gameplay::new(seeded_persist(1));
        for _ in 0..8 {
            game.update();
        }
        // The score is fed the frame count as it stood entering the update,
        // so it trails the counter by one frame.
        assert_eq!(game.frame(), 8);
        assert_eq!(game.score_value(), 1);
        game.update();
        assert_eq!(game.score_value(), 2);
        assert!(!game.done());
    }

    #[test]
    fn scroll_follows_the_lead_player() {
        let mut game = Gameplay::new(seeded_persist(1));
        for _ in 0..3 {
            game.update();
        }
        assert_eq!(game.map().scroll_px(), 24);
        // The lead player keeps pace with the scroll and holds its column.
        assert_eq!(game.players()[0].body.x, 50);
    }

    #[test]
    fn a_dead_lead_hands_the_scroll_to_the_next_player() {
        let mut game = Gameplay::new(seeded_persist(2));
        game.players_mut()[0].kill();
        game.update();
        assert_eq!(game.map().scroll_px(), 8);
    }

    #[test]
    fn escape_requests_the_pause_screen() {
        let mut game = Gameplay::new(seeded_persist(1));
        game.get_event(&InputEvent::KeyDown(KeyCode::Escape));
        assert!(game.done());
        assert_eq!(game.next_state(), StateId::Pause);
    }

    #[test]
    fn losing_every_player_ends_the_run() {
        let mut game = Gameplay::new(seeded_persist(2));
        for _ in 0..20 {
            game.update();
        }
        for player in game.players_mut() {
            player.kill();
        }
        game.update();
        assert!(game.done());
        assert_eq!(game.next_state(), StateId::GameOver);
        assert_eq!(game.take_persist().last_score, 5);
    }

    #[test]
    fn resume_keeps_the_world_and_restart_rebuilds_it() {
        let mut game = Gameplay::new(seeded_persist(1));
        for _ in 0..5 {
            game.update();
        }
        assert_eq!(game.frame(), 5);
        game.get_event(&InputEvent::KeyDown(KeyCode::Escape));
        assert!(game.done());

        let mut persist = game.take_persist();
        persist.resume = true;
        game.start(persist);
        assert_eq!(game.frame(), 5);
        assert!(!game.done(), "a resumed run must not flip right back out");

        let persist = game.take_persist();
        game.start(persist);
        assert_eq!(game.frame(), 0);
        assert_eq!(game.map().scroll_px(), 0);
    }
}
