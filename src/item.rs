use log::debug;
use macroquad::prelude::*;

use crate::assets::SpriteTable;
use crate::entity::MovingEntity;
use crate::map::{BLOCK_SIZE, Map, VIEW_W};
use crate::player::Player;

// Frames a poisoned player has left to find an antidote.
pub const POISON_FRAMES: i32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Poison,
    Antidote,
    Slowdown,
}

pub struct Item {
    kind: ItemKind,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl Item {
    fn new(kind: ItemKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            w: BLOCK_SIZE,
            h: BLOCK_SIZE,
        }
    }

    fn overlaps(&self, body: &MovingEntity) -> bool {
        self.x < body.x + body.w
            && self.x + self.w > body.x
            && self.y < body.y + body.h
            && self.y + self.h > body.y
    }

    fn apply(&self, player: &mut Player, map: &mut Map) {
        debug!("{:?} picked up at ({}, {})", self.kind, self.x, self.y);
        match self.kind {
            ItemKind::Poison => {
                // Already-poisoned players are not reset; the pill is wasted.
                if player.poison() == -1 {
                    player.set_poison(POISON_FRAMES);
                    map.set_antidote_hint(POISON_FRAMES);
                }
            }
            ItemKind::Antidote => {
                player.set_poison(-1);
                map.set_antidote_hint(0);
            }
            ItemKind::Slowdown => player.apply_slowdown(),
        }
    }
}

pub struct ItemManager {
    items: Vec<Item>,
}

impl ItemManager {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn spawn(&mut self, kind: ItemKind, x: i32, y: i32) {
        self.items.push(Item::new(kind, x, y));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // Scrolls every item with the terrain, drops the ones that left the
    // viewport and hands each touched item to the first live player on it.
    pub fn update(&mut self, scroll_delta: i32, players: &mut [Player], map: &mut Map) {
        self.items.retain_mut(|item| {
            item.x -= scroll_delta;
            if item.x + item.w <= 0 {
                return false;
            }
            for player in players.iter_mut() {
                if player.is_dead() {
                    continue;
                }
                if item.overlaps(&player.body) {
                    item.apply(player, map);
                    return false;
                }
            }
            true
        });
    }

    pub fn draw(&self, sprites: &SpriteTable) {
        for item in &self.items {
            if item.x >= VIEW_W {
                continue;
            }
            let texture = match item.kind {
                ItemKind::Poison => &sprites.poison,
                ItemKind::Antidote => &sprites.antidote,
                ItemKind::Slowdown => &sprites.slowdown,
            };
            draw_texture_ex(
                texture,
                item.x as f32,
                item.y as f32,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(item.w as f32, item.h as f32)),
                    ..Default::default()
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player() -> Player {
        Player::new(50, 470, 0.0, 0.0, "ember", KeyCode::Space)
    }

    #[test]
    fn pickup_applies_exactly_once() {
        let mut map = Map::new(1);
        let mut players = [grounded_player()];
        let mut items = ItemManager::new();
        items.spawn(ItemKind::Poison, 60, 480);

        items.update(0, &mut players, &mut map);
        assert_eq!(players[0].poison(), POISON_FRAMES);
        assert_eq!(map.antidote_hint(), POISON_FRAMES);
        assert!(items.is_empty());

        items.update(0, &mut players, &mut map);
        assert_eq!(players[0].poison(), POISON_FRAMES);
    }

    #[test]
    fn antidote_clears_poison_and_hint() {
        let mut map = Map::new(1);
        map.set_antidote_hint(200);
        let mut players = [grounded_player()];
        players[0].set_poison(100);
        let mut items = ItemManager::new();
        items.spawn(ItemKind::Antidote, 60, 480);

        items.update(0, &mut players, &mut map);
        assert_eq!(players[0].poison(), -1);
        assert_eq!(map.antidote_hint(), 0);
        assert!(items.is_empty());
    }

    #[test]
    fn poison_does_not_restack_on_a_poisoned_player() {
        let mut map = Map::new(1);
        let mut players = [grounded_player()];
        players[0].set_poison(100);
        let mut items = ItemManager::new();
        items.spawn(ItemKind::Poison, 60, 480);

        items.update(0, &mut players, &mut map);
        assert_eq!(players[0].poison(), 100);
        assert!(items.is_empty());
    }

    #[test]
    fn slowdown_stacks_down_to_the_floor() {
        let mut map = Map::new(1);
        let mut players = [grounded_player()];
        let mut items = ItemManager::new();
        items.spawn(ItemKind::Slowdown, 60, 480);
        items.spawn(ItemKind::Slowdown, 60, 480);
        items.spawn(ItemKind::Slowdown, 60, 480);

        items.update(0, &mut players, &mut map);
        assert!(items.is_empty());
        assert_eq!(players[0].mod_difficulty(), -0.5);
    }

    #[test]
    fn items_scroll_left_and_drop_off_screen() {
        let mut map = Map::new(1);
        let mut players: [Player; 0] = [];
        let mut items = ItemManager::new();
        items.spawn(ItemKind::Antidote, 30, 480);

        items.update(50, &mut players, &mut map);
        assert_eq!(items.len(), 1);
        items.update(50, &mut players, &mut map);
        assert!(items.is_empty());
    }

    #[test]
    fn dead_players_collect_nothing() {
        let mut map = Map::new(1);
        let mut players = [grounded_player()];
        players[0].kill();
        let mut items = ItemManager::new();
        items.spawn(ItemKind::Poison, 60, 480);

        items.update(0, &mut players, &mut map);
        assert_eq!(items.len(), 1);
        assert_eq!(players[0].poison(), -1);
    }
}
