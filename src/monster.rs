use log::debug;
use macroquad::prelude::*;

use crate::assets::SpriteTable;
use crate::entity::MovingEntity;
use crate::map::{Map, VIEW_W};
use crate::player::{JUMP_IMPULSE, Player};

pub const MONSTER_SPEED: f32 = 4.0;
pub const MONSTER_SIZE: (i32, i32) = (40, 40);

pub struct Monster {
    body: MovingEntity,
}

impl Monster {
    fn new(x: i32, y: i32) -> Self {
        Self {
            body: MovingEntity::new(x, y, 0.0, 0.0, MONSTER_SIZE),
        }
    }

    // Steers toward the closest living player, or stands still without one.
    fn choose_direction(&mut self, players: &[Player]) {
        let target = players
            .iter()
            .filter(|p| !p.is_dead())
            .min_by_key(|p| (p.body.x - self.body.x).abs());
        self.body.vx = match target {
            Some(p) if p.body.x > self.body.x => MONSTER_SPEED,
            Some(p) if p.body.x < self.body.x => -MONSTER_SPEED,
            _ => 0.0,
        };
    }

    // One physics step. Returns false when the monster is gone.
    fn update(&mut self, map: &Map, difficulty: f32, players: &mut [Player]) -> bool {
        self.choose_direction(players);

        let (dx, dy) = self.body.displacement(difficulty);
        let (fatal, (x, y)) = map.move_test(self.body.x, self.body.y, self.body.hitbox(), dx, dy);
        let blocked = x != self.body.x + dx;
        self.body.x = x;
        self.body.y = y;
        if fatal {
            return false;
        }

        if map.object_on_the_ground(&self.body) {
            self.body.land();
            if blocked {
                self.body.vy = -JUMP_IMPULSE;
            }
        } else {
            self.body.fall(difficulty, 1.0);
        }

        let mut touched = false;
        for player in players.iter_mut() {
            if !player.is_dead() && self.overlaps(player) {
                debug!("monster caught a player at ({}, {})", player.body.x, player.body.y);
                player.kill();
                touched = true;
            }
        }
        !touched
    }

    fn overlaps(&self, player: &Player) -> bool {
        let b = &self.body;
        let p = &player.body;
        b.x < p.x + p.w && b.x + b.w > p.x && b.y < p.y + p.h && b.y + b.h > p.y
    }
}

pub struct MonsterManager {
    monsters: Vec<Monster>,
}

impl MonsterManager {
    pub fn new() -> Self {
        Self {
            monsters: Vec::new(),
        }
    }

    pub fn spawn(&mut self, x: i32, y: i32) {
        self.monsters.push(Monster::new(x, y));
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn update(
        &mut self,
        map: &Map,
        difficulty: f32,
        scroll_delta: i32,
        players: &mut [Player],
    ) {
        self.monsters.retain_mut(|monster| {
            monster.body.x -= scroll_delta;
            if monster.body.x + monster.body.w <= 0 {
                return false;
            }
            monster.update(map, difficulty, players)
        });
    }

    pub fn draw(&self, sprites: &SpriteTable) {
        for monster in &self.monsters {
            if monster.body.x >= VIEW_W {
                continue;
            }
            draw_texture_ex(
                &sprites.monster,
                monster.body.x as f32,
                monster.body.y as f32,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(monster.body.w as f32, monster.body.h as f32)),
                    ..Default::default()
                },
            );
        }
    }

    #[cfg(test)]
    fn positions(&self) -> Vec<(i32, i32)> {
        self.monsters.iter().map(|m| (m.body.x, m.body.y)).collect()
    }
}
