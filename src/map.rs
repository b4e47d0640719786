use std::collections::VecDeque;

use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};
use macroquad::prelude::*;

use crate::assets::SpriteTable;
use crate::entity::MovingEntity;
use crate::item::ItemKind;

pub const BLOCK_SIZE: i32 = 40;
pub const VIEW_W: i32 = 1200;
pub const VIEW_H: i32 = 720;
pub const GRID_ROWS: i32 = VIEW_H / BLOCK_SIZE;
pub const CHUNK_COLS: i32 = 8;
pub const CHUNK_W_PX: i32 = CHUNK_COLS * BLOCK_SIZE;

const ROWS: usize = GRID_ROWS as usize;
const COLS: usize = CHUNK_COLS as usize;

const LOOKAHEAD_PX: i32 = 2 * CHUNK_W_PX;
const MAX_GAP_COLS: u32 = 3;
const POST_GAP_SOLID_COLS: u32 = 2;
const MAX_HAZARD_RUN: u32 = 2;
// Surface row limits: the ground top never climbs above row 10 or sinks
// below row 16, so every step stays inside the jump envelope.
const GROUND_MIN_ROW: i32 = GRID_ROWS - 8;
const GROUND_MAX_ROW: i32 = GRID_ROWS - 2;
const GROUND_START_ROW: i32 = GRID_ROWS - 5;
const PLATFORM_CLEARANCE: i32 = 4;
// The opening columns are flat and featureless so freshly spawned players
// land on safe ground.
const WARMUP_COLS: u32 = 2 * CHUNK_COLS as u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Empty,
    Solid,
    Hazard,
    Decor,
}

// Immutable once its chunk is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
}

impl Block {
    pub const EMPTY: Block = Block {
        kind: BlockKind::Empty,
    };

    pub fn is_solid(self) -> bool {
        self.kind == BlockKind::Solid
    }

    pub fn is_deadly(self) -> bool {
        self.kind == BlockKind::Hazard
    }
}

// A fixed-width column group of blocks, generated in one procedural step.
pub struct Chunk {
    cols: [[Block; ROWS]; COLS],
}

impl Chunk {
    fn empty() -> Self {
        Self {
            cols: [[Block::EMPTY; ROWS]; COLS],
        }
    }

    fn block(&self, col: usize, row: usize) -> Block {
        self.cols[col][row]
    }

    fn set(&mut self, col: usize, row: usize, kind: BlockKind) {
        self.cols[col][row] = Block { kind };
    }
}

// Placement request emitted while a chunk is generated; drained by the
// gameplay state and forwarded to the item and monster managers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
    Item { kind: ItemKind, col: i32, row: i32 },
    Monster { col: i32, row: i32 },
}

#[derive(Clone, Copy)]
enum GenMode {
    Ground,
    Gap { cols_left: u32 },
}

/// Streaming terrain: a rolling window of chunks plus the cumulative scroll
/// offset. Queries take screen-space pixel coordinates; the scroll offset is
/// applied internally when converting to world columns.
pub struct Map {
    chunks: VecDeque<Chunk>,
    first_col: i32,
    scroll_px: i32,
    rng: StdRng,
    ground_row: i32,
    mode: GenMode,
    solid_debt: u32,
    hazard_run: u32,
    platform_left: u32,
    platform_row: i32,
    warmup_left: u32,
    antidote_hint: i32,
    spawns: Vec<Spawn>,
}

impl Map {
    pub fn new(seed: u64) -> Self {
        let mut map = Self {
            chunks: VecDeque::new(),
            first_col: 0,
            scroll_px: 0,
            rng: StdRng::seed_from_u64(seed),
            ground_row: GROUND_START_ROW,
            mode: GenMode::Ground,
            solid_debt: 0,
            hazard_run: 0,
            platform_left: 0,
            platform_row: 0,
            warmup_left: WARMUP_COLS,
            antidote_hint: 0,
            spawns: Vec::new(),
        };
        while map.right_edge_px() < VIEW_W + LOOKAHEAD_PX {
            map.gen_proc();
        }
        map
    }

    // Appends one chunk of constrained random terrain.
    pub fn gen_proc(&mut self) {
        let base_col = self.first_col + CHUNK_COLS * self.chunks.len() as i32;
        let mut chunk = Chunk::empty();
        for c in 0..COLS {
            self.gen_column(&mut chunk, c, base_col + c as i32);
        }
        self.chunks.push_back(chunk);
    }

    // Advances the scroll offset, tops up the lookahead margin and evicts
    // chunks that are fully behind the viewport.
    pub fn update(&mut self, scroll_delta: i32) {
        debug_assert!(scroll_delta >= 0, "map only scrolls forward");
        self.scroll_px += scroll_delta;
        while self.right_edge_px() - self.scroll_px < VIEW_W + LOOKAHEAD_PX {
            self.gen_proc();
        }
        while !self.chunks.is_empty()
            && (self.first_col + CHUNK_COLS) * BLOCK_SIZE <= self.scroll_px
        {
            self.chunks.pop_front();
            self.first_col += CHUNK_COLS;
        }
    }

    // True while the entity's bottom edge sits flush on the grid with at
    // least one solid cell directly beneath its footprint.
    pub fn object_on_the_ground(&self, entity: &MovingEntity) -> bool {
        let bottom = entity.y + entity.h;
        if bottom.rem_euclid(BLOCK_SIZE) != 0 {
            return false;
        }
        let row = bottom.div_euclid(BLOCK_SIZE);
        if row < 0 || row >= GRID_ROWS {
            return false;
        }
        let left = (entity.x + self.scroll_px).div_euclid(BLOCK_SIZE);
        let right = (entity.x + entity.w - 1 + self.scroll_px).div_euclid(BLOCK_SIZE);
        for col in left..=right {
            if self.block_at(col, row).is_solid() {
                return true;
            }
        }
        false
    }

    /// Resolves a proposed displacement one axis at a time and reports
    /// whether the final rectangle is a lethal place to be.
    pub fn move_test(
        &self,
        x: i32,
        y: i32,
        hitbox: (i32, i32),
        dx: i32,
        dy: i32,
    ) -> (bool, (i32, i32)) {
        let (w, h) = hitbox;
        let nx = self.resolve_x(x, y, w, h, dx);
        let ny = self.resolve_y(nx, y, w, h, dy);
        let fatal = ny >= VIEW_H || self.hits_hazard(nx, ny, w, h);
        (fatal, (nx, ny))
    }

    pub fn take_spawns(&mut self) -> Vec<Spawn> {
        std::mem::take(&mut self.spawns)
    }

    // Placement hint: while positive, antidotes dominate the item rolls.
    pub fn set_antidote_hint(&mut self, frames: i32) {
        self.antidote_hint = frames;
    }

    pub fn antidote_hint(&self) -> i32 {
        self.antidote_hint
    }

    pub fn decay_antidote_hint(&mut self) {
        self.antidote_hint = (self.antidote_hint - 1).max(0);
    }

    pub fn scroll_px(&self) -> i32 {
        self.scroll_px
    }

    // World column of the oldest retained chunk.
    pub fn first_col(&self) -> i32 {
        self.first_col
    }

    // One past the last generated world column.
    pub fn last_col(&self) -> i32 {
        self.first_col + CHUNK_COLS * self.chunks.len() as i32
    }

    pub fn block_at(&self, col: i32, row: i32) -> Block {
        if row < 0 || row >= GRID_ROWS || col < self.first_col {
            return Block::EMPTY;
        }
        let idx = col - self.first_col;
        let chunk = (idx / CHUNK_COLS) as usize;
        if chunk >= self.chunks.len() {
            return Block::EMPTY;
        }
        self.chunks[chunk].block((idx % CHUNK_COLS) as usize, row as usize)
    }

    pub fn draw(&self, sprites: &SpriteTable) {
        let col_lo = self.scroll_px.div_euclid(BLOCK_SIZE);
        let col_hi = (self.scroll_px + VIEW_W - 1).div_euclid(BLOCK_SIZE);
        for col in col_lo..=col_hi {
            let screen_x = (col * BLOCK_SIZE - self.scroll_px) as f32;
            for row in 0..GRID_ROWS {
                let texture = match self.block_at(col, row).kind {
                    BlockKind::Empty => continue,
                    BlockKind::Solid => &sprites.ground,
                    BlockKind::Hazard => &sprites.hazard,
                    BlockKind::Decor => &sprites.decor,
                };
                draw_texture_ex(
                    texture,
                    screen_x,
                    (row * BLOCK_SIZE) as f32,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(vec2(BLOCK_SIZE as f32, BLOCK_SIZE as f32)),
                        ..Default::default()
                    },
                );
            }
        }
    }

    fn right_edge_px(&self) -> i32 {
        self.last_col() * BLOCK_SIZE
    }

    fn gen_column(&mut self, chunk: &mut Chunk, c: usize, world_col: i32) {
        if self.warmup_left > 0 {
            self.warmup_left -= 1;
            fill_ground(chunk, c, self.ground_row);
            return;
        }

        if let GenMode::Gap { cols_left } = self.mode {
            if cols_left > 1 {
                self.mode = GenMode::Gap {
                    cols_left: cols_left - 1,
                };
            } else {
                self.mode = GenMode::Ground;
                self.solid_debt = POST_GAP_SOLID_COLS;
            }
            self.hazard_run = 0;
            return;
        }

        // Landing columns right after a gap stay featureless.
        let in_debt = self.solid_debt > 0;
        let mut placed_hazard = false;
        if in_debt {
            self.solid_debt -= 1;
        } else {
            if self.platform_left == 0 && self.rng.gen_ratio(3, 10) {
                let step = self.rng.gen_range(-2..=2);
                self.ground_row = (self.ground_row + step).clamp(GROUND_MIN_ROW, GROUND_MAX_ROW);
            }
            if self.platform_left == 0 && self.rng.gen_ratio(3, 50) {
                self.platform_left = self.rng.gen_range(3..=4);
                self.platform_row = self.ground_row - PLATFORM_CLEARANCE;
            }
            if self.platform_left == 0 && self.rng.gen_ratio(1, 10) {
                self.mode = GenMode::Gap {
                    cols_left: self.rng.gen_range(1..=MAX_GAP_COLS),
                };
            }
        }

        fill_ground(chunk, c, self.ground_row);

        if self.platform_left > 0 {
            chunk.set(c, self.platform_row as usize, BlockKind::Solid);
            self.platform_left -= 1;
        }

        if !in_debt && self.hazard_run < MAX_HAZARD_RUN && self.rng.gen_ratio(2, 25) {
            chunk.set(c, (self.ground_row - 1) as usize, BlockKind::Hazard);
            self.hazard_run += 1;
            placed_hazard = true;
        } else {
            self.hazard_run = 0;
            if self.rng.gen_ratio(1, 8) {
                chunk.set(c, (self.ground_row - 1) as usize, BlockKind::Decor);
            }
        }

        if !in_debt && !placed_hazard && self.rng.gen_ratio(1, 25) {
            let kind = self.roll_item_kind();
            self.spawns.push(Spawn::Item {
                kind,
                col: world_col,
                row: self.ground_row - 2,
            });
        }
        if !in_debt && !placed_hazard && self.rng.gen_ratio(1, 40) {
            self.spawns.push(Spawn::Monster {
                col: world_col,
                row: self.ground_row,
            });
        }
    }

    fn roll_item_kind(&mut self) -> ItemKind {
        if self.antidote_hint > 0 && self.rng.gen_ratio(7, 10) {
            return ItemKind::Antidote;
        }
        match self.rng.gen_range(0..4) {
            0 | 1 => ItemKind::Poison,
            2 => ItemKind::Slowdown,
            _ => ItemKind::Antidote,
        }
    }

    fn resolve_x(&self, x: i32, y: i32, w: i32, h: i32, dx: i32) -> i32 {
        if dx == 0 {
            return x;
        }
        let Some((row_lo, row_hi)) = row_span(y, h) else {
            return x + dx;
        };
        if dx > 0 {
            let start = (x + w - 1 + self.scroll_px).div_euclid(BLOCK_SIZE);
            let end = (x + w - 1 + dx + self.scroll_px).div_euclid(BLOCK_SIZE);
            for col in (start + 1)..=end {
                if self.solid_in_rows(col, row_lo, row_hi) {
                    return col * BLOCK_SIZE - self.scroll_px - w;
                }
            }
        } else {
            let start = (x + self.scroll_px).div_euclid(BLOCK_SIZE);
            let end = (x + dx + self.scroll_px).div_euclid(BLOCK_SIZE);
            for col in (end..start).rev() {
                if self.solid_in_rows(col, row_lo, row_hi) {
                    return (col + 1) * BLOCK_SIZE - self.scroll_px;
                }
            }
        }
        x + dx
    }

    fn resolve_y(&self, x: i32, y: i32, w: i32, h: i32, dy: i32) -> i32 {
        if dy == 0 {
            return y;
        }
        let col_lo = (x + self.scroll_px).div_euclid(BLOCK_SIZE);
        let col_hi = (x + w - 1 + self.scroll_px).div_euclid(BLOCK_SIZE);
        if dy > 0 {
            let start = (y + h - 1).div_euclid(BLOCK_SIZE);
            let end = (y + h - 1 + dy).div_euclid(BLOCK_SIZE);
            for row in (start + 1)..=end {
                if row >= GRID_ROWS {
                    break;
                }
                if row >= 0 && self.solid_in_cols(row, col_lo, col_hi) {
                    return row * BLOCK_SIZE - h;
                }
            }
        } else {
            let start = y.div_euclid(BLOCK_SIZE);
            let end = (y + dy).div_euclid(BLOCK_SIZE);
            for row in (end..start).rev() {
                if row < 0 {
                    break;
                }
                if row < GRID_ROWS && self.solid_in_cols(row, col_lo, col_hi) {
                    return (row + 1) * BLOCK_SIZE;
                }
            }
        }
        y + dy
    }

    fn solid_in_rows(&self, col: i32, row_lo: i32, row_hi: i32) -> bool {
        (row_lo..=row_hi).any(|row| self.block_at(col, row).is_solid())
    }

    fn solid_in_cols(&self, row: i32, col_lo: i32, col_hi: i32) -> bool {
        (col_lo..=col_hi).any(|col| self.block_at(col, row).is_solid())
    }

    fn hits_hazard(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        let Some((row_lo, row_hi)) = row_span(y, h) else {
            return false;
        };
        let col_lo = (x + self.scroll_px).div_euclid(BLOCK_SIZE);
        let col_hi = (x + w - 1 + self.scroll_px).div_euclid(BLOCK_SIZE);
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                if self.block_at(col, row).is_deadly() {
                    return true;
                }
            }
        }
        false
    }
}

fn fill_ground(chunk: &mut Chunk, c: usize, surface_row: i32) {
    for row in surface_row..GRID_ROWS {
        chunk.set(c, row as usize, BlockKind::Solid);
    }
}

fn row_span(y: i32, h: i32) -> Option<(i32, i32)> {
    let lo = y.div_euclid(BLOCK_SIZE).max(0);
    let hi = (y + h - 1).div_euclid(BLOCK_SIZE).min(GRID_ROWS - 1);
    if lo > hi { None } else { Some((lo, hi)) }
}
