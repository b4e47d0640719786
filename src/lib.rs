//! Side-scrolling runner over a streaming, procedurally generated map.

pub mod assets;
pub mod config;
pub mod entity;
pub mod gameplay;
pub mod input;
pub mod item;
pub mod map;
pub mod monster;
pub mod player;
pub mod score;
pub mod state;
