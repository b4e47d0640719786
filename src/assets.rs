use std::collections::HashMap;

use log::warn;
use macroquad::prelude::*;

use crate::config::Options;

#[derive(Clone)]
pub struct PlayerSprites {
    pub run: [Texture2D; 3],
    pub jump: Texture2D,
    pub ascend: Texture2D,
    pub color: Color,
}

// Every texture the game draws, keyed here once at startup.
pub struct SpriteTable {
    pub ground: Texture2D,
    pub hazard: Texture2D,
    pub decor: Texture2D,
    pub poison: Texture2D,
    pub antidote: Texture2D,
    pub slowdown: Texture2D,
    pub monster: Texture2D,
    fallback: PlayerSprites,
    players: HashMap<String, PlayerSprites>,
}

const DEFAULT_SKIN: &str = "ember";

impl SpriteTable {
    pub async fn load(options: &Options) -> Self {
        let fallback = load_player_sprites(DEFAULT_SKIN).await;

        let mut players = HashMap::new();
        for seat in &options.players {
            if seat.skin != DEFAULT_SKIN && !players.contains_key(&seat.skin) {
                players.insert(seat.skin.clone(), load_player_sprites(&seat.skin).await);
            }
        }

        Self {
            ground: load_or_placeholder("assets/ground.png", DARKBROWN).await,
            hazard: load_or_placeholder("assets/hazard.png", RED).await,
            decor: load_or_placeholder("assets/decor.png", DARKGREEN).await,
            poison: load_or_placeholder("assets/poison.png", PURPLE).await,
            antidote: load_or_placeholder("assets/antidote.png", LIME).await,
            slowdown: load_or_placeholder("assets/slowdown.png", SKYBLUE).await,
            monster: load_or_placeholder("assets/monster.png", MAROON).await,
            fallback,
            players,
        }
    }

    pub fn player(&self, skin: &str) -> &PlayerSprites {
        self.players.get(skin).unwrap_or(&self.fallback)
    }
}

async fn load_player_sprites(skin: &str) -> PlayerSprites {
    let color = skin_color(skin);
    PlayerSprites {
        run: [
            load_or_placeholder(&format!("assets/{}_run0.png", skin), color).await,
            load_or_placeholder(&format!("assets/{}_run1.png", skin), color).await,
            load_or_placeholder(&format!("assets/{}_run2.png", skin), color).await,
        ],
        jump: load_or_placeholder(&format!("assets/{}_jump.png", skin), color).await,
        ascend: load_or_placeholder(&format!("assets/{}_ascend.png", skin), color).await,
        color,
    }
}

// A missing file turns into a flat tile so the game stays playable.
async fn load_or_placeholder(path: &str, fill: Color) -> Texture2D {
    match load_texture(path).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            texture
        }
        Err(err) => {
            warn!("texture {:?} missing ({}), using a flat placeholder", path, err);
            let image = Image::gen_image_color(16, 16, fill);
            let texture = Texture2D::from_image(&image);
            texture.set_filter(FilterMode::Nearest);
            texture
        }
    }
}

fn skin_color(skin: &str) -> Color {
    match skin {
        "ember" => ORANGE,
        "slate" => SKYBLUE,
        "moss" => GREEN,
        "dune" => GOLD,
        _ => WHITE,
    }
}
