use macroquad::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

// Collects this frame's key transitions, presses before releases, each
// group in key-code order so dispatch is stable across runs.
pub fn gather_events() -> Vec<InputEvent> {
    let mut down: Vec<KeyCode> = get_keys_pressed().into_iter().collect();
    down.sort_by_key(|k| *k as u32);
    let mut up: Vec<KeyCode> = get_keys_released().into_iter().collect();
    up.sort_by_key(|k| *k as u32);
    down.into_iter()
        .map(InputEvent::KeyDown)
        .chain(up.into_iter().map(InputEvent::KeyUp))
        .collect()
}

// Key names accepted in the options file.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let key = match name {
        "Space" => KeyCode::Space,
        "LShift" => KeyCode::LeftShift,
        "RShift" => KeyCode::RightShift,
        "LCtrl" => KeyCode::LeftControl,
        "RCtrl" => KeyCode::RightControl,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "A" => KeyCode::A,
        "D" => KeyCode::D,
        "S" => KeyCode::S,
        "W" => KeyCode::W,
        "X" => KeyCode::X,
        "Z" => KeyCode::Z,
        _ => return None,
    };
    Some(key)
}
