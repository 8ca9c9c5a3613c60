//! Quick-pick target colors
//!
//! The twenty swatches of the desktop palette popup. All of them are CSS
//! named colors, so values come straight from `palette::named`.

use palette::{named, Srgb};
use crate::color::Color;

pub const PRESETS: [(&str, Srgb<u8>); 20] = [
    ("red", named::RED),
    ("orangered", named::ORANGERED),
    ("darkorange", named::DARKORANGE),
    ("gold", named::GOLD),
    ("yellow", named::YELLOW),
    ("greenyellow", named::GREENYELLOW),
    ("lime", named::LIME),
    ("mediumspringgreen", named::MEDIUMSPRINGGREEN),
    ("cyan", named::CYAN),
    ("deepskyblue", named::DEEPSKYBLUE),
    ("blue", named::BLUE),
    ("blueviolet", named::BLUEVIOLET),
    ("magenta", named::MAGENTA),
    ("deeppink", named::DEEPPINK),
    ("hotpink", named::HOTPINK),
    ("beige", named::BEIGE),
    ("sienna", named::SIENNA),
    ("gray", named::GRAY),
    ("black", named::BLACK),
    ("white", named::WHITE),
];

/// Presets in display order
pub fn presets() -> impl Iterator<Item = (&'static str, Color)> {
    PRESETS.iter().map(|&(name, c)| (name, Color::from(c)))
}

/// Preset by name, case-insensitive
pub fn lookup(name: &str) -> Option<Color> {
    let name = name.trim();
    presets()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .map(|(_, color)| color)
}
