use serde::{Deserialize, Serialize};

/// An ambient sound the mixer can loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub sound_url: String,
    pub category: String,
}

const SOUND_CDN: &str = "https://cdn.jsdelivr.net/gh/lofidot/moodist@main/public/sounds";

fn sound(id: &str, name: &str, image: &str, category: &str, file: &str) -> Sound {
    Sound {
        id: id.into(),
        name: name.into(),
        image_url: format!("/images/{image}"),
        sound_url: format!("{SOUND_CDN}/{category}/{file}"),
        category: category.into(),
    }
}

/// Built-in catalog used when nothing else is configured.
pub fn default_catalog() -> Vec<Sound> {
    vec![
        sound("heavy-rain", "Heavy Rain", "rain.jpg", "rain", "heavy-rain.mp3"),
        sound("light-rain", "Light Rain", "light-rain.jpg", "rain", "light-rain.mp3"),
        sound("thunder", "Thunder", "thunder.jpg", "rain", "thunder.mp3"),
        sound("typewriter", "Typewriter", "typewriter.jpg", "things", "typewriter.mp3"),
        sound("clock", "Clock", "clock.jpg", "things", "clock.mp3"),
    ]
}
