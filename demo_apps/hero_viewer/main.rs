//! Hero scene viewer.
//!
//! Usage: `hero_viewer [settings.json]`
//!
//! Set `RUST_LOG=debug` to see arm phase changes and frame rate.

use hero_scene::HeroSettings;
use hero_scene::app::App;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => HeroSettings::load(&path)?,
        None => HeroSettings::default(),
    };

    App::new()
        .with_title("Robotics Club")
        .with_settings(settings)
        .run()?;

    Ok(())
}
