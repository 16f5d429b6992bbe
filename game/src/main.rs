use std::path::PathBuf;

use anyhow::{Context, Result};
use frontier::{AssetManager, Engine, GameConfig, ImageLoader, LogPresenter, Textures, ViewStateMachine};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional first argument: path to a JSON config file.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = GameConfig::from_path_or_default(config_path.as_deref())?;

    let mut assets = AssetManager::new();
    let textures = Textures::load(&mut assets, &mut ImageLoader, &config.assets)
        .context("failed to load startup textures")?;
    log::info!("loaded {} textures", assets.len());

    let machine = ViewStateMachine::new(config.clone(), textures);
    Engine::new(config).run(machine, LogPresenter::new())
}
