mod app;
mod logging;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use floatkit_core::EngineConfig;

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            EngineConfig::load(&path)
                .with_context(|| format!("loading config from {}", path.display()))?
        }
        None => app::terminal_config(),
    };

    let _log_guard = logging::init(config.debug);
    tracing::info!(?config, "starting floatkit demo");

    let mut terminal = renderer::setup()?;
    let result = app::App::new(config).run(&mut terminal);
    renderer::restore(&mut terminal)?;
    result
}
