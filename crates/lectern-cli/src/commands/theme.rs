use anyhow::{bail, Result};

use lectern_core::storage::{Database, PreferencesRepository};
use lectern_core::ThemeMode;

pub async fn run(db: &Database, mode: Option<&str>) -> Result<()> {
    let prefs = PreferencesRepository::new(db);

    let Some(mode) = mode else {
        match prefs.theme().await? {
            Some(current) => println!("{}", current),
            None => println!("unset (defaults to terminal background, then dark)"),
        }
        return Ok(());
    };

    let new_mode = match mode {
        "dark" => ThemeMode::Dark,
        "light" => ThemeMode::Light,
        "toggle" => prefs
            .theme()
            .await?
            .unwrap_or(ThemeMode::Dark)
            .toggle(),
        other => bail!("unknown theme '{}' (expected dark, light, or toggle)", other),
    };

    prefs.set_theme(new_mode).await?;
    println!("Theme set to {}", new_mode);

    Ok(())
}
