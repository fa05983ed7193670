use crate::cli::output::Output;
use crate::cli::ConfigAction;
use crate::config::{config_file_path, Settings};
use crate::errors::Result;
use std::path::Path;

/// Handle configuration commands
pub async fn run(action: ConfigAction) -> Result<()> {
    let config_file = config_file_path()?;
    run_with_file(action, &config_file).await
}

async fn run_with_file(action: ConfigAction, config_file: &Path) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => set_config_value(config_file, &key, &value).await,
        ConfigAction::Get { key } => get_config_value(config_file, &key).await,
        ConfigAction::List => list_config_values(config_file).await,
        ConfigAction::Unset { key } => unset_config_value(config_file, &key).await,
    }
}

async fn set_config_value(config_file: &Path, key: &str, value: &str) -> Result<()> {
    let mut settings = Settings::load_from_file(config_file)?;
    settings.set_value(key, value)?;
    settings.validate()?;
    settings.save_to_file(config_file)?;

    Output::success(format!("Configuration updated: {key} = {value}"));

    match key {
        "git.backend" => {
            Output::tip("'cli' shells out to git; 'libgit2' reads the repository in-process")
        }
        "tool.program" => Output::tip("Run 'sk doctor' to check the tool responds"),
        _ => {}
    }

    Ok(())
}

async fn get_config_value(config_file: &Path, key: &str) -> Result<()> {
    let settings = Settings::load_from_file(config_file)?;
    let value = settings.get_value(key)?;
    println!("{key} = {value}");
    Ok(())
}

async fn list_config_values(config_file: &Path) -> Result<()> {
    let settings = Settings::load_from_file(config_file)?;

    Output::section(format!("Stackscope Configuration ({})", config_file.display()));
    for key in Settings::keys() {
        println!("  {key} = {}", settings.get_value(key)?);
    }

    Ok(())
}

async fn unset_config_value(config_file: &Path, key: &str) -> Result<()> {
    let mut settings = Settings::load_from_file(config_file)?;
    settings.unset_value(key)?;
    settings.save_to_file(config_file)?;

    Output::success(format!(
        "Configuration reset: {key} = {}",
        settings.get_value(key)?
    ));
    Ok(())
}
