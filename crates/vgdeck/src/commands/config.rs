use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let canvas = config.fallback_canvas();
    let spacing = config.spacing();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "  (not created yet, showing defaults)".dimmed());
    }
    println!();
    println!("{}", "defaults:".bold());
    println!("  width:        {}", canvas.width.to_string().cyan());
    println!("  height:       {}", canvas.height.to_string().cyan());
    println!("  windowed:     {}", config.windowed().to_string().cyan());
    println!("  word_spacing: {}", spacing.word.to_string().cyan());
    println!("  line_spacing: {}", spacing.line.to_string().cyan());
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green().bold(),
        path.display()
    );
    Ok(())
}
