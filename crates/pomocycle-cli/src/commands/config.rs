use std::path::PathBuf;

use clap::Subcommand;
use pomocycle_core::{Database, Settings, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting value
    Get {
        /// Setting key (e.g. "workDuration", "sound")
        key: String,
    },
    /// Set a setting value (numbers are clamped into range)
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
    /// Write settings as TOML
    Export {
        /// Output file (stdout if omitted)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Read settings from a TOML file
    Import {
        path: PathBuf,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::new(Database::open()?);

    match action {
        ConfigAction::Get { key } => {
            let settings = store.load();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let settings = store.load().with_value(&key, &value)?;
            store.save(&settings)?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = store.load();
            let json = serde_json::to_string_pretty(&settings)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            store.reset()?;
            println!("settings reset to defaults");
        }
        ConfigAction::Export { path } => {
            let content = toml::to_string_pretty(&store.load())?;
            match path {
                Some(path) => std::fs::write(path, content)?,
                None => print!("{content}"),
            }
        }
        ConfigAction::Import { path } => {
            let content = std::fs::read_to_string(&path)?;
            let settings: Settings = toml::from_str(&content)?;
            let saved = store.save(&settings)?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
    }
    Ok(())
}
