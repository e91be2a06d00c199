use anyhow::Result;
use clap::Subcommand;

use crate::settings::{GenerationSettings, SettingsStore};

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set {
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Pass an empty string to clear it
        #[arg(long)]
        system_prompt: Option<String>,
    },
    /// Restore the defaults
    Reset,
}

fn print_settings(settings: &GenerationSettings) {
    println!("temperature:   {}", settings.temperature);
    println!("max_tokens:    {}", settings.max_tokens);
    println!("system_prompt: {}", settings.system_prompt);
}

pub fn run(store: &SettingsStore, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            println!("# {}", store.path().display());
            print_settings(&store.load());
        }
        SettingsCommand::Set {
            temperature,
            max_tokens,
            system_prompt,
        } => {
            let mut settings = store.load();
            if let Some(temperature) = temperature {
                settings.temperature = temperature;
            }
            if let Some(max_tokens) = max_tokens {
                settings.max_tokens = max_tokens;
            }
            if let Some(system_prompt) = system_prompt {
                settings.system_prompt = system_prompt;
            }
            store.save(&settings)?;
            print_settings(&settings);
        }
        SettingsCommand::Reset => {
            let settings = GenerationSettings::default();
            store.save(&settings)?;
            print_settings(&settings);
        }
    }
    Ok(())
}
