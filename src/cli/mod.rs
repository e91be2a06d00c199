use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod agents;
pub mod chat;
pub mod code;
pub mod conversations;
pub mod documents;
pub mod media;
pub mod settings;

use crate::client::ApiClient;
use crate::core::{AppConfig, logging};
use crate::settings::SettingsStore;

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session
    Chat {
        /// Agent to talk to. Defaults to AGENTCHAT_AGENT or the first agent
        #[arg(long)]
        agent: Option<String>,

        /// Mode id of the agent
        #[arg(long)]
        mode: Option<String>,

        /// Continue a stored conversation
        #[arg(long)]
        conversation: Option<i64>,

        /// Send a single message and exit
        #[arg(long, short)]
        message: Option<String>,
    },
    /// Manage agents
    Agents {
        #[command(subcommand)]
        command: agents::AgentsCommand,
    },
    /// Browse stored conversations
    Conversations {
        #[command(subcommand)]
        command: conversations::ConversationsCommand,
    },
    /// Ask questions about a document
    Documents {
        #[command(subcommand)]
        command: documents::DocumentsCommand,
    },
    /// Generate a code snippet
    Code {
        #[arg(long)]
        agent: String,
        #[arg(long, default_value = "python")]
        language: String,
        /// What the code should do
        prompt: String,
    },
    /// Show or change generation settings
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommand,
    },
    /// Generate images from a prompt
    Image {
        #[arg(long)]
        agent: String,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "1")]
        count: u32,
        #[arg(long, default_value = "1:1")]
        aspect_ratio: String,
        /// Directory the PNG files are written to
        #[arg(long, default_value = ".")]
        out_dir: String,
    },
    /// Generate a video from a prompt and wait for it
    Video {
        #[arg(long)]
        agent: String,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "5")]
        duration: u32,
    },
    /// Locate things in an image
    Robotics {
        #[arg(long)]
        agent: String,
        /// Path to the image file
        #[arg(long)]
        image: String,
        #[arg(long)]
        prompt: String,
        /// Image width in pixels, to print pixel positions
        #[arg(long, requires = "height")]
        width: Option<u32>,
        /// Image height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    logging::init();

    let config = AppConfig::default();
    let client = ApiClient::from_config(&config);
    let store = SettingsStore::new(&config.settings_path);
    tracing::debug!("Using server {}", client.base_url());

    // Handle each sub command
    match args.command {
        Some(Command::Chat {
            agent,
            mode,
            conversation,
            message,
        }) => {
            let options = chat::ChatOptions {
                agent: agent.or(config.default_agent.clone()),
                mode,
                conversation,
                message,
            };
            chat::run(client, &store, options).await?;
        }
        Some(Command::Agents { command }) => {
            agents::run(&client, command).await?;
        }
        Some(Command::Conversations { command }) => {
            conversations::run(&client, command).await?;
        }
        Some(Command::Documents { command }) => {
            documents::run(&client, command).await?;
        }
        Some(Command::Code {
            agent,
            language,
            prompt,
        }) => {
            code::run(&client, &store, &agent, &language, &prompt).await?;
        }
        Some(Command::Settings { command }) => {
            settings::run(&store, command)?;
        }
        Some(Command::Image {
            agent,
            prompt,
            count,
            aspect_ratio,
            out_dir,
        }) => {
            media::image(&client, &agent, &prompt, count, &aspect_ratio, &out_dir).await?;
        }
        Some(Command::Video {
            agent,
            prompt,
            duration,
        }) => {
            media::video(&client, &agent, &prompt, duration, config.video_poll_interval).await?;
        }
        Some(Command::Robotics {
            agent,
            image,
            prompt,
            width,
            height,
        }) => {
            let size = width.zip(height);
            media::robotics(&client, &agent, &image, &prompt, size).await?;
        }
        None => {}
    }

    Ok(())
}
