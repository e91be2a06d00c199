use anyhow::Result;
use clap::Subcommand;

use crate::chat::ChatView;
use crate::client::ApiClient;
use crate::render::{TerminalView, transcript_to_html};

#[derive(Subcommand)]
pub enum ConversationsCommand {
    /// List stored conversations
    List,
    /// Print a conversation
    Show {
        id: i64,
        /// Print a standalone HTML page instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Delete a conversation
    Delete { id: i64 },
}

pub async fn run(client: &ApiClient, command: ConversationsCommand) -> Result<()> {
    match command {
        ConversationsCommand::List => {
            let conversations = client.list_conversations().await?;
            let mut view = TerminalView::new(std::io::stdout(), true);
            view.show_conversations(&conversations, None);
        }
        ConversationsCommand::Show { id, html } => {
            let conversation = client.fetch_conversation(id).await?;
            let title = conversation
                .title
                .clone()
                .unwrap_or_else(|| format!("Conversation {}", conversation.id));
            if html {
                println!("{}", transcript_to_html(&title, &conversation.messages));
            } else {
                println!("# {}\n", title);
                let mut view = TerminalView::new(std::io::stdout(), true);
                for message in conversation.messages.iter() {
                    view.render_message(message.role, &message.content);
                }
            }
        }
        ConversationsCommand::Delete { id } => {
            client.delete_conversation(id).await?;
            println!("Deleted conversation {}", id);
        }
    }
    Ok(())
}
