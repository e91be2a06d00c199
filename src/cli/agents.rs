use anyhow::{Result, bail};
use clap::Subcommand;
use rustyline::DefaultEditor;

use crate::client::{AgentDetail, AgentUpdate, ApiClient, ApiError, NewAgent};

#[derive(Subcommand)]
pub enum AgentsCommand {
    /// List agent names
    List,
    /// Show an agent's configuration and modes
    Show { name: String },
    /// Create an agent
    Create {
        name: String,
        /// Agent type, e.g. `gemini` or `ollama`
        #[arg(long = "type")]
        agent_type: String,
        #[arg(long)]
        model: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        system_prompt: String,
    },
    /// Change an agent. Fields that are not given keep their value
    Update {
        name: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        system_prompt: Option<String>,
    },
    /// Delete an agent
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List the models available for an agent type
    Models { agent_type: String },
}

fn print_agent(agent: &AgentDetail) {
    println!("Name:          {}", agent.name);
    println!("Description:   {}", agent.description.as_deref().unwrap_or(""));
    println!("Model:         {}", agent.model_name().unwrap_or("(default)"));
    if let Some(prompt) = agent.system_prompt.as_deref().filter(|p| !p.is_empty()) {
        println!("System prompt: {}", prompt);
    }
    if !agent.modes.is_empty() {
        println!("Modes:");
        for (id, mode) in agent.modes.iter() {
            match &mode.description {
                Some(description) => println!("  {:<16} {} - {}", id, mode.name, description),
                None => println!("  {:<16} {}", id, mode.name),
            }
        }
    }
}

/// Overlay the requested changes on the agent's current values.
fn merge_update(
    current: &AgentDetail,
    model: Option<String>,
    description: Option<String>,
    system_prompt: Option<String>,
) -> AgentUpdate {
    AgentUpdate {
        description: description
            .or_else(|| current.description.clone())
            .unwrap_or_default(),
        model: model
            .or_else(|| current.model_name().map(str::to_string))
            .unwrap_or_default(),
        system_prompt: system_prompt
            .or_else(|| current.system_prompt.clone())
            .unwrap_or_default(),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut rl = DefaultEditor::new()?;
    let answer = rl.readline(prompt)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub async fn run(client: &ApiClient, command: AgentsCommand) -> Result<()> {
    match command {
        AgentsCommand::List => {
            let agents = client.list_agents().await?;
            if agents.is_empty() {
                println!("No agents configured.");
            }
            for agent in agents {
                println!("{}", agent);
            }
        }
        AgentsCommand::Show { name } => {
            let agent = client.fetch_agent(&name).await?;
            print_agent(&agent);
        }
        AgentsCommand::Create {
            name,
            agent_type,
            model,
            description,
            system_prompt,
        } => {
            if name.trim().is_empty() {
                bail!("Agent name is required");
            }
            let agent = NewAgent {
                name,
                agent_type,
                description,
                model,
                system_prompt,
            };
            match client.create_agent(&agent).await {
                Ok(response) => println!("{}", response.message),
                Err(ApiError::Conflict(message)) => bail!("Could not create agent: {}", message),
                Err(e) => return Err(e.into()),
            }
        }
        AgentsCommand::Update {
            name,
            model,
            description,
            system_prompt,
        } => {
            let current = client.fetch_agent(&name).await?;
            let update = merge_update(&current, model, description, system_prompt);
            let response = client.update_agent(&name, &update).await?;
            println!("{}", response.message);
        }
        AgentsCommand::Delete { name, yes } => {
            if !yes && !confirm(&format!("Delete agent {}? [y/N] ", name))? {
                println!("Cancelled.");
                return Ok(());
            }
            let response = client.delete_agent(&name).await?;
            println!("{}", response.message);
        }
        AgentsCommand::Models { agent_type } => {
            let models = client.list_models(&agent_type).await?;
            if models.is_empty() {
                println!("No model list for {}. Any model name is accepted.", agent_type);
            }
            for model in models {
                println!("{}", model);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AgentConfig;

    fn agent() -> AgentDetail {
        AgentDetail {
            name: "gemini".to_string(),
            description: Some("General".to_string()),
            system_prompt: Some("Be brief.".to_string()),
            model: None,
            config: Some(AgentConfig {
                generation_model: Some("gemini-2.0-flash".to_string()),
            }),
            modes: Default::default(),
        }
    }

    #[test]
    fn test_merge_update_keeps_current_values() {
        let update = merge_update(&agent(), None, None, None);
        assert_eq!(update.description, "General");
        assert_eq!(update.model, "gemini-2.0-flash");
        assert_eq!(update.system_prompt, "Be brief.");
    }

    #[test]
    fn test_merge_update_overrides() {
        let update = merge_update(
            &agent(),
            Some("gemini-2.5-pro".to_string()),
            None,
            Some(String::new()),
        );
        assert_eq!(update.model, "gemini-2.5-pro");
        assert_eq!(update.description, "General");
        assert_eq!(update.system_prompt, "");
    }
}
