use anyhow::{Result, anyhow, bail};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{ChatBackend, ChatSession, ChatView, Rejection, Turn, TurnOutcome};
use crate::client::ApiClient;
use crate::render::TerminalView;
use crate::settings::SettingsStore;

const HELP: &str = "\
Commands:
  /new          start a new chat
  /list         list stored conversations
  /open <id>    continue a stored conversation
  /agent <name> switch agent
  /mode [id]    set the mode, or clear it without an id
  /modes        list the modes of the current agent
  /quit         exit
Press Ctrl-C while a response is streaming to stop it.
";

pub struct ChatOptions {
    pub agent: Option<String>,
    pub mode: Option<String>,
    pub conversation: Option<i64>,
    pub message: Option<String>,
}

enum Input<'a> {
    Message(&'a str),
    New,
    List,
    Open(&'a str),
    Agent(&'a str),
    Mode(Option<&'a str>),
    Modes,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Message(line);
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (command, None),
    };
    match (name, arg) {
        ("new", None) => Input::New,
        ("list", None) => Input::List,
        ("open", Some(id)) => Input::Open(id),
        ("agent", Some(agent)) => Input::Agent(agent),
        ("mode", mode) => Input::Mode(mode),
        ("modes", None) => Input::Modes,
        ("help", None) => Input::Help,
        ("quit", None) | ("exit", None) => Input::Quit,
        _ => Input::Unknown(trimmed),
    }
}

/// Pick the agent to use: the requested one, or the first the server
/// knows about.
async fn resolve_agent(client: &ApiClient, requested: Option<String>) -> Result<String> {
    if let Some(agent) = requested {
        return Ok(agent);
    }
    let agents = client.list_agents().await?;
    agents
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("The server has no agents configured"))
}

async fn print_modes(client: &ApiClient, agent: &str) {
    match client.fetch_agent(agent).await {
        Ok(detail) if detail.modes.is_empty() => println!("Agent {} has no modes.", agent),
        Ok(detail) => {
            for (id, mode) in detail.modes.iter() {
                println!("  {:<16} {}", id, mode.name);
            }
        }
        Err(e) => {
            tracing::error!("Could not load modes for agent {}: {}", agent, e);
            println!("Error: {}", e);
        }
    }
}

/// Run one turn with Ctrl-C wired to the session's stop handle.
async fn send_turn<B: ChatBackend, V: ChatView>(
    session: &mut ChatSession<B>,
    turn: Turn,
    view: &mut V,
) -> TurnOutcome {
    let stop = session.stop_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });
    let outcome = session.send(turn, view).await;
    watcher.abort();
    outcome
}

/// Replay a stored conversation, user messages included.
async fn open<W: std::io::Write>(
    session: &mut ChatSession<ApiClient>,
    conversation_id: i64,
    view: &mut TerminalView<W>,
) -> Result<()> {
    view.set_echo_user(true);
    let result = session.open_conversation(conversation_id, view).await;
    view.set_echo_user(false);
    result
}

pub async fn run(client: ApiClient, store: &SettingsStore, options: ChatOptions) -> Result<()> {
    let mut agent = resolve_agent(&client, options.agent).await?;
    let mut mode = options.mode.filter(|m| !m.is_empty());
    let mut session = ChatSession::new(client);
    let mut view = TerminalView::new(std::io::stdout(), false);

    if let Some(conversation_id) = options.conversation {
        open(&mut session, conversation_id, &mut view).await?;
    }

    if let Some(message) = options.message {
        let turn = Turn {
            agent: Some(agent),
            message,
            mode,
            settings: store.load(),
        };
        return match send_turn(&mut session, turn, &mut view).await {
            TurnOutcome::Failed { error } => bail!(error),
            TurnOutcome::Rejected(reason) => bail!("Message rejected: {:?}", reason),
            TurnOutcome::Completed { .. } | TurnOutcome::Stopped { .. } => Ok(()),
        };
    }

    let mut rl = DefaultEditor::new()?;
    println!("Chatting with {}. Type /help for commands.", agent);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match parse_input(&line) {
                    Input::Message(text) => {
                        // Settings can change between turns
                        let turn = Turn {
                            agent: Some(agent.clone()),
                            message: text.to_string(),
                            mode: mode.clone(),
                            settings: store.load(),
                        };
                        if let TurnOutcome::Rejected(Rejection::NoAgent) =
                            send_turn(&mut session, turn, &mut view).await
                        {
                            println!("Select an agent with /agent <name>");
                        }
                    }
                    Input::New => session.new_chat(&mut view),
                    Input::List => session.refresh_conversations(&mut view).await,
                    Input::Open(id) => match id.parse::<i64>() {
                        Ok(id) => {
                            if let Err(e) = open(&mut session, id, &mut view).await {
                                println!("Error: {}", e);
                            }
                        }
                        Err(_) => println!("Not a conversation id: {}", id),
                    },
                    Input::Agent(name) => {
                        agent = name.to_string();
                        mode = None;
                        println!("Switched to agent {}", agent);
                    }
                    Input::Mode(new_mode) => {
                        mode = new_mode.map(str::to_string);
                        match &mode {
                            Some(m) => println!("Mode set to {}", m),
                            None => println!("Mode cleared"),
                        }
                    }
                    Input::Modes => print_modes(session.backend(), &agent).await,
                    Input::Help => print!("{}", HELP),
                    Input::Quit => break,
                    Input::Unknown(cmd) => println!("Unknown command {}. Type /help.", cmd),
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
