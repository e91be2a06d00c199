use anyhow::{Result, bail};
use tokio_util::sync::CancellationToken;

use crate::chat::code::{code_request, generate_code};
use crate::chat::{ChatView, StreamOutcome, ViewSink};
use crate::client::ApiClient;
use crate::render::TerminalView;
use crate::settings::SettingsStore;

/// Generate code for `task` and stream it to stdout. Ctrl-C stops the
/// generation and keeps what was printed.
pub async fn run(
    client: &ApiClient,
    store: &SettingsStore,
    agent: &str,
    language: &str,
    task: &str,
) -> Result<()> {
    if task.trim().is_empty() {
        bail!("Please enter a code generation prompt.");
    }
    let request = code_request(agent, language, task, store.load());

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut view = TerminalView::new(std::io::stdout(), false);
    view.set_sending_enabled(false);
    let outcome = generate_code(client, &request, cancel, &mut ViewSink::new(&mut view)).await;
    view.set_sending_enabled(true);
    watcher.abort();

    match outcome? {
        StreamOutcome::Completed { .. } | StreamOutcome::Stopped { .. } => Ok(()),
        StreamOutcome::Failed { error, .. } => bail!("Error generating code: {}", error),
    }
}
