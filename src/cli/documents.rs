use std::path::Path;

use anyhow::{Result, anyhow};
use clap::Subcommand;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::client::{ApiClient, DocumentId};

#[derive(Subcommand)]
pub enum DocumentsCommand {
    /// Upload a document and print its id
    Upload {
        #[arg(long)]
        agent: String,
        /// Path to the document
        file: String,
    },
    /// Ask a question about an uploaded document
    Query {
        #[arg(long)]
        agent: String,
        #[arg(long)]
        doc_id: DocumentId,
        question: String,
    },
    /// Upload a document, then ask questions about it. Without
    /// `--question` the questions are read interactively
    Ask {
        #[arg(long)]
        agent: String,
        file: String,
        #[arg(long, short)]
        question: Vec<String>,
    },
}

async fn upload(client: &ApiClient, agent: &str, file: &str) -> Result<DocumentId> {
    let data = tokio::fs::read(file).await?;
    let file_name = Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid document path {}", file))?;

    tracing::info!("Processing \"{}\"", file_name);
    let upload = client.upload_document(agent, file_name, data).await?;
    tracing::info!("Document {} ready", upload.doc_id);
    Ok(upload.doc_id)
}

async fn answer(client: &ApiClient, agent: &str, doc_id: &DocumentId, question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        return Ok(());
    }
    let response = client.query_document(agent, doc_id, question).await?;
    println!("{}\n", response.answer);
    Ok(())
}

pub async fn run(client: &ApiClient, command: DocumentsCommand) -> Result<()> {
    match command {
        DocumentsCommand::Upload { agent, file } => {
            let doc_id = upload(client, &agent, &file).await?;
            println!("{}", doc_id);
        }
        DocumentsCommand::Query {
            agent,
            doc_id,
            question,
        } => {
            answer(client, &agent, &doc_id, &question).await?;
        }
        DocumentsCommand::Ask {
            agent,
            file,
            question,
        } => {
            let doc_id = upload(client, &agent, &file).await?;
            if !question.is_empty() {
                for q in question.iter() {
                    answer(client, &agent, &doc_id, q).await?;
                }
                return Ok(());
            }

            println!("Ready to answer questions about \"{}\".", file);
            let mut rl = DefaultEditor::new()?;
            loop {
                match rl.readline("? ") {
                    Ok(line) => {
                        let _ = rl.add_history_entry(line.as_str());
                        if let Err(e) = answer(client, &agent, &doc_id, &line).await {
                            println!("Error: {}", e);
                        }
                    }
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                    Err(err) => {
                        println!("Error: {:?}", err);
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}
