//! Command-line front end: index setup, incremental updates, and an
//! interactive chat loop.

use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use ncd_rag::{
    AppSettings, Chatbot, DocumentLoader, IndexStore, IngestionPipeline, RagConfig, RagError,
    RecursiveChunker, Retriever, VectorIndex,
};

#[derive(Parser)]
#[command(name = "ncd", about = "RAG chatbot for non-communicable diseases", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the vector index from the documents in the data directory.
    Setup,
    /// Add new documents to an existing index, skipping already-indexed files.
    Add,
    /// Start an interactive chat session.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let settings = AppSettings::from_env()?;
    let config = RagConfig::default();

    match cli.command {
        Command::Setup => setup(&settings, &config).await,
        Command::Add => add(&settings, &config).await,
        Command::Chat => chat(&settings, &config).await,
    }
}

fn make_pipeline(
    settings: &AppSettings,
    config: &RagConfig,
) -> ncd_rag::Result<(IngestionPipeline, Arc<IndexStore>)> {
    let store = Arc::new(IndexStore::new(
        &settings.persist_dir,
        &settings.collection_name,
        settings.embedder()?,
    ));
    let pipeline = IngestionPipeline::new(
        DocumentLoader::new(&settings.data_dir),
        Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)),
        Arc::clone(&store),
    );
    Ok((pipeline, store))
}

async fn setup(settings: &AppSettings, config: &RagConfig) -> anyhow::Result<()> {
    println!("Building the vector index from '{}'...", settings.data_dir.display());

    let (pipeline, _) = make_pipeline(settings, config)?;
    match pipeline.build().await {
        Ok(report) => {
            println!(
                "Indexed {} document(s) as {} chunk(s) into '{}'.",
                report.documents,
                report.chunks,
                settings.persist_dir.display()
            );
            println!("You can now run 'ncd chat'.");
            Ok(())
        }
        Err(RagError::EmptyInput(_)) => {
            bail!(
                "no documents found in '{}'. Add PDF or TXT files and run 'ncd setup' again.",
                settings.data_dir.display()
            )
        }
        Err(e) => Err(e.into()),
    }
}

async fn add(settings: &AppSettings, config: &RagConfig) -> anyhow::Result<()> {
    let (pipeline, store) = make_pipeline(settings, config)?;

    let report = match pipeline.update().await {
        Ok(report) => report,
        Err(RagError::NotFound { .. }) => {
            bail!("no existing index found. Run 'ncd setup' first to create it.")
        }
        Err(e) => return Err(e.into()),
    };

    if report.is_noop() {
        println!("No new documents to add. All files are already in the index.");
    } else {
        println!(
            "Added {} new document(s) as {} chunk(s); {} file(s) were already indexed.",
            report.added_documents, report.added_chunks, report.skipped_documents
        );
    }

    println!("\nIndexed documents:");
    for origin in store.existing_origins().await? {
        println!("  - {origin}");
    }
    Ok(())
}

async fn chat(settings: &AppSettings, config: &RagConfig) -> anyhow::Result<()> {
    let chatbot = match build_chatbot(settings, config).await {
        Ok(chatbot) => chatbot,
        Err(RagError::NotFound { .. }) => {
            bail!("vector index not found. Run 'ncd setup' first, then start the chat again.")
        }
        Err(e) => bail!("failed to initialize the chatbot: {e}"),
    };

    println!("{}", "=".repeat(70));
    println!("Non-Communicable Diseases Chatbot");
    println!("{}", "=".repeat(70));
    println!("Ask me anything about non-communicable diseases!");
    println!("Type 'quit', 'exit', or 'q' to end the conversation.\n");

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let question = line.trim();
        if matches!(question.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        if question.is_empty() {
            continue;
        }
        editor.add_history_entry(question).ok();

        // Per-question failures are reported and the loop continues.
        match chatbot.ask(question, true).await {
            Ok(response) => {
                println!("\nChatbot: {}\n", response.answer);
                if !response.sources.is_empty() {
                    println!("Sources:");
                    for (i, source) in response.sources.iter().enumerate() {
                        println!("  {}. {}", i + 1, source.source);
                    }
                    println!();
                }
            }
            Err(e) => println!("\nError: {e}\n"),
        }
    }

    println!("\nThank you for using the NCD Chatbot. Stay healthy!");
    Ok(())
}

async fn build_chatbot(settings: &AppSettings, config: &RagConfig) -> ncd_rag::Result<Chatbot> {
    let store = Arc::new(IndexStore::new(
        &settings.persist_dir,
        &settings.collection_name,
        settings.embedder()?,
    ));
    store.load().await?;

    let retriever = Retriever::new(store as Arc<dyn VectorIndex>, config.top_k);
    Ok(Chatbot::new(retriever, settings.generator()?))
}
