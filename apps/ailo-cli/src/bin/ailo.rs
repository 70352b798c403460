use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ailo_core::config::{Config, Settings};
use ailo_core::corpus::load_store;
use ailo_core::{DocumentStore, LoadReport};
use ailo_llm::{get_default_model, CompletionModel};
use ailo_rag::{ChatReply, ChatSession, RetrievalEngine};

#[derive(Parser)]
#[command(name = "ailo")]
#[command(about = "Career-counselling answers grounded in utdanning.no data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus file or directory (overrides data.corpus_path)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Corpus statistics: documents, skipped records, categories
    Stats,
    /// Rank documents for a question without calling the model
    Search {
        question: String,
        #[arg(long)]
        top_n: Option<usize>,
        /// Also print the assembled context
        #[arg(long)]
        context: bool,
    },
    /// Answer one question
    Ask { question: String },
    /// Interactive chat; /clear resets the history, /quit exits
    Chat,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn load_corpus(path: &Path) -> anyhow::Result<(DocumentStore, LoadReport)> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")?);
    pb.set_message(format!("Loading corpus from {}", path.display()));
    pb.enable_steady_tick(Duration::from_millis(100));
    let loaded = load_store(path).with_context(|| format!("failed to load corpus from {}", path.display()));
    pb.finish_and_clear();
    let (store, report) = loaded?;
    info!(path = %path.display(), loaded = report.loaded, skipped = report.skipped_total(), "corpus loaded");
    println!("📚 Loaded {} documents ({} skipped) from {}", report.loaded, report.skipped_total(), path.display());
    Ok((store, report))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = Config::load().and_then(|c| c.settings()).map_err(|e| { error!(error = %e, "failed to load config"); e })?;
    let corpus = cli.corpus.clone().unwrap_or_else(|| settings.data.corpus_path());
    let (store, report) = load_corpus(&corpus)?;

    match cli.command {
        Commands::Stats => print_stats(&store, &report),
        Commands::Search { question, top_n, context } => {
            let engine = RetrievalEngine::from_settings(Arc::new(store), &settings);
            search(&engine, &question, top_n, context);
        }
        Commands::Ask { question } => {
            let mut session = session(store, &settings).await?;
            let reply = session.ask(&question).await.context("failed to get an answer from the language model")?;
            print_reply(&reply);
        }
        Commands::Chat => chat(session(store, &settings).await?).await?,
    }
    Ok(())
}

fn print_stats(store: &DocumentStore, report: &LoadReport) {
    println!("\n📊 Corpus\n=========");
    println!("Documents: {}", store.len());
    println!("Skipped records: {}", report.skipped_total());
    for (reason, count) in &report.skipped { println!("  {reason}: {count}"); }
    println!("\n📂 Categories");
    for (category, count) in store.category_index().counts() { println!("  {category:<16} {count}"); }
}

fn search(engine: &RetrievalEngine, question: &str, top_n: Option<usize>, show_context: bool) {
    let retrieval = match top_n { Some(n) => engine.retrieve_top(question, n), None => engine.retrieve(question) };
    println!("\n🔍 \"{}\"  intent={}", question, retrieval.intent);
    if retrieval.is_empty() { println!("No relevant documents found."); return; }
    for (i, hit) in retrieval.selected.iter().enumerate() {
        let doc = hit.document;
        let b = hit.breakdown;
        println!("\n  {}. score={:.1}  [{}]  {}  id={}", i + 1, hit.score, doc.category, doc.title, doc.id);
        println!("     title={} text={} intent={} endpoint={} quality={}", b.title, b.text, b.intent, b.endpoint, b.quality);
        match retrieval.sources().iter().find(|s| s.doc_id == doc.id) {
            Some(source) => println!("     🔗 {}  ({})", source.url, source.api_reference),
            None => println!("     (not included in context: budget reached)"),
        }
    }
    if retrieval.context.truncated { println!("\n⚠️  Context was truncated to {} characters", retrieval.context.char_count()); }
    if show_context { println!("\n{}", retrieval.context.text); }
}

async fn session(store: DocumentStore, settings: &Settings) -> anyhow::Result<ChatSession> {
    let model: Arc<dyn CompletionModel> = Arc::from(get_default_model(&settings.llm)?);
    if let Err(e) = model.health_check().await {
        warn!(model = model.name(), base_url = %settings.llm.base_url, error = %e, "language model health check failed");
        eprintln!("⚠️  Language model not reachable: {e}\n   Start LM Studio's local server at {} or set APP_USE_FAKE_LLM=1", settings.llm.base_url);
    }
    let engine = RetrievalEngine::from_settings(Arc::new(store), settings);
    Ok(ChatSession::new(engine, model, &settings.llm))
}

fn print_reply(reply: &ChatReply) {
    println!("\n{}", reply.answer);
    if !reply.sources.is_empty() {
        println!("\n📎 Kilder:");
        for source in &reply.sources { println!("  - {}: {} ({})", source.title, source.url, source.api_reference); }
    }
}

async fn chat(mut session: ChatSession) -> anyhow::Result<()> {
    println!("\n🎓 AILO ({})\nSkriv et spørsmål, /clear for å starte på nytt, /quit for å avslutte.", session.model_name());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nDu: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else { break };
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => { session.clear_history(); println!("Samtalen er nullstilt."); }
            question => match session.ask(question).await {
                Ok(reply) => print_reply(&reply),
                Err(e) => eprintln!("⚠️  {e}"),
            },
        }
    }
    println!("Ha det!");
    Ok(())
}
