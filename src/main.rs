use pdf_chat::api::{self, AppState, PageRenderer};
use pdf_chat::config::AppConfig;
use pdf_chat::knowledge::KnowledgeStore;
use pdf_chat::llm::QuestionAnswerer;
use pdf_chat::providers::openai::OpenAIProvider;
use pdf_chat::providers::CompletionProvider;
use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Upload a PDF and ask questions about it", long_about = None)]
struct Args {
    /// Overrides OPENAI_API_KEY
    #[arg(short, long)]
    api_key: Option<String>,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pdf_chat=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    run_api_server(args).await
}

async fn run_api_server(args: Args) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;

    let mut config = AppConfig::from_env();
    if let Some(key) = args.api_key {
        config.api_key = key;
    }

    let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAIProvider::from_config(&config));
    let answerer = QuestionAnswerer::from_config(provider, &config);
    info!(
        model = %answerer.model(),
        timeout = ?config.request_timeout,
        max_retries = config.max_retries,
        worst_case = ?answerer.worst_case_latency(),
        "Question answerer configured"
    );

    let renderer = PageRenderer::new().context("Failed to load page template")?;
    let state = AppState::new(
        Arc::new(KnowledgeStore::new()),
        answerer,
        renderer,
        config.upload_dir.clone(),
    );
    let app = api::create_api(state, config.max_upload_bytes);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
