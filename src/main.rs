use anyhow::{Context, Result};
use std::io::Write;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use movesmart_advisor::{AdvisorService, Config, ConversationTurn, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdio mode keeps stdout for replies
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let service = AdvisorService::new(&config)?;

    // Choose transport: stdio (default) or http
    let transport = std::env::var("ADVISOR_TRANSPORT").unwrap_or_else(|_| "stdio".to_string());
    match transport.as_str() {
        "http" => {
            let bind: SocketAddr = std::env::var("ADVISOR_HTTP_BIND")
                .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
                .parse()
                .context("Invalid ADVISOR_HTTP_BIND (expected host:port)")?;
            let bearer_token = std::env::var("ADVISOR_BEARER_TOKEN").ok();

            tracing::info!(
                %bind,
                auth = %bearer_token.as_deref().map(|_| "bearer").unwrap_or("none"),
                "Starting advice HTTP server"
            );
            let router = server::router(service, bearer_token);
            let listener = tokio::net::TcpListener::bind(bind).await?;
            axum::serve(listener, router).await?;
            Ok(())
        }
        _ => run_stdio(service).await,
    }
}

/// Interactive chat: one utterance per line, history kept for the session.
async fn run_stdio(service: AdvisorService) -> Result<()> {
    tracing::info!("main: starting chat on stdio, type 'exit' to quit");
    let language = service.default_language().to_string();
    let mut history: Vec<ConversationTurn> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let reply = service
            .get_immigration_advice(line, &language, &history)
            .await;
        println!("{reply}\n");

        history.push(ConversationTurn::user(line));
        history.push(ConversationTurn::assistant(reply));
    }

    tracing::info!("main: chat closed");
    Ok(())
}
