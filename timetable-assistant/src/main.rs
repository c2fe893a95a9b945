use std::{env, io, process, sync::Arc};

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use timetable_assistant::{
    cli,
    composer::Composer,
    gemini::GeminiClient,
    server::{router, AppState},
    session::{self, Sessions},
};

const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("timetable_assistant=info,timetable_parser=info")),
        )
        .init();

    let args = cli::parse(env::args().collect());

    let Ok(api_key) = env::var(GEMINI_API_KEY) else {
        eprintln!("`{GEMINI_API_KEY}` environment variable is not set");
        process::exit(1);
    };

    let gemini = match GeminiClient::new(api_key, args.timeout) {
        Ok(client) => client.with_model(args.model.as_str()),
        Err(err) => {
            eprintln!("Failed to create Gemini client: {err}");
            process::exit(1);
        }
    };

    let state = AppState {
        composer: Composer::new(Arc::new(gemini)),
        sessions: Sessions::new(session::Config {
            ttl: args.session_ttl,
        }),
        summary_source: args.summary_source,
    };

    let listener = TcpListener::bind(args.address).await?;
    tracing::info!(
        model = %args.model,
        summary_source = ?args.summary_source,
        "Listening at http://{}",
        args.address
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
