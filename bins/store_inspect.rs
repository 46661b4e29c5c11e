use clap::Parser;
use dotenvy::dotenv;
use futures_util::StreamExt;
use service::contracts::{ApplicationStore, AuthorizationStore, ScopeStore, TokenStore};
use service::Stores;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Open the configured stores and print what they hold.
#[derive(Parser, Debug)]
#[command(name = "store-inspect")]
#[command(version)]
struct Args {
    /// Also list the tokens and authorizations of this subject
    #[arg(short, long)]
    subject: Option<String>,

    /// Emit JSON logs instead of the compact format
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) {
    dotenv().ok();
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
    info!(service = "store-inspect", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();
    init_logging(args.json_logs);

    let run_id = Uuid::new_v4();
    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "store-inspect", event = "config_invalid", error = %e, "configuration rejected");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.runtime.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "store-inspect", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "store-inspect",
        event = "start",
        %run_id,
        threads = cfg.runtime.worker_threads.unwrap_or_default(),
        "inspecting stores"
    );

    rt.block_on(async move {
        match inspect(&cfg, args.subject.as_deref()).await {
            Ok(summary) => {
                println!("{summary:#}");
                info!(service = "store-inspect", event = "stop", %run_id, "inspection finished");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "store-inspect", event = "run_failed", %run_id, error = %e, "inspection failed");
                std::process::ExitCode::FAILURE
            }
        }
    })
}

async fn inspect(cfg: &configs::AppConfig, subject: Option<&str>) -> anyhow::Result<serde_json::Value> {
    let storage = &cfg.storage;
    common::env::ensure_storage_paths(
        &[storage.authorization_file.as_deref(), storage.token_file.as_deref()],
        &[storage.applications_file.as_deref(), storage.scopes_file.as_deref()],
    )
    .await?;

    let stores = Stores::open(storage).await?;
    let mut summary = serde_json::json!({
        "applications": stores.applications.count().await?,
        "scopes": stores.scopes.count().await?,
        "authorizations": stores.authorizations.count().await?,
        "tokens": stores.tokens.count().await?,
    });

    if let Some(subject) = subject {
        // Ctrl+C stops the scans between elements.
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!(service = "store-inspect", event = "shutdown_signal", "received Ctrl+C, stopping scan");
                on_signal.cancel();
            }
        });

        let mut tokens = Vec::new();
        let mut stream = stores.tokens.find_by_subject(subject, cancel.clone()).await?;
        while let Some(token) = stream.next().await {
            tokens.push(serde_json::json!({
                "id": token.id(),
                "type": token.token_type,
                "status": token.status,
                "authorization_id": stores.tokens.get_authorization_id(&token).await?,
                "expiration_date": token.expiration_date,
            }));
        }
        let authorizations: Vec<String> = stores
            .authorizations
            .find_by_subject(subject, cancel.clone())
            .await?
            .map(|auth| auth.id().to_string())
            .collect()
            .await;
        watcher.abort();

        summary["subject"] = serde_json::json!({
            "subject": subject,
            "authorizations": authorizations,
            "tokens": tokens,
            "complete": !cancel.is_cancelled(),
        });
    }

    Ok(summary)
}
