use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scam_hammer::analysis::{self, PageFetcher};
use scam_hammer::api::{self, AppState};
use scam_hammer::config::{self, Config};
use scam_hammer::jobs;
use scam_hammer::models::report::NewReport;
use scam_hammer::notification::telegram::TelegramNotifier;
use scam_hammer::notification::twitter::TwitterPublisher;
use scam_hammer::source::{self, ChangeFeedSource, PollingSource, ReportSource, SourceKind};
use scam_hammer::store::postgres::PgStore;
use scam_hammer::store::{ReportStore, TokenStore};
use scam_hammer::workflow::Workflow;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => run_server(cfg, port).await,
        Some(cli::Commands::Report { command }) => handle_report_command(&cfg, command).await,
        Some(cli::Commands::Analyze { url, phone, no_fetch }) => {
            handle_analyze(&url, phone.as_deref(), no_fetch).await
        }
        Some(cli::Commands::Token { command }) => handle_token_command(&cfg, command).await,
        Some(cli::Commands::Publish) => handle_publish(&cfg).await,
        None => run_server(cfg, None).await,
    };

    if let Err(ref e) = result {
        tracing::error!("{:#}", e);
    }
    result
}

fn init_tracing() {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::{trace as sdktrace, Resource};

    // OTLP export only when an endpoint is configured.
    let telemetry_layer = if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        match opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic())
            .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                KeyValue::new("service.name", "scam-hammer"),
            ])))
            .install_batch(opentelemetry_sdk::runtime::Tokio)
        {
            Ok(tracer) => Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Err(e) => {
                eprintln!("failed to install OpenTelemetry tracer: {e}");
                None
            }
        }
    } else {
        None
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scam_hammer=debug,tower_http=info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let (fmt_plain, fmt_json) = if json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_plain)
        .with(fmt_json)
        .with(telemetry_layer)
        .init();
}

async fn connect_store(cfg: &Config) -> anyhow::Result<PgStore> {
    tracing::info!("Connecting to database...");
    let db = PgStore::connect(&cfg.database_url).await?;
    db.migrate().await.context("failed to run migrations")?;
    Ok(db)
}

fn build_workflow(cfg: &Config, db: &PgStore) -> anyhow::Result<Arc<Workflow>> {
    let fetcher = PageFetcher::new().context("failed to build page fetcher")?;
    let notifier = TelegramNotifier::new(
        cfg.telegram_api_base.clone(),
        cfg.telegram_bot_token.clone(),
        cfg.telegram_chat_id,
    )
    .context("failed to build Telegram client")?;
    let publisher = TwitterPublisher::new(cfg.twitter_api_base.clone(), cfg.twitter_bearer_token.clone())
        .context("failed to build X client")?;

    Ok(Arc::new(Workflow::new(
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        Arc::new(fetcher),
        Arc::new(notifier),
        Arc::new(publisher),
        cfg.workflow(),
    )))
}

async fn run_server(cfg: Config, port: Option<u16>) -> anyhow::Result<()> {
    let db = connect_store(&cfg).await?;
    let workflow = build_workflow(&cfg, &db)?;

    let report_source: Box<dyn ReportSource> = match cfg.report_source {
        SourceKind::ChangeFeed => Box::new(ChangeFeedSource::connect(db.clone()).await?),
        SourceKind::Polling => Box::new(PollingSource::new(Arc::new(db.clone()), cfg.poll_interval)),
    };
    let source_task = source::spawn(workflow.clone(), report_source);
    tracing::info!(source = ?cfg.report_source, "report source started");

    // In immediate mode the job only picks up reports whose in-request
    // publication failed.
    let publish_task = jobs::publisher::spawn(workflow.clone(), cfg.publish_interval);
    tracing::info!(every = ?cfg.publish_interval, mode = ?cfg.publish_mode, "publish job started");
    let sweep_task = jobs::token_sweep::spawn(Arc::new(db.clone()), cfg.token_sweep_interval);

    let app = api::router(Arc::new(AppState {
        workflow: workflow.clone(),
    }));

    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(cfg.port)));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("scam-hammer listening on {} (public base {})", addr, cfg.public_base_url);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    source_task.abort();
    sweep_task.abort();
    publish_task.abort();
    db.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

async fn handle_report_command(cfg: &Config, command: cli::ReportCommands) -> anyhow::Result<()> {
    let db = connect_store(cfg).await?;
    match command {
        cli::ReportCommands::Submit { link, phone } => {
            let report = db.insert_report(NewReport { link, phone }).await?;
            println!("Report submitted: {}", report.id);
        }
        cli::ReportCommands::List { limit } => {
            let reports = db.list_reports(limit).await?;
            if reports.is_empty() {
                println!("No reports.");
            }
            for r in reports {
                println!(
                    "{}  {:<16}  {}  {}  [{}]",
                    r.id,
                    format!("{:?}", r.state()),
                    r.phone,
                    r.link,
                    r.impersonated_brands.join(", ")
                );
            }
        }
    }
    db.close().await;
    Ok(())
}

async fn handle_analyze(url: &str, phone: Option<&str>, no_fetch: bool) -> anyhow::Result<()> {
    let (brand, title) = if no_fetch {
        (analysis::identify_first(url, None), None)
    } else {
        let fetcher = PageFetcher::new()?;
        let a = analysis::analyze_url(url, &fetcher).await;
        (a.brand, a.page_title)
    };

    println!("URL:         {}", url);
    println!("Page title:  {}", title.as_deref().unwrap_or("-"));
    println!(
        "Brand:       {} (via {:?})",
        brand.brand.as_deref().unwrap_or("none"),
        brand.matched_via
    );
    let all = analysis::identify_all(url, title.as_deref());
    println!("All brands:  {}", if all.is_empty() { "-".to_string() } else { all.join(", ") });
    if let Some(phone) = phone {
        let country = analysis::resolve_country(phone);
        println!("Country:     {} {}", country.flag, country.country);
    }
    Ok(())
}

async fn handle_token_command(cfg: &Config, command: cli::TokenCommands) -> anyhow::Result<()> {
    let db = connect_store(cfg).await?;
    match command {
        cli::TokenCommands::Sweep => {
            let deleted = db.delete_expired_tokens().await?;
            println!("Deleted {} expired token(s).", deleted);
        }
    }
    db.close().await;
    Ok(())
}

async fn handle_publish(cfg: &Config) -> anyhow::Result<()> {
    let db = connect_store(cfg).await?;
    let workflow = build_workflow(cfg, &db)?;
    let summary = workflow.publish_approved().await?;
    println!("Published {}, failed {}.", summary.published, summary.failed);
    db.close().await;
    Ok(())
}
