use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    display::{company_detail, company_row},
    Dashboard, DashboardSignal, HostedPageSource, LoadOutcome, PageSource, Pager, PagerConfig,
    PagerEvent, RestPageSource, RetryPolicy,
};
use shared::domain::{CompanyId, CompanyStatus};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// Read pages from the hosted classification API instead of the listing server.
    #[arg(long)]
    hosted_url: Option<String>,
    /// Initial status filter, e.g. "Top Prospect".
    #[arg(long)]
    status: Option<CompanyStatus>,
    #[arg(long, default_value_t = 10)]
    limit: u32,
    /// Pages to load before exiting; ignored with --interactive.
    #[arg(long, default_value_t = 1)]
    pages: usize,
    #[arg(long, default_value_t = 3)]
    retries: u32,
    #[arg(long)]
    interactive: bool,
    /// Print a single company's detail view and exit.
    #[arg(long)]
    company_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
    let args = Args::parse();

    if let Some(id) = args.company_id {
        let source = RestPageSource::new(&args.server_url)?;
        match source.company(CompanyId(id)).await? {
            Some(company) => println!("{}", company_detail(&company)),
            None => println!("Company not found"),
        }
        return Ok(());
    }

    let source: Arc<dyn PageSource> = match args.hosted_url.as_deref() {
        Some(endpoint) => Arc::new(HostedPageSource::new(endpoint)?),
        None => Arc::new(RestPageSource::new(&args.server_url)?),
    };
    let config = PagerConfig {
        page_limit: args.limit,
        retry: RetryPolicy {
            max_retries: args.retries,
            ..RetryPolicy::default()
        },
    };
    let pager = Pager::with_filter(source, config, args.status);
    let printer = tokio::spawn(print_events(pager.subscribe_events()));
    let dashboard = Dashboard::new(pager).await;

    if args.interactive {
        run_interactive(dashboard).await?;
    } else {
        load_pages(dashboard, args.pages).await;
    }

    // Every pager handle is gone by now, which closes the event channel.
    printer.await.context("event printer panicked")?;
    Ok(())
}

async fn load_pages(mut dashboard: Dashboard, pages: usize) {
    for _ in 0..pages {
        if !dashboard.handle(DashboardSignal::SentinelVisible).await {
            break;
        }
        if let Some(LoadOutcome::Failed { .. }) = dashboard.settle().await {
            break;
        }
    }
}

async fn run_interactive(dashboard: Dashboard) -> Result<()> {
    println!("commands: more | filter <status> | all | retry | quit");
    let (signals, reader) = command_signals(BufReader::new(tokio::io::stdin()));

    let pager = dashboard.run(signals).await;
    reader.await.context("stdin reader panicked")?;
    let snapshot = pager.snapshot().await;
    debug!(
        loaded = snapshot.companies.len(),
        pages = snapshot.page_count,
        "dashboard closed"
    );
    Ok(())
}

/// Turns command lines into dashboard signals, starting with a load of the
/// first page. The stream ends on `quit` or end of input.
fn command_signals<R>(input: R) -> (ReceiverStream<DashboardSignal>, JoinHandle<()>)
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    let reader = tokio::spawn(async move {
        if tx.send(DashboardSignal::SentinelVisible).await.is_err() {
            return;
        }
        let mut lines = input.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let signal = match parse_command(line.trim()) {
                Ok(Some(signal)) => signal,
                Ok(None) => break,
                Err(message) => {
                    println!("{message}");
                    continue;
                }
            };
            if tx.send(signal).await.is_err() {
                break;
            }
        }
    });
    (ReceiverStream::new(rx), reader)
}

fn parse_command(line: &str) -> Result<Option<DashboardSignal>, String> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "quit" | "exit" => Ok(None),
        "" | "more" => Ok(Some(DashboardSignal::SentinelVisible)),
        "all" => Ok(Some(DashboardSignal::FilterSelected(None))),
        "retry" => Ok(Some(DashboardSignal::Retry)),
        "filter" => rest
            .trim()
            .parse::<CompanyStatus>()
            .map(|status| Some(DashboardSignal::FilterSelected(Some(status))))
            .map_err(|err| err.to_string()),
        other => Err(format!("unknown command '{other}'")),
    }
}

async fn print_events(mut events: broadcast::Receiver<PagerEvent>) {
    loop {
        match events.recv().await {
            Ok(PagerEvent::Reset { filter, .. }) => match filter {
                Some(status) => println!("-- showing {status} --"),
                None => println!("-- showing all companies --"),
            },
            Ok(PagerEvent::PageAppended { companies, .. }) => {
                for company in &companies {
                    println!("{}", company_row(company));
                }
            }
            Ok(PagerEvent::Exhausted { total, .. }) => {
                println!("-- end of list ({total} companies) --");
            }
            Ok(PagerEvent::LoadFailed { page, message, .. }) => {
                println!("failed to load page {page}: {message} (type 'retry')");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "dropped pager events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
