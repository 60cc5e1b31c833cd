use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{CompanyId, StatusFilter};
use storage::{generate_companies, write_dataset, CompanyStore, DEFAULT_MOCK_COMPANY_COUNT};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a deterministic mock dataset the server can load at startup.
    Generate {
        #[arg(long, default_value_t = DEFAULT_MOCK_COMPANY_COUNT)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "data/companies.json")]
        out: PathBuf,
    },
    Inspect {
        path: PathBuf,
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        status: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { count, seed, out } => {
            let companies = generate_companies(count, seed);
            write_dataset(&out, &companies)?;
            println!("wrote {} companies to {}", companies.len(), out.display());
        }
        Command::Inspect { path, id, status } => {
            let store = CompanyStore::load_json(&path)?;
            println!("{} companies in {}", store.len(), path.display());
            for (status, count) in store.status_counts() {
                println!("  {status:<22} {count}");
            }

            if let Some(raw) = status.as_deref() {
                let filter = StatusFilter::from_query(Some(raw));
                let matching = store.list_companies(0, store.len(), &filter);
                println!("status '{raw}': {} companies", matching.len());
                for company in matching {
                    println!("  {:>4} {}", company.id, company.name);
                }
            }

            if let Some(id) = id {
                let company = store
                    .company_by_id(CompanyId(id))
                    .with_context(|| format!("no company with id {id}"))?;
                println!("{}", serde_json::to_string_pretty(&company)?);
            }
        }
    }

    Ok(())
}
