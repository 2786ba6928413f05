use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use narrate_core::models::schedules::builtin_for;
use narrate_core::store::{InMemoryStoreFactory, StoreConfig, StoreRegistry};
use narrate_core::{BandTable, ProgressiveTaxCalculator};
use narrate_data::{BandTableLoader, RosterLoader};
use narrate_db_sqlite::SqliteStoreFactory;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// `law_year,category,upper_bound,rate,exemption_threshold`
    Bands,
    /// `name,email,tin,monthly_gross`
    Roster,
}

/// Validate band tables or import employees from a CSV file.
///
/// Band files are checked against the table invariants and summarised; they
/// are not stored. Roster files have each employee's PAYE computed and are
/// appended to the persisted payroll roster.
#[derive(Parser, Debug)]
#[command(name = "narrate-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file
    #[arg(short, long)]
    file: PathBuf,

    /// What the file contains
    #[arg(short, long, value_enum, default_value_t = Kind::Roster)]
    kind: Kind,

    /// Storage backend for roster imports
    #[arg(short, long, default_value = "sqlite")]
    backend: String,

    /// Backend connection string (a file path or :memory: for sqlite)
    #[arg(short, long, default_value = "taxnarrate.db")]
    database: String,

    /// Income to run through each loaded band table
    #[arg(long)]
    income: Option<Decimal>,
}

fn summarise(
    table: &BandTable,
    income: Option<Decimal>,
) -> Result<()> {
    let matches_builtin = builtin_for(table.law_year(), table.category()).as_ref() == Some(table);
    println!(
        "{} {}: {} bands, exemption {}{}",
        table.law_year(),
        table.category().as_str(),
        table.bands().len(),
        table.exemption_threshold(),
        if matches_builtin {
            " (matches built-in)"
        } else {
            ""
        }
    );

    if let Some(income) = income {
        let computation = ProgressiveTaxCalculator::new(table)
            .calculate(income)
            .with_context(|| format!("Failed to compute tax on {income}"))?;
        println!(
            "  tax on {}: {} (taxable {})",
            income, computation.tax_amount, computation.taxable_income
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    match args.kind {
        Kind::Bands => {
            let records = BandTableLoader::parse(file)
                .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
            println!("Parsed {} band rows from CSV", records.len());

            let tables = BandTableLoader::build(&records).context("Invalid band table")?;
            for table in &tables {
                summarise(table, args.income)?;
            }
            println!("{} band tables are valid.", tables.len());
        }
        Kind::Roster => {
            let records = RosterLoader::parse(file)
                .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
            println!("Parsed {} employees from CSV", records.len());

            let mut registry = StoreRegistry::new();
            registry.register(Box::new(InMemoryStoreFactory));
            registry.register(Box::new(SqliteStoreFactory));

            let config = StoreConfig {
                backend: args.backend.clone(),
                connection_string: args.database.clone(),
            };
            let store = registry
                .create(&config)
                .await
                .with_context(|| format!("Failed to open {} store: {}", args.backend, args.database))?;

            let added = RosterLoader::load(store.as_ref(), &records)
                .await
                .context("Failed to import employees")?;

            println!("Successfully added {added} employees to the payroll roster.");
        }
    }

    Ok(())
}
