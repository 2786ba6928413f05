use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use narrate_cli::utils::{format_naira, format_rate, sanitize_amount};
use narrate_cli::{AppConfig, Session, app, logging};
use narrate_core::{
    AccountType, FlowState, NewEmployee, PaymentKind, PaymentMethod, PaymentPlan,
    SimulatedGateway, SubscriptionTier, UserProfile,
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Nigerian 2026 tax reform calculator and simulated payment desk.
///
/// Compares PAYE under the 2025 and 2026 laws, runs simulated subscription,
/// tax and payroll payments, and keeps payment history and the employee
/// roster in the configured store.
#[derive(Debug, Parser)]
#[command(name = "taxnarrate", version, about)]
struct Cli {
    /// TOML config file. Falls back to $TAXNARRATE_CONFIG, then ./taxnarrate.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subscription tier to act as.
    #[arg(long, value_parser = parse_tier, default_value = "lite")]
    tier: SubscriptionTier,

    /// Account type to act as.
    #[arg(long, value_parser = parse_account_type, default_value = "individual")]
    account_type: AccountType,

    /// Storage backend (`sqlite` or `memory`). Overrides the config file.
    #[arg(long)]
    backend: Option<String>,

    /// Backend connection string. For SQLite this is a file path or `:memory:`.
    #[arg(long)]
    db: Option<String>,

    /// Log filter, e.g. `debug` or `warn,narrate_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare annual PAYE under the 2025 and 2026 laws.
    Compare {
        /// Annual gross income; non-digits are ignored.
        #[arg(long)]
        income: String,
    },

    /// List premium features and whether the current tier unlocks them.
    Features,

    /// Buy a subscription tier.
    Subscribe {
        #[arg(long = "tier", value_parser = parse_tier)]
        target: SubscriptionTier,

        #[arg(long, value_parser = parse_method, default_value = "card")]
        method: PaymentMethod,
    },

    /// Pay the 2026 liability on an annual income.
    PayTax {
        #[arg(long)]
        income: String,

        #[arg(long, value_parser = parse_plan, default_value = "full")]
        plan: PaymentPlan,

        #[arg(long, value_parser = parse_method, default_value = "card")]
        method: PaymentMethod,

        /// Confirm the declaration; required to pay.
        #[arg(long)]
        consent: bool,
    },

    /// Manage employees and remit PAYE (business accounts).
    #[command(subcommand)]
    Payroll(PayrollCommand),

    /// Show payment history, newest first.
    History,

    /// Issue the 2026 tax clearance certificate.
    Clearance,

    /// Show the profile and compliance summary.
    Status,

    /// Delete stored payment history and roster.
    Reset,
}

#[derive(Debug, Subcommand)]
enum PayrollCommand {
    /// Register an employee.
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        tin: String,

        /// Monthly gross pay; non-digits are ignored.
        #[arg(long)]
        gross: String,
    },

    /// List employees with their monthly PAYE.
    List,

    /// Select employees for the next remittance.
    Select {
        ids: Vec<String>,

        /// Deselect the given employees instead.
        #[arg(long)]
        deselect: bool,

        /// Select everyone, or deselect everyone if all are selected.
        #[arg(long, conflicts_with_all = ["ids", "deselect"])]
        toggle_all: bool,
    },

    /// Remove an employee from the roster.
    Remove { id: String },

    /// Remit PAYE for the selected employees.
    Remit {
        #[arg(long, value_parser = parse_method, default_value = "card")]
        method: PaymentMethod,

        /// Confirm the remittance; required to pay.
        #[arg(long)]
        consent: bool,
    },
}

fn parse_tier(s: &str) -> Result<SubscriptionTier, String> {
    SubscriptionTier::parse(s).ok_or_else(|| "expected lite, secure or secure-plus".to_string())
}

fn parse_account_type(s: &str) -> Result<AccountType, String> {
    AccountType::parse(s)
        .ok_or_else(|| "expected individual, small-business, mid-size or corporate".to_string())
}

fn parse_method(s: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::parse(s).ok_or_else(|| "expected card, transfer, ussd or debit".to_string())
}

fn parse_plan(s: &str) -> Result<PaymentPlan, String> {
    PaymentPlan::parse(s).ok_or_else(|| "expected full, quarterly or monthly".to_string())
}

// ─── progress ────────────────────────────────────────────────────────────────

/// Echoes gateway stages to stderr while a payment runs.
fn watch_progress(mut rx: watch::Receiver<FlowState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if let FlowState::Processing { stage, .. } = state {
                eprintln!("  {stage}");
            }
        }
    })
}

// ─── commands ────────────────────────────────────────────────────────────────

async fn run(
    session: &mut Session,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Compare { income } => {
            let result = session.compare(sanitize_amount(&income))?;
            println!("Annual income:   {}", format_naira(result.income));
            println!("2025 law PAYE:   {}", format_naira(result.tax_2025));
            println!("2026 law PAYE:   {}", format_naira(result.tax_2026));
            if result.shows_savings() {
                println!(
                    "You save:        {} ({} less)",
                    format_naira(result.savings),
                    format_rate(result.savings_percent / Decimal::ONE_HUNDRED)
                );
            }
            println!("Effective rate:  {}", format_rate(result.effective_rate));
        }
        Command::Features => {
            for (feature, locked) in session.features() {
                let mark = if locked { "locked" } else { "open" };
                println!(
                    "{:<28} {:<7} {:<8} {}",
                    feature.id,
                    feature.required_tier.label(),
                    mark,
                    feature.description
                );
            }
        }
        Command::Subscribe { target, method } => {
            let receipt = session
                .subscribe(target, method)
                .await
                .context("Subscription failed")?;
            println!(
                "Subscribed to {} for {} ({}), ref {}",
                receipt.mode.label(),
                format_naira(receipt.amount),
                receipt.method,
                receipt.transaction_ref
            );
        }
        Command::PayTax {
            income,
            plan,
            method,
            consent,
        } => {
            let receipt = session
                .pay_tax(sanitize_amount(&income), plan, method, consent)
                .await
                .context("Tax payment failed")?;
            println!(
                "{} {} paid for {} ({}), receipt {}",
                receipt.tax_type.as_str(),
                receipt.tax_year,
                receipt.taxpayer_name,
                format_naira(receipt.amount),
                receipt.nrs_receipt_no
            );
            println!("TIN: {}", receipt.tin);
        }
        Command::Payroll(command) => run_payroll(session, command).await?,
        Command::History => {
            let history = session.ledger().history();
            if history.is_empty() {
                println!("No payments yet.");
            }
            for item in history {
                let kind = match item.kind {
                    PaymentKind::Subscription => "subscription",
                    PaymentKind::Tax => "tax",
                };
                println!(
                    "{}  {:<12} {:>14}  {}",
                    item.date.format("%Y-%m-%d %H:%M"),
                    kind,
                    format_naira(item.amount),
                    item.id
                );
            }
        }
        Command::Clearance => {
            let certificate = session.clearance().context("Cannot issue clearance")?;
            println!("TAX CLEARANCE CERTIFICATE {}", certificate.tax_year);
            println!("Taxpayer:  {}", certificate.taxpayer_name);
            println!("TIN:       {}", certificate.tin);
            println!("Receipt:   {}", certificate.nrs_receipt_no);
            println!("Paid:      {}", format_naira(certificate.amount_paid));
            println!("Issued:    {}", certificate.issued.format("%Y-%m-%d"));
        }
        Command::Status => {
            let state = session.profile();
            println!("Account:     {}", state.profile.account_type.as_str());
            println!("Tier:        {}", state.profile.tier.label());
            println!("Tax type:    {}", state.profile.tax_mode.tax_type().as_str());
            println!("Score:       {}%", state.compliance.overall_score);
            println!("NRS tax ID:  {}", state.compliance.nrs_tax_id);
            println!("2026 paid:   {}", session.ledger().tax_paid_for_2026());
            println!("Employees:   {}", session.roster().employees().len());
        }
        Command::Reset => {
            session.reset().await.context("Reset failed")?;
            println!("Stored payment history and roster cleared.");
        }
    }
    Ok(())
}

async fn run_payroll(
    session: &mut Session,
    command: PayrollCommand,
) -> anyhow::Result<()> {
    match command {
        PayrollCommand::Add {
            name,
            email,
            tin,
            gross,
        } => {
            let employee = session
                .add_employee(NewEmployee {
                    name,
                    email,
                    tin,
                    monthly_gross: sanitize_amount(&gross),
                })
                .await
                .context("Cannot add employee")?;
            println!(
                "Added {} ({}), monthly PAYE {}",
                employee.name,
                employee.id,
                format_naira(employee.monthly_tax)
            );
        }
        PayrollCommand::List => {
            let roster = session.roster();
            for employee in roster.employees() {
                println!(
                    "[{}] {:<16} {:<20} {:>12} {:>10}",
                    if employee.selected { "x" } else { " " },
                    employee.id,
                    employee.name,
                    format_naira(employee.monthly_gross),
                    format_naira(employee.monthly_tax)
                );
            }
            println!(
                "Monthly PAYE: {} total, {} selected",
                format_naira(roster.total_monthly_tax()),
                format_naira(roster.selected_monthly_tax())
            );
        }
        PayrollCommand::Select {
            ids,
            deselect,
            toggle_all,
        } => {
            if toggle_all {
                session.toggle_select_all().await?;
            }
            for id in &ids {
                session.set_selected(id, !deselect).await?;
            }
            println!(
                "{} selected, {} monthly PAYE",
                session.roster().selected().count(),
                format_naira(session.roster().selected_monthly_tax())
            );
        }
        PayrollCommand::Remove { id } => {
            session.remove_employee(&id).await?;
            println!("Removed {id}");
        }
        PayrollCommand::Remit { method, consent } => {
            let remittance = session
                .remit_payroll(method, consent)
                .await
                .context("Remittance failed")?;
            println!(
                "Remitted {} for {} employees, ref {}",
                format_naira(remittance.total),
                remittance.employee_ids.len(),
                remittance.reference
            );
        }
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = AppConfig::locate(cli.config.as_deref());
    let config = AppConfig::load_located(config_path.as_deref())?
        .with_storage_overrides(cli.backend, cli.db);

    logging::init_logging(&config.logging.level);
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }
    match &config_path {
        Some(path) => debug!(path = %path.display(), "loaded config"),
        None => debug!("no config file, using defaults"),
    }

    let store_config = config.store_config();
    debug!("connecting to {} backend", store_config.backend);
    let store = app::build_registry()
        .create(&store_config)
        .await
        .with_context(|| format!("Failed to open {} store", store_config.backend))?;

    let profile = UserProfile {
        account_type: cli.account_type,
        tax_mode: cli.account_type.default_tax_mode(),
        tier: cli.tier,
        ..UserProfile::default()
    };
    let gateway = SimulatedGateway::new(config.simulation.delay_scale);
    let mut session = Session::open(profile, store, Box::new(gateway)).await?;

    let progress = watch_progress(session.flow().subscribe());
    let outcome = run(&mut session, cli.command).await;
    progress.abort();

    outcome
}
