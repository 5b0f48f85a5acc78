use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use salario_agents::{ChatRouter, RemoteBackend, UiActions};
use salario_core::replies::BUDGET_NOT_CONFIGURED;
use salario_core::roster::{
    add_employee, find_employee, remove_employee, search_employees, update_employee,
};
use salario_core::{
    parse_amount, payroll_rows, summarize_budget, AppSettings, ConversationContext, Currency,
    Employee, EmployeeDraft, EmployeeStatus, PayrollError, PayslipStatement, Position, Tab,
};
use salario_observability::{init_tracing, AppMetrics};
use salario_storage::{EmployeeRepository, SettingsRepository, Store};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "salario")]
#[command(about = "Salario payroll administration CLI")]
struct Cli {
    #[arg(long, env = "SALARIO_DATA_DIR", default_value = ".salario")]
    data_dir: PathBuf,

    #[arg(long, env = "SALARIO_STORE", value_enum, default_value_t = StoreKind::Json)]
    store: StoreKind,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Json,
    Memory,
}

#[derive(Debug, Subcommand)]
enum Command {
    Dashboard,
    Payroll,
    Payslip {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    Employees {
        #[command(subcommand)]
        command: EmployeesCommand,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    Chat {
        #[arg(long, default_value = "Admin")]
        user: String,
    },
}

#[derive(Debug, Subcommand)]
enum EmployeesCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        income: String,
        #[arg(long)]
        joined: Option<NaiveDate>,
        #[arg(long, default_value = "active")]
        status: String,
    },
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        income: Option<String>,
        #[arg(long)]
        joined: Option<NaiveDate>,
        #[arg(long)]
        status: Option<String>,
    },
    Remove {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        tax_rate: Option<String>,
        #[arg(long)]
        currency: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("salario");
    let cli = Cli::parse();

    let store = open_store(cli.store, &cli.data_dir).await?;
    let metrics = AppMetrics::shared();

    match cli.command {
        Command::Dashboard => {
            let employees = store.list_employees().await?;
            let settings = store.load_settings().await?;
            print_json(&dashboard_report(&employees, &settings)?)?;
        }
        Command::Payroll => {
            let employees = store.list_employees().await?;
            let settings = store.load_settings().await?;
            print_json(&payroll_rows(&employees, &settings)?)?;
        }
        Command::Payslip { id, out } => {
            let employees = store.list_employees().await?;
            let settings = store.load_settings().await?;
            let employee = find_employee(&employees, &id)?;
            let statement = PayslipStatement::build(employee, &settings)?;

            let path = out.join(format!("{}.txt", statement.file_stem()));
            tokio::fs::write(&path, statement.render_text())
                .await
                .with_context(|| format!("failed writing payslip to {}", path.display()))?;
            metrics.inc_payslip_rendered();
            info!(employee_id = %id, path = %path.display(), "payslip rendered");
            println!("{}", path.display());
        }
        Command::Employees { command } => run_employees(&store, command).await?,
        Command::Settings { command } => run_settings(&store, command).await?,
        Command::Chat { user } => run_chat(&store, metrics.clone(), &user).await?,
    }

    Ok(())
}

/// A stored budget that is not positive leaves `summary` null with a notice
/// instead of failing the command.
fn dashboard_report(employees: &[Employee], settings: &AppSettings) -> Result<serde_json::Value> {
    let (summary, notice) = match summarize_budget(employees, settings) {
        Ok(summary) => (Some(summary), None),
        Err(PayrollError::InvalidConfiguration(reason)) => {
            warn!(%reason, "dashboard shown without a budget summary");
            (None, Some(BUDGET_NOT_CONFIGURED))
        }
        Err(error) => return Err(error.into()),
    };

    Ok(serde_json::json!({
        "currency": settings.currency,
        "summary": summary,
        "notice": notice,
    }))
}

async fn open_store(kind: StoreKind, data_dir: &Path) -> Result<Store> {
    match kind {
        StoreKind::Json => Store::json(data_dir).await,
        StoreKind::Memory => Ok(Store::memory()),
    }
}

async fn run_employees(store: &Store, command: EmployeesCommand) -> Result<()> {
    let roster = store.list_employees().await?;

    match command {
        EmployeesCommand::List { search } => {
            let matches = search_employees(&roster, search.as_deref().unwrap_or_default());
            print_json(&matches)?;
        }
        EmployeesCommand::Add {
            name,
            email,
            position,
            income,
            joined,
            status,
        } => {
            let draft = EmployeeDraft {
                full_name: name,
                email,
                position: parse_position(&position)?,
                monthly_income: parse_amount(&income)?,
                date_joined: joined.unwrap_or_else(|| Utc::now().date_naive()),
                status: EmployeeStatus::parse(&status).context("invalid --status value")?,
            };
            let (next, employee) = add_employee(&roster, draft)?;
            store.replace_employees(&next).await?;
            print_json(&employee)?;
        }
        EmployeesCommand::Edit {
            id,
            name,
            email,
            position,
            income,
            joined,
            status,
        } => {
            let current = find_employee(&roster, &id)?;
            let draft = EmployeeDraft {
                full_name: name.unwrap_or_else(|| current.full_name.clone()),
                email: email.unwrap_or_else(|| current.email.clone()),
                position: match position {
                    Some(value) => parse_position(&value)?,
                    None => current.position,
                },
                monthly_income: match income {
                    Some(value) => parse_amount(&value)?,
                    None => current.monthly_income,
                },
                date_joined: joined.unwrap_or(current.date_joined),
                status: match status {
                    Some(value) => EmployeeStatus::parse(&value).context("invalid --status value")?,
                    None => current.status,
                },
            };
            let next = update_employee(&roster, &id, draft)?;
            store.replace_employees(&next).await?;
            print_json(find_employee(&next, &id)?)?;
        }
        EmployeesCommand::Remove { id } => {
            let next = remove_employee(&roster, &id)?;
            store.replace_employees(&next).await?;
            println!("removed {id}");
        }
    }

    Ok(())
}

async fn run_settings(store: &Store, command: SettingsCommand) -> Result<()> {
    let settings = store.load_settings().await?;

    match command {
        SettingsCommand::Show => print_json(&settings)?,
        SettingsCommand::Set {
            budget,
            tax_rate,
            currency,
        } => {
            let mut next = settings;
            if let Some(value) = budget {
                next.monthly_budget = parse_amount(&value)?;
            }
            if let Some(value) = tax_rate {
                next = next.with_tax_rate_clamped(parse_amount(&value)?);
            }
            if let Some(value) = currency {
                next.currency = Currency::parse(&value).context("invalid --currency value")?;
            }
            store.save_settings(&next).await?;
            print_json(&next)?;
        }
    }

    Ok(())
}

struct ConsoleUi;

impl UiActions for ConsoleUi {
    fn navigate_to(&self, tab: Tab) {
        println!("[navigating to {}]", tab.as_id());
    }

    fn open_add_employee_form(&self) {
        println!("[opening the add employee form; use `salario employees add`]");
    }
}

async fn run_chat(store: &Store, metrics: Arc<AppMetrics>, user: &str) -> Result<()> {
    let employees = store.list_employees().await?;
    let settings = store.load_settings().await?;

    let remote = match RemoteBackend::from_env()? {
        RemoteBackend::Gemini(client) => {
            info!(model = client.model(), "using gemini for open questions");
            RemoteBackend::Gemini(client.with_currency(settings.currency))
        }
        offline => offline,
    };
    info!(backend = remote.name(), "chat assistant ready");

    let router = ChatRouter::new(Arc::new(remote), Arc::new(ConsoleUi), metrics.clone(), user);
    let context = ConversationContext {
        employees: &employees,
        settings: &settings,
    };

    println!("Salario assistant. type 'exit' to quit.");
    for message in router.history() {
        println!("\n{}\n", message.text);
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if let Some(response) = router.send_message(message, &context).await {
            println!("\n{}\n", response.response_text);
        }
    }

    info!(metrics = ?metrics.snapshot(), "chat session closed");
    Ok(())
}

fn parse_position(value: &str) -> Result<Position> {
    Position::parse(value).with_context(|| {
        let expected = Position::ALL
            .iter()
            .map(|position| position.label())
            .collect::<Vec<_>>()
            .join(", ");
        format!("invalid --position value '{value}' (expected one of: {expected})")
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
