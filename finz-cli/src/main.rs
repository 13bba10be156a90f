use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use finz_core::{Classification, Direction, Interpreter, Transaction, format_brl};
use finz_store::{BudgetPeriod, BudgetStatus, Goal, LedgerEvent, MemorySink, TransactionPatch};

mod chat;
mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "finz", version, about = "FINZ — controle financeiro em linguagem natural")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One-time setup: write ~/.finz/profile.json and config.toml
    Setup,

    /// Record a transaction from free text (ex: finz add gastei 40 no mercado)
    Add {
        /// Free-text description, ex: "paguei 50 na conta de luz"
        text: Vec<String>,
    },

    /// Re-run the interpreter over an edited description
    Edit {
        id: String,
        text: Vec<String>,
    },

    /// Delete a transaction
    Rm { id: String },

    /// Interactive chat (TUI)
    Chat,

    /// Totals, balance and per-category breakdown
    Stats,

    /// Manage per-category budgets
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Manage savings goals
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Export transactions to CSV
    Export {
        #[arg(long)]
        csv: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Create or update the budget for a category
    Set {
        category: String,
        limit: f64,

        /// weekly, monthly or yearly
        #[arg(long, default_value = "monthly")]
        period: String,
    },

    /// List budgets and their consumption
    List,
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// Create a savings goal
    Set {
        name: String,
        target: f64,

        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: String,
    },

    /// Contribute an amount toward a goal
    Add { name: String, amount: f64 },

    /// List goals and their progress
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Setup => run_setup()?,
        Command::Add { text } => run_add(&text.join(" "))?,
        Command::Edit { id, text } => run_edit(&id, &text.join(" "))?,
        Command::Rm { id } => run_rm(&id)?,
        Command::Chat => {
            let cfg = config::load_config()?;
            chat::run_chat(&cfg)?;
        }
        Command::Stats => run_stats()?,
        Command::Budget { command } => match command {
            BudgetCommand::Set { category, limit, period } => {
                run_budget_set(&category, limit, &period)?
            }
            BudgetCommand::List => run_budget_list()?,
        },
        Command::Goal { command } => match command {
            GoalCommand::Set { name, target, deadline } => run_goal_set(&name, target, &deadline)?,
            GoalCommand::Add { name, amount } => run_goal_add(&name, amount)?,
            GoalCommand::List => run_goal_list()?,
        },
        Command::Export { csv } => run_export(&csv)?,
    }

    Ok(())
}

fn run_setup() -> Result<()> {
    let home = state::ensure_finz_home()?;
    let profile = state::Profile {
        created_at_utc: Some(chrono::Utc::now().to_rfc3339()),
        timezone: "America/Sao_Paulo".to_string(),
        currency: "BRL".to_string(),
    };
    state::write_profile(&profile)?;
    config::save_config(&config::Config::default())?;

    println!("FINZ configurado em {}", home.display());
    println!("  perfil: {}", state::profile_path()?.display());
    println!("  config: {}", config::config_path()?.display());
    Ok(())
}

fn run_add(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("descreva a transação, ex: finz add gastei 40 no mercado");
    }

    let profile = state::read_profile()?;
    let interpreter = Interpreter::with_defaults()?;
    let mut ledger = state::load_ledger()?;
    let mut sink = MemorySink::new();

    let draft = match interpreter.interpret(text) {
        Classification::Resolved(d) => d,
        Classification::Ambiguous { amount, raw_text, suggested_direction } => {
            let direction = confirm_direction(amount, suggested_direction)?;
            interpreter.resolve_with_direction(&raw_text, amount, direction)
        }
        Classification::Rejected { .. } => {
            bail!("não consegui identificar um valor válido — inclua um número na descrição")
        }
    };

    let id = ledger.next_transaction_id();
    let owner = ledger.owner().to_string();
    ledger.append(
        Transaction::new(
            id.clone(),
            profile.today(),
            draft.raw_text,
            draft.amount,
            draft.direction,
            &draft.category,
            owner,
        ),
        &mut sink,
    );
    state::save_ledger(&ledger)?;

    println!(
        "Registrado {id}: {} de {} em {}",
        draft.direction.label_pt(),
        format_brl(draft.amount),
        draft.category,
    );
    print_warnings(&sink);
    Ok(())
}

fn run_edit(id: &str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("descreva o novo texto da transação");
    }

    let interpreter = Interpreter::with_defaults()?;
    let mut ledger = state::load_ledger()?;
    if ledger.get(id).is_none() {
        bail!("transação {id} não encontrada");
    }

    // Edits follow the same confirmation contract as creation: a rejected
    // parse refuses the edit, an ambiguous one asks.
    let draft = match interpreter.interpret(text) {
        Classification::Resolved(d) => d,
        Classification::Ambiguous { amount, raw_text, suggested_direction } => {
            let direction = confirm_direction(amount, suggested_direction)?;
            interpreter.resolve_with_direction(&raw_text, amount, direction)
        }
        Classification::Rejected { .. } => {
            bail!("edição recusada: sem valor identificável no novo texto; a transação não foi alterada")
        }
    };

    let updated = ledger.update(
        id,
        TransactionPatch {
            description: Some(draft.raw_text),
            amount: Some(draft.amount),
            direction: Some(draft.direction),
            category: Some(draft.category.clone()),
        },
    );
    if !updated {
        bail!("transação {id} não encontrada");
    }
    state::save_ledger(&ledger)?;

    println!(
        "Atualizado {id}: {} de {} em {}",
        draft.direction.label_pt(),
        format_brl(draft.amount),
        draft.category,
    );
    Ok(())
}

fn run_rm(id: &str) -> Result<()> {
    let mut ledger = state::load_ledger()?;
    if !ledger.delete(id) {
        bail!("transação {id} não encontrada");
    }
    state::save_ledger(&ledger)?;
    println!("Removida {id}");
    Ok(())
}

fn run_stats() -> Result<()> {
    let ledger = state::load_ledger()?;
    let stats = ledger.stats();

    println!("Transações: {}", stats.transaction_count);
    println!("Receitas:   {}", format_brl(stats.total_income));
    println!("Despesas:   {}", format_brl(stats.total_expense));
    println!("Saldo:      {}", format_brl(stats.balance));

    if !stats.by_category.is_empty() {
        println!("\nPor categoria:");
        for (category, breakdown) in &stats.by_category {
            println!(
                "  {category}: receitas {} / despesas {}",
                format_brl(breakdown.income),
                format_brl(breakdown.expense),
            );
        }
    }

    if !stats.by_month.is_empty() {
        println!("\nPor mês:");
        for (month, breakdown) in &stats.by_month {
            println!("  {month}: saldo {}", format_brl(breakdown.balance));
        }
    }
    Ok(())
}

fn run_budget_set(category: &str, limit: f64, period: &str) -> Result<()> {
    if limit <= 0.0 {
        bail!("o limite do orçamento deve ser maior que zero");
    }
    let period = match period {
        "weekly" => BudgetPeriod::Weekly,
        "monthly" => BudgetPeriod::Monthly,
        "yearly" => BudgetPeriod::Yearly,
        other => bail!("período inválido: {other} (use weekly, monthly ou yearly)"),
    };

    let mut ledger = state::load_ledger()?;
    ledger.set_budget(category, limit, period);
    state::save_ledger(&ledger)?;
    println!("Orçamento de {category}: {}", format_brl(limit));
    Ok(())
}

fn run_budget_list() -> Result<()> {
    let ledger = state::load_ledger()?;
    if ledger.budgets().is_empty() {
        println!("Nenhum orçamento definido. Use: finz budget set <categoria> <limite>");
        return Ok(());
    }
    for b in ledger.budgets() {
        let status = match b.status() {
            BudgetStatus::Safe => "ok",
            BudgetStatus::Warning => "atenção",
            BudgetStatus::Danger => "estourado",
        };
        println!(
            "{}: {} de {} ({:.0}%, {status})",
            b.category,
            format_brl(b.spent),
            format_brl(b.limit),
            b.percentage(),
        );
    }
    Ok(())
}

fn run_goal_set(name: &str, target: f64, deadline: &str) -> Result<()> {
    if target <= 0.0 {
        bail!("a meta deve ser maior que zero");
    }
    let deadline: chrono::NaiveDate = deadline
        .parse()
        .with_context(|| format!("data inválida: {deadline} (use YYYY-MM-DD)"))?;

    let mut ledger = state::load_ledger()?;
    if ledger.goals().iter().any(|g| g.name == name) {
        bail!("a meta {name} já existe");
    }
    ledger.add_goal(Goal::new(name, target, deadline));
    state::save_ledger(&ledger)?;
    println!("Meta {name}: {} até {deadline}", format_brl(target));
    Ok(())
}

fn run_goal_add(name: &str, amount: f64) -> Result<()> {
    if amount <= 0.0 {
        bail!("a contribuição deve ser maior que zero");
    }
    let mut ledger = state::load_ledger()?;
    let mut sink = MemorySink::new();
    if !ledger.contribute(name, amount, &mut sink) {
        bail!("meta {name} não encontrada");
    }
    state::save_ledger(&ledger)?;
    println!("Contribuição de {} para {name}", format_brl(amount));
    for event in sink.events() {
        if let LedgerEvent::GoalReached { name } = event {
            println!("🎉 Parabéns! Você atingiu a meta \"{name}\"");
        }
    }
    Ok(())
}

fn run_goal_list() -> Result<()> {
    let ledger = state::load_ledger()?;
    if ledger.goals().is_empty() {
        println!("Nenhuma meta definida. Use: finz goal set <nome> <valor> --deadline YYYY-MM-DD");
        return Ok(());
    }
    for g in ledger.goals() {
        println!(
            "{}: {} de {} (faltam {}, até {})",
            g.name,
            format_brl(g.current_amount),
            format_brl(g.target_amount),
            format_brl(g.remaining()),
            g.deadline,
        );
    }
    Ok(())
}

fn run_export(path: &PathBuf) -> Result<()> {
    let ledger = state::load_ledger()?;
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    wtr.write_record(["id", "date", "description", "amount", "direction", "category"])?;
    for t in ledger.transactions() {
        let date = t.date.to_string();
        let amount = format!("{:.2}", t.amount);
        let direction = match t.direction {
            Direction::Income => "income",
            Direction::Expense => "expense",
        };
        wtr.write_record([
            t.id.as_str(),
            date.as_str(),
            t.description.as_str(),
            amount.as_str(),
            direction,
            t.category.as_str(),
        ])?;
    }
    wtr.flush()?;

    println!(
        "Exportadas {} transações para {}",
        ledger.transactions().len(),
        path.display()
    );
    Ok(())
}

/// Ask the user to settle an ambiguous direction. Enter accepts the
/// suggested default; the suggestion is never committed without this
/// prompt.
fn confirm_direction(amount: f64, suggested: Direction) -> Result<Direction> {
    println!(
        "Identifiquei {}, mas não sei se é receita ou despesa.",
        format_brl(amount)
    );
    let hint = match suggested {
        Direction::Income => "1=receita (sugerido), 2=despesa",
        Direction::Expense => "1=receita, 2=despesa (sugerido)",
    };
    loop {
        print!("{hint} > ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        match line.trim().to_lowercase().as_str() {
            "" => return Ok(suggested),
            "1" | "receita" | "entrada" => return Ok(Direction::Income),
            "2" | "despesa" | "saída" | "saida" | "gasto" => return Ok(Direction::Expense),
            _ => println!("Responda 1 ou 2."),
        }
    }
}

fn print_warnings(sink: &MemorySink) {
    for event in sink.events() {
        if let LedgerEvent::BudgetExceeded { category, spent, limit } = event {
            println!(
                "⚠️  Você ultrapassou o orçamento de {category} ({} de {})",
                format_brl(*spent),
                format_brl(*limit),
            );
        }
    }
}
