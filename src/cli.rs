//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::calendar::TradingCalendar;
use crate::domain::config_validation::{
    parse_windows, validate_costs_config, validate_ranking_config,
};
use crate::domain::costs::{self, CostConfig};
use crate::domain::earnings::{tag_earnings_phases, Phase, PhaseMap, PhaseTag};
use crate::domain::error::NetrankError;
use crate::domain::metadata::DatasetMeta;
use crate::domain::phase_metrics::{compute_phase_metrics, PhaseMetricsRow, PhaseReturn};
use crate::domain::planner::{compose_planner_warnings, PlannerWarning};
use crate::domain::price::PriceIndex;
use crate::domain::ranking::{rank_instruments, RankedRow};
use crate::domain::summary::{summarize, OverallRow, SummaryRow};
use crate::domain::trade::{compute_trades, tag_trades, TaggedTrade, DEFAULT_WINDOWS};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

const DEFAULT_OBJECTIVE: &str = "income_stability";

#[derive(Parser, Debug)]
#[command(name = "netrank", about = "Net-of-cost signal evaluation and instrument ranking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate entries net of costs and rank instruments
    Evaluate {
        #[arg(long)]
        prices: PathBuf,
        #[arg(long)]
        entries: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        objective: Option<String>,
        #[arg(long)]
        profile: Option<String>,
        /// Enable fee/cess overrides of the broker profile
        #[arg(long)]
        override_costs: bool,
        #[arg(long)]
        fee: Option<f64>,
        #[arg(long)]
        cess: Option<f64>,
        /// Comma-separated holding windows in trading days
        #[arg(long)]
        windows: Option<String>,
        /// Earnings events CSV; tags each trade with entry/exit phases
        #[arg(long)]
        events: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Compose earnings warnings for planned trades
    Plan {
        #[arg(long)]
        planner: PathBuf,
        #[arg(long)]
        prices: PathBuf,
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        objective: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Tag trading days with earnings phases and summarize daily returns by phase
    Phases {
        #[arg(long)]
        prices: PathBuf,
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Evaluate {
            prices,
            entries,
            config,
            objective,
            profile,
            override_costs,
            fee,
            cess,
            windows,
            events,
            json,
        } => run_evaluate(EvaluateArgs {
            prices,
            entries,
            config,
            objective,
            profile,
            override_costs,
            fee,
            cess,
            windows,
            events,
            json,
        }),
        Command::Plan {
            planner,
            prices,
            events,
            objective,
            json,
        } => run_plan(planner, prices, events, objective, json),
        Command::Phases {
            prices,
            events,
            json,
        } => run_phases(prices, events, json),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

struct EvaluateArgs {
    prices: PathBuf,
    entries: PathBuf,
    config: Option<PathBuf>,
    objective: Option<String>,
    profile: Option<String>,
    override_costs: bool,
    fee: Option<f64>,
    cess: Option<f64>,
    windows: Option<String>,
    events: Option<PathBuf>,
    json: bool,
}

#[derive(Serialize)]
struct EvaluateReport {
    cost_config: CostConfig,
    trades: Vec<TaggedTrade>,
    summary: Vec<SummaryRow>,
    overall: Vec<OverallRow>,
    ranked: Vec<RankedRow>,
}

fn run_evaluate(args: EvaluateArgs) -> Result<(), NetrankError> {
    let config = load_config(args.config.as_deref())?;
    if let Some(config) = &config {
        validate_costs_config(config)?;
        validate_ranking_config(config)?;
    }

    let profile = args
        .profile
        .or_else(|| config_string(&config, "costs", "broker_profile"))
        .unwrap_or_else(|| costs::DEFAULT_PROFILE.to_string());
    let override_enabled = args.override_costs
        || config
            .as_ref()
            .is_some_and(|c| c.get_bool("costs", "override_enabled", false));
    let fee = args
        .fee
        .or_else(|| config_double(&config, "costs", "broker_fee"));
    let cess = args
        .cess
        .or_else(|| config_double(&config, "costs", "cess"));
    let cost_config = costs::resolve_cost_config(&profile, override_enabled, fee, cess)?;

    let windows = match args
        .windows
        .or_else(|| config_string(&config, "costs", "holding_windows"))
    {
        Some(list) => parse_windows(&list)?,
        None => DEFAULT_WINDOWS.to_vec(),
    };

    let objective = args
        .objective
        .or_else(|| config_string(&config, "ranking", "objective"))
        .unwrap_or_else(|| DEFAULT_OBJECTIVE.to_string());

    let mut adapter = CsvAdapter::new(&args.prices).with_entries(&args.entries);
    if let Some(events) = &args.events {
        adapter = adapter.with_events(events);
    }
    eprintln!("Loading prices from {}", args.prices.display());
    let prices = adapter.fetch_prices()?;
    eprintln!("Loading entries from {}", args.entries.display());
    let entries = adapter.fetch_entries()?;
    let events = match &args.events {
        Some(path) => {
            eprintln!("Loading events from {}", path.display());
            adapter.fetch_events()?
        }
        None => Vec::new(),
    };
    eprintln!(
        "Evaluating {} entries across {:?} day windows ({} price rows)",
        entries.len(),
        windows,
        prices.len(),
    );

    let trades = compute_trades(&prices, &entries, &windows, cost_config.round_trip_cost_rate)?;
    let (summary, overall) = summarize(&trades);

    let phases = if events.is_empty() {
        PhaseMap::default()
    } else {
        tag_earnings_phases(&TradingCalendar::build(&prices), &events)
    };
    let trades = tag_trades(&trades, &phases);

    let mut meta = DatasetMeta::from_prices(&prices);
    if let Some(ceiling) = config_string(&config, "ranking", "liquidity_ceiling") {
        meta.liquidity_ceiling = ceiling;
    }
    let ranked = rank_instruments(&summary, &meta, &objective)?;

    if args.json {
        let report = EvaluateReport {
            cost_config,
            trades,
            summary,
            overall,
            ranked,
        };
        print_json(&report)
    } else {
        print_evaluate(&cost_config, &trades, &summary, &overall, &ranked, &objective);
        Ok(())
    }
}

fn run_plan(
    planner: PathBuf,
    prices: PathBuf,
    events: PathBuf,
    objective: Option<String>,
    json: bool,
) -> Result<(), NetrankError> {
    let adapter = CsvAdapter::new(&prices)
        .with_events(&events)
        .with_planner(&planner);
    let price_rows = adapter.fetch_prices()?;
    let event_rows = adapter.fetch_events()?;
    let planner_rows = adapter.fetch_planner_rows()?;
    eprintln!(
        "Composing warnings for {} planned trades ({} events)",
        planner_rows.len(),
        event_rows.len(),
    );

    let objective = objective.unwrap_or_else(|| DEFAULT_OBJECTIVE.to_string());
    let warnings = compose_planner_warnings(&planner_rows, &price_rows, &event_rows, &objective)?;

    if json {
        print_json(&warnings)
    } else {
        print_plan(&warnings);
        Ok(())
    }
}

#[derive(Serialize)]
struct PhasesReport {
    tags: Vec<PhaseTag>,
    metrics: Vec<PhaseMetricsRow>,
}

fn run_phases(prices: PathBuf, events: PathBuf, json: bool) -> Result<(), NetrankError> {
    let adapter = CsvAdapter::new(&prices).with_events(&events);
    let price_rows = adapter.fetch_prices()?;
    let event_rows = adapter.fetch_events()?;

    let index = PriceIndex::build(&price_rows)?;
    let calendar = TradingCalendar::build(&price_rows);
    let phases = tag_earnings_phases(&calendar, &event_rows);

    let mut tags = Vec::new();
    let mut returns = Vec::new();
    for instrument in calendar.instruments() {
        let dates = calendar.dates(instrument);
        for (i, &date) in dates.iter().enumerate() {
            let tag = phases.tag(instrument, date);
            if i > 0 {
                if let (Some(close), Some(prev)) = (
                    index.close(instrument, date),
                    index.close(instrument, dates[i - 1]),
                ) {
                    returns.push(PhaseReturn {
                        instrument: instrument.to_string(),
                        phase: tag.phase,
                        return_pct: (close / prev - 1.0) * 100.0,
                    });
                }
            }
            tags.push(tag);
        }
    }
    let metrics = compute_phase_metrics(&returns);
    eprintln!(
        "Tagged {} trading days; {} phase groups",
        tags.len(),
        metrics.len(),
    );

    if json {
        print_json(&PhasesReport { tags, metrics })
    } else {
        print_phases(&metrics);
        Ok(())
    }
}

fn run_validate(config_path: &PathBuf) -> Result<(), NetrankError> {
    eprintln!("Validating config {}", config_path.display());
    let config = FileConfigAdapter::from_file(config_path)?;
    validate_costs_config(&config)?;
    validate_ranking_config(&config)?;
    eprintln!("Configuration is valid");
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Option<FileConfigAdapter>, NetrankError> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            Ok(Some(FileConfigAdapter::from_file(path)?))
        }
        None => Ok(None),
    }
}

fn config_string(config: &Option<FileConfigAdapter>, section: &str, key: &str) -> Option<String> {
    config.as_ref().and_then(|c| c.get_string(section, key))
}

fn config_double(config: &Option<FileConfigAdapter>, section: &str, key: &str) -> Option<f64> {
    config_string(config, section, key).and_then(|v| v.parse().ok())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), NetrankError> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| NetrankError::Data {
        reason: format!("JSON serialization failed: {e}"),
    })?;
    println!("{rendered}");
    Ok(())
}

fn print_evaluate(
    cost_config: &CostConfig,
    trades: &[TaggedTrade],
    summary: &[SummaryRow],
    overall: &[OverallRow],
    ranked: &[RankedRow],
    objective: &str,
) {
    println!("=== Cost Config ===");
    println!(
        "{} profile: fee {:.4}, cess {:.4}, round-trip rate {:.4}",
        cost_config.broker_profile,
        cost_config.broker_fee,
        cost_config.cess,
        cost_config.round_trip_cost_rate,
    );

    println!("\n=== Trades ({}) ===", trades.len());
    let mut phase_counts: std::collections::BTreeMap<Phase, usize> = std::collections::BTreeMap::new();
    for trade in trades {
        if trade.entry_phase != Phase::Non {
            *phase_counts.entry(trade.entry_phase).or_default() += 1;
        }
    }
    for (phase, count) in &phase_counts {
        println!("  {count} entries in {phase}");
    }

    println!("\n=== Summary by Instrument x Window ===");
    for row in summary {
        println!(
            "  {} {:>3}D: {:>4} trades, win {:>5.1}%, median net {:>7.3}%, hit>cost {:>5.1}%",
            row.instrument,
            row.holding_window,
            row.n_trades,
            row.win_rate_net * 100.0,
            row.median_net_return,
            row.hit_rate_above_cost * 100.0,
        );
    }

    println!("\n=== Summary by Window ===");
    for row in overall {
        println!(
            "  {:>3}D: {:>4} trades, win {:>5.1}%, median net {:>7.3}%, avg net {:>7.3}%",
            row.holding_window,
            row.n_trades,
            row.win_rate_net * 100.0,
            row.median_net_return,
            row.avg_net_return,
        );
    }

    println!("\n=== Ranking ({objective}) ===");
    for row in ranked {
        println!(
            "  {} [{}] best {}D, score {:.4}",
            row.instrument, row.tier, row.best_window, row.score_total,
        );
        for reason in &row.reasons {
            println!("      {reason}");
        }
        for warning in &row.warnings {
            println!("      warning: {warning}");
        }
    }
}

fn print_plan(warnings: &[PlannerWarning]) {
    println!("=== Planner Warnings ===");
    for row in warnings {
        let exit = row
            .planned_exit_date
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        println!(
            "  {} {} +{}D → {} | entry {} exit {}{}",
            row.instrument,
            row.entry_date,
            row.holding_window,
            exit,
            row.entry_phase,
            row.exit_phase,
            if row.overlaps_earnings_window {
                " (crosses phase boundary)"
            } else {
                ""
            },
        );
        if let (Some(title), Some(severity)) = (&row.warning_title, &row.warning_severity) {
            println!("      [{severity}] {title}");
        }
        if let Some(body) = &row.warning_body {
            for line in body.lines() {
                println!("      {line}");
            }
        }
    }
}

fn print_phases(metrics: &[PhaseMetricsRow]) {
    println!("=== Phase Metrics ===");
    for row in metrics {
        println!(
            "  {} {:<13} n={:>4} win {:>5.1}% median {:>7.3}%{}",
            row.instrument,
            row.phase.to_string(),
            row.n,
            row.win_rate * 100.0,
            row.median_return,
            if row.insufficient_history {
                " (thin history)"
            } else {
                ""
            },
        );
    }
}
