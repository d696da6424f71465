//! dash-runner: headless runner for the influencer campaign dashboard.
//!
//! Usage:
//!   dash-runner --seed 12345 --brand MuscleBlaze --export out.zip
//!   dash-runner --seed 12345 --config data/dashboard.json --ipc-mode
//!
//! In IPC mode each stdin line is one JSON command, e.g.
//!   {"cmd":"apply_filters","brand":"Gritzo","platform":"YouTube"}
//! and each response is one JSON line on stdout. `quit` or EOF ends the loop.

use anyhow::Result;
use influencer_core::{
    command::DashboardCommand,
    config::DashboardConfig,
    engine::{Dashboard, DashboardView},
    filter::{FilterSelection, ALL},
    format::{self, NO_DATA},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", chrono::Utc::now().timestamp() as u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config = match str_arg(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    let mut dashboard = Dashboard::build(config, seed)?;
    log::info!("dashboard ready: seed {seed}, generation {}", dashboard.snapshot().generation);

    if ipc_mode {
        return run_ipc_loop(&mut dashboard);
    }

    let selection = FilterSelection::parse(
        str_arg(&args, "--brand").unwrap_or(ALL),
        str_arg(&args, "--product").unwrap_or(ALL),
        str_arg(&args, "--category").unwrap_or(ALL),
        str_arg(&args, "--platform").unwrap_or(ALL),
    )?;
    let view = dashboard.apply_filters(selection)?;
    print_summary(&dashboard, &view);

    if let Some(path) = str_arg(&args, "--export") {
        let bytes = dashboard.export_to(Path::new(path))?;
        println!();
        println!("  exported {path} ({bytes} bytes)");
    }
    Ok(())
}

fn run_ipc_loop(dashboard: &mut Dashboard) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    // Announce the initial dataset so the UI can fill its dropdowns.
    let hello = dashboard.handle(DashboardCommand::GetOptions)?;
    writeln!(stdout, "{}", serde_json::to_string(&hello)?)?;
    stdout.flush()?;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        let response = match serde_json::from_str::<DashboardCommand>(line) {
            Ok(cmd) => match dashboard.handle(cmd) {
                Ok(outcome) => serde_json::to_value(&outcome)?,
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            },
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(dashboard: &Dashboard, view: &DashboardView) {
    let k = &view.kpi_strings;
    let report = &view.report;

    println!("Influencer Campaign Dashboard");
    println!("  seed:        {}", dashboard.seed());
    println!("  generation:  {}", view.generation);
    println!(
        "  filters:     brand={} product={} category={} platform={}",
        view.selection.brand, view.selection.product, view.selection.category, view.selection.platform
    );
    println!();
    println!("=== CAMPAIGN PERFORMANCE ===");
    println!("  total revenue:     {}", k.total_revenue);
    println!("  total orders:      {}", k.total_orders);
    println!("  total payout:      {}", k.total_payout);
    println!("  ROAS:              {}", k.roas);
    println!("  incremental ROAS:  {}", k.incremental_roas);

    println!();
    println!("=== TOP INFLUENCERS BY REVENUE ===");
    if report.rankings.top_by_revenue.is_empty() {
        println!("  {NO_DATA}");
    }
    for row in &report.rankings.top_by_revenue {
        println!(
            "  {:<16} {:>14} | orders {:>6} | ROAS {:>6} | {}",
            row.name,
            format::currency(row.total_revenue as f64),
            format::count(row.total_orders),
            format::ratio(row.roas),
            row.platform
        );
    }

    println!();
    println!("=== BEST PERFORMING PERSONAS ===");
    if report.personas.is_empty() {
        println!("  {NO_DATA}");
    }
    for p in &report.personas {
        println!(
            "  {:<10} avg ROAS {:>6} | revenue {:>14} | payout {:>12} | {} influencers",
            p.category.label(),
            format::ratio(p.avg_roas),
            format::currency(p.total_revenue as f64),
            format::currency(p.total_payout),
            p.influencer_count
        );
    }

    println!();
    println!("=== POOR ROI (ROAS < 1) ===");
    if report.rankings.poor_roi.is_empty() {
        println!("  {NO_DATA}");
    }
    for row in &report.rankings.poor_roi {
        println!(
            "  {:<16} ROAS {:>6} | revenue {:>14} | payout {:>12}",
            row.name,
            format::ratio(row.roas),
            format::currency(row.total_revenue as f64),
            format::currency(row.total_payout)
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
