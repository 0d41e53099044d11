use crate::infra::{build_usage_service, scoring_engine};
use chrono::Local;
use clap::Args;
use ecometer::community::{monthly_challenge, Leaderboard};
use ecometer::config::AppConfig;
use ecometer::error::AppError;
use ecometer::scoring::{ComparisonStats, ScoreBand, ScoringError};
use ecometer::usage::{export_filename, DashboardSnapshot, UsageServiceError};
use std::path::PathBuf;

const SUGGESTIONS_SHOWN: usize = 3;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Units (kWh) consumed this month
    #[arg(long)]
    pub(crate) units: f64,
    /// Number of people in the household
    #[arg(long, default_value_t = 4)]
    pub(crate) household_size: u32,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Units (kWh) on this month's bill
    #[arg(long)]
    pub(crate) units: f64,
    /// Bill amount in PKR
    #[arg(long)]
    pub(crate) bill: f64,
    /// Photo or scan of the bill to keep alongside the entry
    #[arg(long)]
    pub(crate) image: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Destination file (defaults to a dated name in the working directory)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = scoring_engine(&config);
    let report = engine
        .evaluate(args.units, args.household_size, 0)
        .map_err(invalid_input)?;

    println!(
        "EcoScore for {:.1} kWh ({} people)",
        args.units, args.household_size
    );
    render_band(report.eco_score, report.band);
    render_comparison(&report.comparison);
    render_list("Suggestions", shown_suggestions(&report.suggestions));
    Ok(())
}

pub(crate) fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_usage_service(&config);

    let bill_image = match &args.image {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            let original_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(service.store_bill_image(&original_name, &bytes)?)
        }
        None => None,
    };

    let document = service.upsert_usage_entry(args.units, args.bill, bill_image.clone())?;
    let band = ScoreBand::from_score(document.eco_score);

    println!(
        "Recorded {:.1} kWh / PKR {:.0} for {}",
        args.units,
        args.bill,
        document
            .usage_history
            .last()
            .map(|entry| entry.month.as_str())
            .unwrap_or("this month")
    );
    if let Some(filename) = bill_image {
        println!("Bill image saved as {filename}");
    }
    render_band(document.eco_score, band);
    println!("Tip: {}", band.tip());
    Ok(())
}

pub(crate) fn run_stats() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_usage_service(&config);
    let snapshot = service.dashboard()?;
    render_dashboard(&snapshot);
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_usage_service(&config);
    let csv = service.export_csv()?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(export_filename(Local::now().date_naive())));

    std::fs::write(&output, csv)?;
    println!("Usage history exported to {}", output.display());
    Ok(())
}

pub(crate) fn run_leaderboard() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_usage_service(&config);
    let document = service.load()?;
    let board = Leaderboard::build(&document.user, document.eco_score);

    println!("Community leaderboard");
    for row in &board.rows {
        let marker = if row.is_you { " <-" } else { "" };
        println!(
            "{:>2}. {:<22} {:>3}  savings {:>4}  {}{}",
            row.rank, row.name, row.eco_score, row.savings, row.location, marker
        );
    }

    match &board.placement {
        Some(placement) => println!(
            "\nYou rank #{} of {} (top {}%) | {}",
            placement.rank,
            placement.total,
            placement.top_percent,
            placement.status.label()
        ),
        None => println!("\nSubmit a reading to join the rankings"),
    }

    let local = &board.local;
    println!("\n{} rankings", local.location);
    if local.rows.is_empty() {
        println!("- no households from {} yet", local.location);
    }
    for row in &local.rows {
        println!("{:>2}. {} ({})", row.rank, row.name, row.eco_score);
    }
    if let Some(average) = local.local_average {
        println!(
            "{} average {:.1} vs national {:.1} ({:+.1})",
            local.location, average, local.national_average, local.difference
        );
    }

    let challenge = monthly_challenge(&mut rand::thread_rng());
    println!(
        "\nThis month's challenge: {} ({})\n  {}\n  {} participants",
        challenge.title, challenge.reward, challenge.description, challenge.participants
    );
    Ok(())
}

fn invalid_input(err: ScoringError) -> AppError {
    AppError::from(UsageServiceError::from(err))
}

fn render_band(eco_score: u8, band: ScoreBand) {
    println!(
        "EcoScore {}/100 | {} | {}",
        eco_score,
        band.label(),
        band.description()
    );
}

fn render_comparison(stats: &ComparisonStats) {
    println!("\n{}", stats.headline());
    println!(
        "- community average {:.0} kWh | efficient households {:.0} kWh | percentile {}",
        stats.community_avg, stats.efficient_households_avg, stats.percentile
    );
    if stats.potential_savings > 0.0 {
        println!(
            "- reaching the efficient average saves {:.0} kWh (PKR {:.0})",
            stats.potential_savings, stats.potential_savings_cost
        );
    }
}

/// The engine returns the whole table; only the leading tips are printed.
fn shown_suggestions(suggestions: &[String]) -> &[String] {
    &suggestions[..suggestions.len().min(SUGGESTIONS_SHOWN)]
}

fn render_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}");
    for item in items {
        println!("- {item}");
    }
}

fn render_dashboard(snapshot: &DashboardSnapshot) {
    let document = &snapshot.document;
    let insights = &snapshot.insights;

    println!(
        "{} | household of {} | {} (joined {})",
        document.user.name,
        document.user.household_size,
        document.user.location,
        document.user.joined_date
    );
    render_band(document.eco_score, snapshot.band);

    if let Some(comparison) = &snapshot.comparison {
        render_comparison(comparison);
    }

    println!("\nHistory ({} months)", insights.months_tracked);
    for entry in &document.usage_history {
        println!(
            "- {}: {:.1} kWh | PKR {:.0}",
            entry.month, entry.units, entry.bill
        );
    }
    if let Some(trend) = insights.monthly_trend {
        println!("Month over month: {trend:+.1} kWh");
    }
    if let Some(change) = insights.change_vs_last_month_pct {
        println!("This month vs last: {change:+.1}%");
    }
    if let (Some(recent), Some(direction)) = (insights.recent_average, insights.trend_direction) {
        println!(
            "Last three months average {:.1} kWh, usage is {}",
            recent,
            direction.label()
        );
    }
    if let (Some(best), Some(highest)) = (&insights.best_month, &insights.highest_month) {
        println!(
            "Best month {} ({:.1} kWh) | highest {} ({:.1} kWh)",
            best.month, best.units, highest.month, highest.units
        );
    }
    if let Some(bill) = insights.estimated_bill {
        println!("Estimated bill: PKR {bill:.0}");
    }

    if !insights.appliance_breakdown.is_empty() {
        println!("\nEstimated breakdown");
        for share in &insights.appliance_breakdown {
            println!("- {}: {:.1} kWh", share.appliance, share.units);
        }
    }

    if !snapshot.achievements.is_empty() {
        println!("\nAchievements");
        for achievement in &snapshot.achievements {
            println!("- {}: {}", achievement.title, achievement.description);
        }
    }

    render_list("Suggestions", shown_suggestions(&snapshot.suggestions));
}
