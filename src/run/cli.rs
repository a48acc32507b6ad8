use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::analysis::WeeklyReport;
use crate::categorize::suggest_rule;
use crate::config::Config;
use crate::models::CategoryRule;
use crate::session::Session;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], config: Config) -> Result<()> {
    match args[1].as_str() {
        "weekly" | "w" => cli_weekly(&args[2..], config),
        "categories" | "c" => cli_categories(&args[2..], config),
        "trend" | "t" => cli_trend(&args[2..], config),
        "benchmark" | "b" => cli_benchmark(&args[2..], config),
        "budget" => cli_budget(&args[2..], config),
        "group" => cli_group(&args[2..], config),
        "ungroup" => cli_ungroup(&args[2..], config),
        "groups" => cli_groups(config),
        "set-budget" => cli_set_budget(&args[2..], config),
        "rule" => cli_rule(&args[2..], config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("weekspend {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("weekspend: weekly spending analysis for bank and card CSV exports");
    println!();
    println!("Usage: weekspend [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive TUI");
    println!("  tui <csv>...                    Launch the TUI with files already loaded");
    println!("  weekly <csv>...                 Weekly totals, average, highest and lowest week");
    println!("  categories <csv>...             Average weekly spending per category");
    println!("  trend <category> <csv>...       Weekly series for one category or group");
    println!("  benchmark <csv>...              Compare against reference spending figures");
    println!("    --reference <file.json>       Reference data (default: data dir benchmarks.json)");
    println!("  budget <csv>...                 Weekly budgets against actual averages");
    println!("  group <name> <cat>[,<cat>...]   Merge categories into a named group");
    println!("  ungroup <name>                  Remove a group");
    println!("  groups                          List groups");
    println!("  set-budget <category> <amount>  Set a weekly budget (0 removes it)");
    println!("  rule <pattern> <category>       Add a categorization rule");
    println!("    --regex                       Treat the pattern as a regular expression");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
    println!();
    println!("Analysis options:");
    println!("  --from <YYYY-MM-DD>             First day of the window");
    println!("  --to <YYYY-MM-DD>               Last day of the window");
    println!("  --grouped                       Aggregate by category group");
}

/// Positional arguments and flags shared by the analysis commands.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct AnalysisArgs {
    pub(crate) positional: Vec<String>,
    pub(crate) from: Option<NaiveDate>,
    pub(crate) to: Option<NaiveDate>,
    pub(crate) grouped: bool,
    pub(crate) regex: bool,
    pub(crate) reference: Option<PathBuf>,
}

pub(crate) fn parse_args(args: &[String]) -> Result<AnalysisArgs> {
    let mut parsed = AnalysisArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--from" | "--to" | "--reference" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{arg} needs a value"))?;
                match arg.as_str() {
                    "--from" => parsed.from = Some(parse_date_arg(value)?),
                    "--to" => parsed.to = Some(parse_date_arg(value)?),
                    _ => parsed.reference = Some(PathBuf::from(shellexpand(value))),
                }
            }
            "--grouped" | "-g" => parsed.grouped = true,
            "--regex" => parsed.regex = true,
            flag if flag.starts_with("--") => anyhow::bail!("Unknown option: {flag}"),
            _ => parsed.positional.push(arg.clone()),
        }
    }
    Ok(parsed)
}

fn parse_date_arg(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

/// Build a session over the given CSV files and print what was loaded.
fn open_session(config: Config, opts: &AnalysisArgs, files: &[String]) -> Result<Session> {
    if files.is_empty() {
        anyhow::bail!("No CSV files given");
    }
    let config = match &opts.reference {
        Some(path) => config.with_reference(path.clone()),
        None => config,
    };
    let mut session = Session::new(config);
    session.open(files.iter().map(|f| PathBuf::from(shellexpand(f))));
    session.set_range(opts.from, opts.to);
    session.grouped = opts.grouped;

    for (label, report) in session.reports() {
        let years = report
            .year_span()
            .map(|y| format!(", {y}"))
            .unwrap_or_default();
        println!(
            "{label}: {} transactions ({}{years}), {} refunds/credits skipped",
            report.imported, report.format, report.skipped_refunds
        );
        if !report.malformed.is_empty() {
            eprintln!("  {} row(s) could not be read", report.malformed.len());
            for msg in report.malformed.iter().take(3) {
                eprintln!("    {msg}");
            }
        }
        if report.uncategorized > 0 {
            println!("  {} uncategorized", report.uncategorized);
        }
    }
    print_rule_suggestions(&session);
    println!();
    Ok(session)
}

fn print_rule_suggestions(session: &Session) {
    let mut suggestions: Vec<String> = session
        .store()
        .transactions()
        .filter(|t| t.is_uncategorized() && !t.description.is_empty())
        .map(|t| suggest_rule(&t.description))
        .collect();
    suggestions.sort();
    suggestions.dedup();
    if suggestions.is_empty() {
        return;
    }
    println!(
        "  Suggested rules: {}",
        suggestions
            .iter()
            .take(3)
            .map(|s| format!("weekspend rule \"{s}\" <category>"))
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn report_or_notice(session: &Session) -> Option<WeeklyReport> {
    let report = session.report();
    if report.is_none() {
        println!("No spending data in the selected range");
    }
    report
}

// ── Analysis commands ────────────────────────────────────────

fn cli_weekly(args: &[String], config: Config) -> Result<()> {
    let opts = parse_args(args)?;
    let session = open_session(config, &opts, &opts.positional)?;
    let Some(report) = report_or_notice(&session) else {
        return Ok(());
    };

    println!(
        "Weekly spending {} to {} ({} weeks)",
        report.start_date,
        report.end_date,
        report.num_weeks()
    );
    println!("{}", "─".repeat(40));
    println!("  {:<12} {:>4} {:>16}", "Week of", "Days", "Spent");
    for week in &report.weeks {
        let marker = if week.is_full() { "" } else { " *" };
        println!(
            "  {:<12} {:>4} {:>16}{marker}",
            week.start.to_string(),
            week.days(),
            format_amount(week.total)
        );
    }
    println!("{}", "─".repeat(40));
    println!("  Total spent:      {}", format_amount(report.total_spent));
    println!("  Weekly average:   {}", format_amount(report.average_spending));
    if let Some((week, amount)) = report.max_spending_week {
        println!("  Highest week:     {week} ({})", format_amount(amount));
    }
    match report.min_spending_week {
        Some((week, amount)) => {
            println!("  Lowest full week: {week} ({})", format_amount(amount))
        }
        None => println!("  Lowest full week: n/a (no complete week)"),
    }
    if report.weeks.iter().any(|w| !w.is_full()) {
        println!();
        println!("  * partial week");
    }
    Ok(())
}

fn cli_categories(args: &[String], config: Config) -> Result<()> {
    let opts = parse_args(args)?;
    let session = open_session(config, &opts, &opts.positional)?;
    let Some(report) = report_or_notice(&session) else {
        return Ok(());
    };

    let totals = report.total_spending_by_category();
    let mut rows: Vec<(&String, &Decimal)> = report.average_spending_by_category.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1));

    let label = if opts.grouped { "Group" } else { "Category" };
    println!("{:<28} {:>14} {:>14} {:>6}", label, "Avg/week", "Total", "Weeks");
    println!("{}", "─".repeat(65));
    for (category, average) in rows {
        let weeks_seen = report
            .category_series
            .get(category)
            .map(|s| s.len())
            .unwrap_or(0);
        let total = totals.get(category).copied().unwrap_or(Decimal::ZERO);
        println!(
            "{:<28} {:>14} {:>14} {:>6}",
            truncate(category, 28),
            format_amount(*average),
            format_amount(total),
            weeks_seen
        );
    }
    Ok(())
}

fn cli_trend(args: &[String], config: Config) -> Result<()> {
    let opts = parse_args(args)?;
    let Some((category, files)) = opts.positional.split_first() else {
        anyhow::bail!("Usage: weekspend trend <category> <file.csv>...");
    };
    let session = open_session(config, &opts, files)?;
    let Some(report) = report_or_notice(&session) else {
        return Ok(());
    };

    let Some(series) = session.trend(category) else {
        let known: Vec<&str> = report.categories().collect();
        anyhow::bail!(
            "No spending in '{category}'. Known categories: {}",
            known.join(", ")
        );
    };
    let peak = series
        .iter()
        .map(|(_, amount)| *amount)
        .max()
        .unwrap_or(Decimal::ZERO);

    let members = session.groups().originals_for_group(category);
    if members.len() > 1 || members.first() != Some(category) {
        println!("{category} ({}): weekly spending", members.join(", "));
    } else {
        println!("{category}: weekly spending");
    }
    println!("{}", "─".repeat(60));
    for (week, amount) in &series {
        println!(
            "  {week}  {:>12}  {}",
            format_amount(*amount),
            bar(*amount, peak, 30)
        );
    }
    println!("{}", "─".repeat(60));
    let active: Vec<Decimal> = series
        .iter()
        .map(|(_, a)| *a)
        .filter(|a| *a > Decimal::ZERO)
        .collect();
    if !active.is_empty() {
        let avg = active.iter().sum::<Decimal>() / Decimal::from(active.len());
        println!("  Average in weeks with spending: {}", format_amount(avg));
    }
    Ok(())
}

fn cli_benchmark(args: &[String], config: Config) -> Result<()> {
    let opts = parse_args(args)?;
    let session = open_session(config, &opts, &opts.positional)?;
    if !session.comparator().has_reference_data() {
        println!("Benchmark data unavailable. Use --reference <file.json>");
        return Ok(());
    }
    let Some(report) = session.ungrouped_report() else {
        println!("No spending data in the selected range");
        return Ok(());
    };

    println!(
        "{:<40} {:>14} {:>14} {:>9}",
        "Reference category", "You (annual)", "Reference", "Diff"
    );
    println!("{}", "─".repeat(80));
    for row in session.comparisons() {
        let reference = row
            .reference
            .map(format_amount)
            .unwrap_or_else(|| "n/a".into());
        let pct = row
            .difference_pct()
            .map(|p| {
                let sign = if p > Decimal::ZERO { "+" } else { "" };
                format!("{sign}{p:.0}%")
            })
            .unwrap_or_else(|| "n/a".into());
        println!(
            "{:<40} {:>14} {:>14} {:>9}",
            truncate(&row.reference_category, 40),
            format_amount(row.user_total),
            reference,
            pct
        );
    }
    println!("{}", "─".repeat(80));
    println!("  Your weekly average:  {}", format_amount(report.average_spending));
    if let Some(weekly) = session.weekly_benchmark() {
        println!("  Reference per week:   {}", format_amount(weekly));
    }

    let references = session.category_references();
    if !references.is_empty() {
        println!();
        println!("{:<28} {:>12} {:>12}", "Category", "You/week", "Ref/week");
        println!("{}", "─".repeat(54));
        for (category, reference) in &references {
            let actual = report
                .average_spending_by_category
                .get(category)
                .copied()
                .unwrap_or(Decimal::ZERO);
            println!(
                "{:<28} {:>12} {:>12}",
                truncate(category, 28),
                format_amount(actual),
                format_amount(*reference)
            );
        }
    }
    Ok(())
}

fn cli_budget(args: &[String], config: Config) -> Result<()> {
    let opts = parse_args(args)?;
    let session = open_session(config, &opts, &opts.positional)?;
    if session.budgets().is_empty() {
        println!("No budgets set. Use: weekspend set-budget <category> <amount>");
        return Ok(());
    }
    let report = session.report();

    println!(
        "{:<28} {:>12} {:>12} {:>12}",
        "Category", "Budget/week", "Actual/week", "Over/Under"
    );
    println!("{}", "─".repeat(67));
    for line in session.budget_lines(report.as_ref()) {
        let actual = line
            .actual_average
            .map(format_amount)
            .unwrap_or_else(|| "n/a".into());
        let sign = if line.is_over() { "+" } else { "" };
        println!(
            "{:<28} {:>12} {:>12} {:>12}",
            truncate(&line.category, 28),
            format_amount(line.weekly_budget),
            actual,
            format!("{sign}{}", format_amount(line.over_under()))
        );
    }
    Ok(())
}

// ── Settings commands ────────────────────────────────────────

fn cli_group(args: &[String], config: Config) -> Result<()> {
    let Some((name, rest)) = args.split_first() else {
        anyhow::bail!("Usage: weekspend group <name> <category>[,<category>...]");
    };
    let categories = split_categories(&rest.join(" "));
    if categories.is_empty() {
        anyhow::bail!("Group '{name}' needs at least one category");
    }
    let mut session = Session::new(config);
    session.set_group(name.clone(), categories.clone())?;
    println!("Group '{name}': {}", categories.join(", "));
    Ok(())
}

fn cli_ungroup(args: &[String], config: Config) -> Result<()> {
    let Some(name) = args.first() else {
        anyhow::bail!("Usage: weekspend ungroup <name>");
    };
    let mut session = Session::new(config);
    if session.remove_group(name)? {
        println!("Removed group '{name}'");
    } else {
        anyhow::bail!("No group named '{name}'");
    }
    Ok(())
}

fn cli_groups(config: Config) -> Result<()> {
    let session = Session::new(config);
    if session.groups().is_empty() {
        println!("No groups");
        return Ok(());
    }
    for (name, categories) in session.groups().groups() {
        println!("{name:<20} {}", categories.join(", "));
    }
    Ok(())
}

fn cli_set_budget(args: &[String], config: Config) -> Result<()> {
    let Some((amount, category)) = args.split_last() else {
        anyhow::bail!("Usage: weekspend set-budget <category> <amount>");
    };
    if category.is_empty() {
        anyhow::bail!("Usage: weekspend set-budget <category> <amount>");
    }
    let category = category.join(" ");
    let amount = Decimal::from_str(amount.trim_start_matches('$'))
        .with_context(|| format!("Invalid amount: {amount}"))?;
    let mut session = Session::new(config);
    session.set_budget(category.clone(), amount)?;
    if amount <= Decimal::ZERO {
        println!("Removed budget for {category}");
    } else {
        println!("Budget for {category}: {} per week", format_amount(amount));
    }
    Ok(())
}

fn cli_rule(args: &[String], config: Config) -> Result<()> {
    let opts = parse_args(args)?;
    let [pattern, category @ ..] = opts.positional.as_slice() else {
        anyhow::bail!("Usage: weekspend rule <pattern> <category> [--regex]");
    };
    if category.is_empty() {
        anyhow::bail!("Usage: weekspend rule <pattern> <category> [--regex]");
    }
    let category = category.join(" ");
    let rule = if opts.regex {
        regex::Regex::new(pattern).with_context(|| format!("Invalid regex: {pattern}"))?;
        CategoryRule::new_regex(pattern.clone(), category.clone())
    } else {
        CategoryRule::new_contains(pattern.clone(), category.clone())
    };
    let mut session = Session::new(config);
    session.add_rule(rule)?;
    println!("Rule added: '{pattern}' → {category}");
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────

/// Split "Gasoline, Auto Parts" style lists.
pub(crate) fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn bar(amount: Decimal, peak: Decimal, width: usize) -> String {
    use rust_decimal::prelude::ToPrimitive;
    if peak <= Decimal::ZERO {
        return String::new();
    }
    let ratio = (amount / peak).to_f64().unwrap_or(0.0);
    "█".repeat((ratio * width as f64).round() as usize)
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
