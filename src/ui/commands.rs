use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::app::{App, Screen};
use super::util::format_amount;
use crate::models::CategoryRule;
use crate::session::Session;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Session) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit weekspend", cmd_quit, r);
    register_command!("quit", "Quit weekspend", cmd_quit, r);
    register_command!("w", "Go to Weekly", cmd_weekly, r);
    register_command!("weekly", "Go to Weekly", cmd_weekly, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("t", "Go to Trends", cmd_trends, r);
    register_command!("trends", "Go to Trends", cmd_trends, r);
    register_command!("b", "Go to Benchmark", cmd_benchmark, r);
    register_command!("benchmark", "Go to Benchmark", cmd_benchmark, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "open",
        "Load CSV exports (e.g. :open ~/discover.csv ~/chase.csv)",
        cmd_open,
        r
    );
    register_command!("o", "Load CSV exports (e.g. :o ~/discover.csv)", cmd_open, r);
    register_command!("reload", "Re-read every loaded file", cmd_reload, r);
    register_command!(
        "range",
        "Set the window (e.g. :range 2024-01-01 2024-03-31, :range to clear)",
        cmd_range,
        r
    );
    register_command!(
        "group",
        "Group categories (e.g. :group Car Gasoline, Auto Parts)",
        cmd_group,
        r
    );
    register_command!("ungroup", "Remove a group (e.g. :ungroup Car)", cmd_ungroup, r);
    register_command!("groups", "List category groups", cmd_groups, r);
    register_command!("grouped", "Toggle aggregating by group", cmd_grouped, r);
    register_command!(
        "budget",
        "Set weekly budget (e.g. :budget Restaurants 75, 0 removes)",
        cmd_budget,
        r
    );
    register_command!(
        "rule",
        "Add categorization rule (e.g. :rule netflix Entertainment), list with no args",
        cmd_rule,
        r
    );
    register_command!(
        "regex-rule",
        "Add regex rule (e.g. :regex-rule ^AMZN Shopping)",
        cmd_regex_rule,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, session)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_weekly(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Weekly;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    Ok(())
}

fn cmd_trends(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Trends;
    Ok(())
}

fn cmd_benchmark(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Benchmark;
    Ok(())
}

fn cmd_budgets(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_open(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :open <file.csv> [file.csv...]");
        return Ok(());
    }

    let paths: Vec<PathBuf> = args
        .split_whitespace()
        .map(|p| PathBuf::from(crate::run::shellexpand(p)))
        .collect();
    let missing: Vec<String> = paths
        .iter()
        .filter(|p| !p.exists())
        .map(|p| p.display().to_string())
        .collect();
    if !missing.is_empty() {
        app.set_status(format!("File not found: {}", missing.join(", ")));
        return Ok(());
    }

    let count = paths.len();
    session.open(paths);
    app.refresh(session);

    let malformed: usize = session.reports().iter().map(|(_, r)| r.malformed.len()).sum();
    let mut msg = format!(
        "Loaded {count} file(s): {} transactions",
        session.store().len()
    );
    if malformed > 0 {
        msg.push_str(&format!(", {malformed} unreadable row(s), see log"));
    }
    app.set_status(msg);
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    session.reload();
    app.refresh(session);
    app.set_status(format!("Reloaded {} transactions", session.store().len()));
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    match parse_range(args) {
        Ok((start, end)) => {
            session.set_range(start, end);
            app.refresh(session);
            if app.report.is_none() && !session.store().is_empty() {
                app.set_status(format!("No spending in {}", app.window_label));
            } else {
                app.set_status(format!("Window: {}", app.window_label));
            }
        }
        Err(msg) => app.set_status(msg),
    }
    Ok(())
}

/// `""` clears the window; `"FROM"` or `"FROM TO"`, with `-` for an open end.
pub(crate) fn parse_range(args: &str) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
    let parse = |s: &str| -> Result<Option<NaiveDate>, String> {
        if s == "-" {
            return Ok(None);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid date '{s}'. Use YYYY-MM-DD"))
    };
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [] => Ok((None, None)),
        [from] => Ok((parse(from)?, None)),
        [from, to] => Ok((parse(from)?, parse(to)?)),
        _ => Err("Usage: :range [YYYY-MM-DD|-] [YYYY-MM-DD|-]".into()),
    }
}

fn cmd_group(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, ' ');
    let name = parts.next().unwrap_or("").trim();
    let categories = crate::run::split_categories(parts.next().unwrap_or(""));
    if name.is_empty() || categories.is_empty() {
        app.set_status("Usage: :group <name> <category>[, <category>...]");
        return Ok(());
    }

    let known = session.store().categories();
    let unknown: Vec<&str> = categories
        .iter()
        .filter(|c| !known.contains(*c))
        .map(String::as_str)
        .collect();
    let note = if unknown.is_empty() || known.is_empty() {
        String::new()
    } else {
        format!(" (not in loaded data: {})", unknown.join(", "))
    };

    session.set_group(name.to_string(), categories.clone())?;
    app.refresh(session);
    app.set_status(format!("Group {name}: {}{note}", categories.join(", ")));
    Ok(())
}

fn cmd_ungroup(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :ungroup <name>");
        return Ok(());
    }
    if session.remove_group(args)? {
        app.refresh(session);
        app.set_status(format!("Removed group {args}"));
    } else {
        app.set_status(format!("No group named '{args}'"));
    }
    Ok(())
}

fn cmd_groups(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if session.groups().is_empty() {
        app.set_status("No groups. Use :group <name> <category>, ...");
        return Ok(());
    }
    let totals = session.group_totals();
    let listing: Vec<String> = session
        .groups()
        .groups()
        .iter()
        .map(|(name, cats)| match totals.get(name) {
            Some(total) => format!("{name} = {} ({})", cats.join("+"), format_amount(*total)),
            None => format!("{name} = {}", cats.join("+")),
        })
        .collect();
    app.set_status(listing.join(" | "));
    Ok(())
}

fn cmd_grouped(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    session.grouped = !session.grouped;
    app.refresh(session);
    let msg = match (session.grouped, session.groups().is_empty()) {
        (true, true) => "Grouping on, but no groups are defined".to_string(),
        (true, false) => {
            let raw = session.store().categories();
            let labels = session.groups().grouped_categories(&raw);
            format!(
                "Aggregating by group: {} categories as {} labels",
                raw.len(),
                labels.len()
            )
        }
        (false, _) => "Aggregating by raw category".to_string(),
    };
    app.set_status(msg);
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    // Last token is the amount, everything before is the category name
    let parts: Vec<&str> = args.rsplitn(2, ' ').collect();
    if parts.len() < 2 {
        app.set_status("Usage: :budget <category> <weekly amount>. Example: :budget Restaurants 75");
        return Ok(());
    }

    let amount_str = parts[0];
    let category = parts[1].trim();

    let amount = match Decimal::from_str(amount_str.trim_start_matches('$')) {
        Ok(a) => a,
        Err(_) => {
            app.set_status(format!("Invalid amount: {amount_str}"));
            return Ok(());
        }
    };

    let previous = session.budgets().get(category);
    session.set_budget(category.to_string(), amount)?;
    app.refresh(session);
    app.screen = Screen::Budgets;
    match (amount > Decimal::ZERO, previous) {
        (false, Some(_)) => app.set_status(format!("Removed budget for {category}")),
        (false, None) => app.set_status(format!("No budget set for {category}")),
        (true, Some(old)) => app.set_status(format!(
            "Budget set: {category} = {} per week (was {})",
            format_amount(amount),
            format_amount(old)
        )),
        (true, None) => app.set_status(format!(
            "Budget set: {category} = {} per week",
            format_amount(amount)
        )),
    }
    Ok(())
}

fn cmd_rule(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        list_rules(app, session);
        return Ok(());
    }
    let Some((pattern, category)) = split_rule_args(args) else {
        app.set_status("Usage: :rule <pattern> <category>");
        return Ok(());
    };
    let pattern = pattern.to_lowercase();
    session.add_rule(CategoryRule::new_contains(pattern.clone(), category.clone()))?;
    app.refresh(session);
    app.set_status(format!("Added rule: '{pattern}' -> {category}"));
    Ok(())
}

fn cmd_regex_rule(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let Some((pattern, category)) = split_rule_args(args) else {
        app.set_status("Usage: :regex-rule <pattern> <category>");
        return Ok(());
    };
    if regex::Regex::new(&pattern).is_err() {
        app.set_status(format!("Invalid regex: {pattern}"));
        return Ok(());
    }
    session.add_rule(CategoryRule::new_regex(pattern.clone(), category.clone()))?;
    app.refresh(session);
    app.set_status(format!("Added regex rule: /{pattern}/ -> {category}"));
    Ok(())
}

fn list_rules(app: &mut App, session: &Session) {
    let rules = session.rules();
    if rules.is_empty() {
        app.set_status("No rules. Usage: :rule <pattern> <category>");
        return;
    }
    let listed: Vec<String> = rules
        .iter()
        .map(|r| {
            if r.is_regex {
                format!("/{}/ -> {}", r.pattern, r.category)
            } else {
                format!("'{}' -> {}", r.pattern, r.category)
            }
        })
        .collect();
    app.set_status(format!("{} rule(s): {}", rules.len(), listed.join(", ")));
}

/// First token is the pattern, the rest is the category name.
fn split_rule_args(args: &str) -> Option<(String, String)> {
    let (pattern, category) = args.split_once(' ')?;
    let category = category.trim();
    if pattern.is_empty() || category.is_empty() {
        return None;
    }
    Some((pattern.to_string(), category.to_string()))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
