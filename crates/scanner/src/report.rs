use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::evaluate::{AccountReport, ActivityStatus, BalanceHealth};

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// A finished report entry with its table position.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub id: usize,
    pub name: String,
    /// Shortened for display
    pub account: String,
    pub sol_balance: f64,
    pub token_balance: f64,
    pub last_activity: DateTime<Utc>,
    pub elapsed: chrono::Duration,
    pub activity: ActivityStatus,
    pub health: BalanceHealth,
}

/// Accumulates report rows for one run and renders them as a console
/// table. IDs start at 1 and follow completion order; skipped accounts
/// consume no ID.
pub struct ReportTable {
    rows: Vec<ReportRow>,
    next_id: usize,
    token_symbol: String,
}

impl ReportTable {
    pub fn new(token_symbol: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
            token_symbol: token_symbol.into(),
        }
    }

    /// Append a completed account report and return its assigned ID.
    pub fn push(&mut self, report: AccountReport) -> usize {
        let id = self.next_id;
        self.next_id += 1;

        self.rows.push(ReportRow {
            id,
            name: report.name,
            account: shorten_address(&report.account, 10, 10),
            sol_balance: report.sol_balance,
            token_balance: report.token_balance,
            last_activity: report.last_activity,
            elapsed: report.elapsed,
            activity: report.activity,
            health: report.health,
        });

        id
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build the console table for all accumulated rows.
    pub fn render(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                header_cell("ID"),
                header_cell("Name"),
                header_cell("Account"),
                header_cell("SOL"),
                header_cell(&self.token_symbol),
                header_cell("Last Entry"),
                header_cell("Difftime"),
                header_cell("Active"),
            ]);

        for row in &self.rows {
            let health_color = match row.health {
                BalanceHealth::Healthy => Color::Green,
                BalanceHealth::Low => Color::Red,
            };
            let activity_color = match row.activity {
                ActivityStatus::Active => Color::Green,
                ActivityStatus::Stale => Color::Red,
            };

            table.add_row(vec![
                Cell::new(row.id).fg(Color::Yellow),
                Cell::new(&row.name),
                Cell::new(&row.account),
                Cell::new(format!("{:.4} SOL \u{25cf}", row.sol_balance)).fg(health_color),
                Cell::new(format!("{:.2} {}", row.token_balance, self.token_symbol)),
                Cell::new(
                    row.last_activity
                        .with_timezone(&Local)
                        .format(TIMESTAMP_FORMAT)
                        .to_string(),
                ),
                Cell::new(format_elapsed(row.elapsed)).fg(activity_color),
                Cell::new("\u{25cf}").fg(activity_color),
            ]);
        }

        table
    }

    /// Print the table and the run timestamp to stdout.
    pub fn print(&self) {
        println!("{}", self.render());
        println!();
        println!(
            "{}",
            format!("Last Update : {}", Local::now().format(TIMESTAMP_FORMAT)).yellow()
        );
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Green)
        .add_attribute(Attribute::Bold)
}

/// Shorten a base58 address to its first and last few characters.
pub fn shorten_address(address: &str, head: usize, tail: usize) -> String {
    if address.len() <= head + tail {
        return address.to_string();
    }
    format!("{}...{}", &address[..head], &address[address.len() - tail..])
}

/// Format an elapsed duration rounded to the nearest second.
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let millis = elapsed.num_milliseconds().max(0);
    let secs = (millis as f64 / 1000.0).round() as u64;
    humantime::format_duration(std::time::Duration::from_secs(secs)).to_string()
}
