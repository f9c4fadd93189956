use chrono::{DateTime, Utc};
use colored::Colorize;
use launchkit::api::{CmdMessage, MessageLevel};
use launchkit::bookmark::StoreLocation;
use launchkit::commands::{GridView, ListedItem, StoreInfo};
use launchkit::config::LaunchConfig;
use launchkit::error::Result;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const CELL_WIDTH: usize = 24;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_items(items: &[ListedItem]) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }

    for listed in items {
        let idx_str = format!("{:>3}. ", listed.position);
        let name = listed.item.display_name();
        let label = if name == listed.item.uri {
            name.to_string()
        } else {
            format!("{}  {}", name, listed.item.uri)
        };

        let time_ago = listed
            .item
            .modified
            .map(format_time_ago)
            .unwrap_or_else(|| " ".repeat(TIME_WIDTH));

        let available = LINE_WIDTH.saturating_sub(idx_str.width() + TIME_WIDTH);
        let label_display = truncate_to_width(&label, available);
        let padding = available.saturating_sub(label_display.width());

        println!(
            "{}{}{}{}",
            idx_str.yellow(),
            label_display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub fn print_items_json(items: &[ListedItem]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(items)?);
    Ok(())
}

pub fn print_store_info(info: &StoreInfo) {
    let location = match info.location {
        StoreLocation::User => info.location.to_string().green(),
        StoreLocation::Default => info.location.to_string().normal(),
        StoreLocation::DefaultOnly => info.location.to_string().yellow(),
    };
    let path = info
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no file yet)".to_string());

    println!("{:<10}{}", "store", info.kind.to_string().bold());
    println!("{:<10}{}", "location", location);
    println!("{:<10}{}", "path", path);
    println!("{:<10}{}", "items", info.len);
    if !info.writable {
        println!("{}", "read-only".red());
    }
}

pub fn print_grid(grid: &GridView) {
    if grid.cells.is_empty() {
        println!("Empty grid.");
        return;
    }

    for row in 0..grid.rows {
        let line: String = grid
            .cells
            .iter()
            .filter(|cell| cell.row == row)
            .map(|cell| {
                let tag = format!("[{}] ", cell.bin);
                let label = truncate_to_width(&cell.label, CELL_WIDTH - tag.width());
                let padding = CELL_WIDTH.saturating_sub(tag.width() + label.width());
                format!("{}{}{}", tag.dimmed(), label, " ".repeat(padding))
            })
            .collect();
        println!("{}", line.trim_end());
    }
    if grid.hidden > 0 {
        println!("{}", format!("(+{} hidden)", grid.hidden).dimmed());
    }
}

pub fn print_config(config: &LaunchConfig) {
    for key in [
        "columns",
        "item-limit",
        "status-refresh-secs",
        "discipline",
        "read-only-stores",
    ] {
        let value = config.get(key).unwrap_or_default();
        println!("{} = {}", key, value);
    }
}

/// Cut `s` to at most `max_width` columns, ending in an ellipsis when cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let kept: String = s
        .chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= budget
        })
        .collect();
    kept + "…"
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let elapsed = (Utc::now() - timestamp).to_std().unwrap_or_default();
    let ago = Formatter::new().convert(elapsed);
    format!("{ago:>width$}", width = TIME_WIDTH)
}
