use std::io::Write;

use chrono::Local;
use watch_core::{AppViewModel, Listing, ListingRow, Phase};

pub fn print_batch(listings: &[Listing]) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(
        out,
        "--- {} listings at {} ---",
        listings.len(),
        Local::now().format("%H:%M:%S")
    );
    for listing in listings {
        let _ = writeln!(out, "{}", batch_line(&ListingRow::from(listing)));
    }
    let _ = out.flush();
}

fn batch_line(row: &ListingRow) -> String {
    let marker = if row.suitable { '*' } else { ' ' };
    format!(
        "{marker} {:<40} deposit {:>15}  rent {:>12}  {}",
        row.title, row.deposit, row.rent, row.href
    )
}

pub fn print_status(view: &AppViewModel) {
    let _ = writeln!(std::io::stdout().lock(), "{}", status_line(view));
}

fn status_line(view: &AppViewModel) -> String {
    let phase = match view.phase {
        Phase::Idle => "idle",
        Phase::Fetching => "fetching",
        Phase::Waiting => "waiting",
        Phase::Stopped => "stopped",
    };
    let mut line = match view.cycle {
        Some(cycle) => format!("[{phase} #{cycle}]"),
        None => format!("[{phase}]"),
    };
    line.push_str(&format!(
        " seen {} | new {} | alerted {}",
        view.seen_count, view.last_new_count, view.notified_total
    ));
    if let Some(delay) = view.next_delay {
        line.push_str(&format!(" | next in {}s", delay.as_secs()));
    }
    if view.consecutive_failures > 0 {
        line.push_str(&format!(" | failures {}", view.consecutive_failures));
    }
    if let Some(pending) = &view.pending_url {
        line.push_str(&format!(" | switching to {pending}"));
    }
    if let Some(error) = &view.last_error {
        line.push_str(&format!(" | error: {error}"));
    }
    line
}

pub fn print_help() {
    println!(
        "commands:\n  start [url]  begin polling\n  url <url>    change the search page\n  refetch (r)  poll now\n  stop         stop polling\n  help (h)     this text\n  quit (q)     exit"
    );
}
