//! Plain-text views for the terminal shell.

use owo_colors::OwoColorize;

use crate::controllers::dashboard::Tile;
use crate::controllers::list::{BookingRow, FetchPhase, Pagination};
use crate::models::Booking;
use crate::shell::{MenuItem, APP_SUBTITLE, APP_TITLE};
use crate::validation::{BookingField, FieldErrors};

const HEADERS: [&str; 6] = ["ID", "Customer", "Email", "Status", "Booking Date", "Actions"];

pub fn bookings_table(phase: FetchPhase, rows: &[BookingRow]) -> String {
    if phase == FetchPhase::Loading {
        return "Loading bookings...\n".to_string();
    }
    if rows.is_empty() {
        return "No bookings found\n".to_string();
    }

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                r.customer_name.clone(),
                r.email.clone(),
                r.status.as_str().to_string(),
                r.display_date.clone(),
                actions(r),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    push_row(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out
}

fn actions(row: &BookingRow) -> String {
    match (row.can_cancel, row.busy) {
        (false, _) => "edit".to_string(),
        (true, true) => "edit, cancelling...".to_string(),
        (true, false) => "edit, cancel".to_string(),
    }
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// `Pages: 1 [2] 3`, with the current page in brackets.
pub fn pagination(p: &Pagination) -> String {
    let mut out = String::from("Pages:");
    for b in p.buttons() {
        if b.current {
            out.push_str(&format!(" [{}]", b.page));
        } else {
            out.push_str(&format!(" {}", b.page));
        }
    }
    out.push('\n');
    out
}

pub fn booking_detail(b: &Booking) -> String {
    format!(
        "Booking {}\n  Customer Name: {}\n  Email:         {}\n  Booking Date:  {}\n  Status:        {}\n",
        b.id,
        b.customer_name,
        b.email,
        b.display_date(),
        b.status.label()
    )
}

pub fn field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (key, message) in errors {
        let label = BookingField::ALL
            .iter()
            .find(|f| f.as_str() == key)
            .map(|f| f.label())
            .unwrap_or(key.as_str());
        out.push_str(&format!("  {label}: {message}\n"));
    }
    out
}

pub fn dashboard(tiles: &[Tile], color: bool) -> String {
    if tiles.is_empty() {
        return "No booking statistics\n".to_string();
    }
    let width = tiles.iter().map(|t| t.label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for tile in tiles {
        let line = format!(" {:<width$}  {:>5} ", capitalize(&tile.label), tile.count);
        match (color, hex_rgb(tile.color.background), hex_rgb(tile.color.text)) {
            (true, Some((br, bg, bb)), Some((fr, fg, fb))) => {
                out.push_str(&line.on_truecolor(br, bg, bb).truecolor(fr, fg, fb).to_string());
            }
            _ => out.push_str(&line),
        }
        out.push('\n');
    }
    out
}

pub fn menu(items: &[MenuItem]) -> String {
    let mut out = format!("{APP_TITLE}\n{APP_SUBTITLE}\n\n");
    for item in items {
        let marker = if item.active { ">" } else { " " };
        out.push_str(&format!("{marker} {} {:<10} {}\n", item.icon, item.label, item.route));
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// `#RRGGBB` -> components.
pub fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
