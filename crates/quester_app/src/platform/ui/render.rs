use std::fmt::Write;

use quester_core::{AppViewModel, BatchOrigin};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
pub const PROMPT: &str = "> ";

/// Draws the whole screen. `notice` is feedback for the last typed command.
pub fn render(view: &AppViewModel, toast: Option<&str>, notice: Option<&str>) -> String {
    let mut out = String::from(CLEAR_SCREEN);
    out.push_str(&render_body(view, toast, notice));
    out.push_str(PROMPT);
    out
}

fn render_body(view: &AppViewModel, toast: Option<&str>, notice: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Unique Search Queries");
    let _ = writeln!(
        out,
        "count {} | timer {}s | volume {}%{}",
        view.count.get(),
        view.timer_seconds.get(),
        view.volume.percent(),
        if view.muted { " (muted)" } else { "" }
    );
    out.push('\n');

    if view.busy {
        let _ = writeln!(out, "Fetching queries...");
    }
    if let Some(BatchOrigin::Fallback { reason }) = &view.origin {
        let _ = writeln!(out, "Backend unavailable ({reason}); showing generated queries.");
    }

    if view.cards.is_empty() {
        if !view.busy {
            let _ = writeln!(out, "No queries yet. Type `fetch` to get a batch.");
        }
    } else {
        for card in &view.cards {
            let _ = writeln!(
                out,
                "{:>3}. [{}] {}",
                card.ordinal,
                if card.done { "x" } else { " " },
                card.item.text
            );
        }
        let _ = writeln!(out, "done {}/{}", view.done_count, view.cards.len());
    }

    if let Some(countdown) = &view.countdown {
        let _ = writeln!(out, "timer {}s  \"{}\"", countdown.remaining, countdown.query);
    }
    if view.celebrating {
        let _ = writeln!(out, "*** Batch complete! ***");
    }

    if !view.history.is_empty() {
        out.push('\n');
        let _ = writeln!(
            out,
            "history ({}): {}",
            view.history_len,
            view.history.join(" | ")
        );
    }

    if let Some(toast) = toast {
        let _ = writeln!(out, "\n>> {toast}");
    }
    if let Some(notice) = notice {
        let _ = writeln!(out, "{notice}");
    }
    out
}
