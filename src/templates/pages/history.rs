use crate::domain::history::HistoryEntry;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn history_feed(entries: &[HistoryEntry]) -> Markup {
    html! {
        @if entries.is_empty() {
            p class="muted" { "История пуста." }
        } @else {
            ul class="history" {
                @for entry in entries {
                    li class={ "history-item history-" (entry.action.as_str()) } {
                        time datetime=(entry.timestamp) { (short_timestamp(&entry.timestamp)) }
                        " "
                        strong { (entry.action.label()) }
                        @if let Some(details) = &entry.details {
                            " · " (details)
                        }
                    }
                }
            }
        }
    }
}

/// `2025-09-24T19:00:00.000Z` → `2025-09-24 19:00`.
fn short_timestamp(ts: &str) -> String {
    match (ts.get(0..10), ts.get(11..16)) {
        (Some(day), Some(time)) => format!("{day} {time}"),
        _ => ts.to_string(),
    }
}

pub fn history_page(email: &str, entries: &[HistoryEntry]) -> Markup {
    desktop_layout(
        "История",
        Some(email),
        html! {
            main class="container" {
                h1 { "История действий" }

                div class="toolbar" {
                    a href="/history/export" class="button" { "Выгрузить в Excel" }
                    form method="post" action="/history/clear" class="inline"
                        hx-confirm="Очистить всю историю?" {
                        button type="submit" class="danger" disabled[entries.is_empty()] { "Очистить историю" }
                    }
                }

                (history_feed(entries))
            }
        },
    )
}
