use crate::domain::client::Client;
use crate::templates::components::{status_badge, status_buttons};
use crate::templates::desktop_layout;
use chrono::NaiveDate;
use maud::{html, Markup};

pub fn calendar_page(email: &str, day: NaiveDate, meetings: &[Client]) -> Markup {
    let iso = day.format("%Y-%m-%d").to_string();
    let back = format!("/calendar?date={iso}");
    let prev = day.pred_opt().map(|d| d.format("%Y-%m-%d").to_string());
    let next = day.succ_opt().map(|d| d.format("%Y-%m-%d").to_string());

    desktop_layout(
        "Календарь",
        Some(email),
        html! {
            main class="container" {
                h1 { "Встречи на " (day.format("%d.%m.%Y")) }

                nav class="day-nav" {
                    @if let Some(prev) = prev {
                        a href={ "/calendar?date=" (prev) } { "← Предыдущий день" }
                    }
                    form method="get" action="/calendar" class="inline" {
                        input type="date" name="date" value=(iso) onchange="this.form.submit()";
                    }
                    @if let Some(next) = next {
                        a href={ "/calendar?date=" (next) } { "Следующий день →" }
                    }
                }

                @if meetings.is_empty() {
                    p class="muted" { "На этот день встреч нет." }
                } @else {
                    ol class="meetings" {
                        @for client in meetings {
                            li class="card" {
                                time datetime=(client.meeting_date) {
                                    (client.meeting_date.get(11..16).unwrap_or(""))
                                }
                                " "
                                strong { (client.full_name) }
                                " "
                                (status_badge(client.status))
                                p class="muted" { (client.address) " · " (client.phone) }
                                (status_buttons(client, &back))
                            }
                        }
                    }
                }
            }
        },
    )
}
