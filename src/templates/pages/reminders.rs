use crate::domain::client::Client;
use crate::domain::meeting_time::parse_stamp;
use chrono::NaiveDateTime;
use maud::{html, Markup};

/// Polled fragment: planned meetings about to start. Empty when there are none.
pub fn reminders_partial(meetings: &[Client], now: NaiveDateTime) -> Markup {
    html! {
        @if !meetings.is_empty() {
            div class="reminders" role="status" {
                @for client in meetings {
                    p class="reminder" {
                        @match parse_stamp(&client.meeting_date) {
                            Some(at) => {
                                "Через " ((at - now).num_minutes().max(0)) " мин: "
                            },
                            None => { "Скоро: " },
                        }
                        strong { (client.full_name) }
                        @if !client.address.is_empty() {
                            ", " (client.address)
                        }
                    }
                }
            }
        }
    }
}
