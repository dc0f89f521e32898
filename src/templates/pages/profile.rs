use crate::domain::history::{HistoryEntry, HistoryStats, PROFILE_FEED_LEN};
use crate::templates::desktop_layout;
use crate::templates::pages::history::history_feed;
use maud::{html, Markup};

pub fn profile_page(email: &str, stats: &HistoryStats, recent: &[HistoryEntry]) -> Markup {
    desktop_layout(
        "Профиль",
        Some(email),
        html! {
            main class="container" {
                h1 { "Профиль" }
                p { "Вы вошли как " strong { (email) } }

                section class="card stats" {
                    h3 { "Последние " (PROFILE_FEED_LEN) " действий" }
                    dl {
                        dt { "Добавлено" } dd id="stat-created" { (stats.created) }
                        dt { "Обновлено" } dd id="stat-updated" { (stats.updated) }
                        dt { "Удалено" } dd id="stat-deleted" { (stats.deleted) }
                    }
                }

                section class="card" {
                    h3 { "Недавняя активность" }
                    (history_feed(recent))
                }

                section class="card danger-zone" {
                    h3 { "Опасная зона" }
                    form method="post" action="/profile/clear-all"
                        hx-confirm="Удалить всех клиентов и всю историю? Это действие необратимо." {
                        button type="submit" class="danger" { "Удалить все данные" }
                    }
                }
            }
        },
    )
}
