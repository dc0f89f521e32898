use maud::{html, Markup, DOCTYPE};

/// Page chrome. `email` is the signed-in agent; when present the navigation and the
/// reminder poll are rendered.
pub fn desktop_layout(title: &str, email: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ru" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Realtor CRM" }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
                script src="/static/htmx.js" defer {};
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { a href="/" { "Realtor CRM" } }
                    @if let Some(email) = email {
                        nav {
                            ul {
                                li { a href="/clients" { "Клиенты" } }
                                li { a href="/calendar" { "Календарь" } }
                                li { a href="/history" { "История" } }
                                li { a href="/profile" { "Профиль" } }
                            }
                        }
                        form method="post" action="/logout" class="inline" {
                            span class="muted" { (email) }
                            " "
                            button type="submit" class="link" { "Выйти" }
                        }
                    } @else {
                        a href="/login" class="text-base font-medium" { "Войти" }
                    }
                }
                @if email.is_some() {
                    div id="reminders"
                        hx-get="/meetings/upcoming"
                        hx-trigger="load, every 60s"
                        hx-swap="innerHTML" {}
                }
                (content)
            }
        }
    }
}
