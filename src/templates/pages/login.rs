use crate::templates::{components::email_cta_form, desktop_layout};
use maud::{html, Markup};

pub fn login_page() -> Markup {
    desktop_layout(
        "Вход",
        None,
        html! {
            main class="container narrow" {
                h1 { "Вход" }
                p class="lead" {
                    "Введите email, и мы пришлём ссылку для входа."
                }

                (email_cta_form())
            }
        },
    )
}
