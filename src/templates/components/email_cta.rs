use maud::{html, Markup};

pub fn email_cta_form() -> Markup {
    html! {
        div class="email-cta-wrapper" {
            form
                method="post"
                action="/auth/request-link"
                hx-post="/auth/request-link"
                hx-target="#auth-result"
                hx-swap="innerHTML"
                hx-disabled-elt="button"
                class="email-cta"
            {
                label class="sr-only" for="email" { "Email" }
                input
                    type="email"
                    id="email"
                    name="email"
                    placeholder="agent@agency.ru"
                    autocomplete="email"
                    required;

                button type="submit" class="primary" {
                    span class="btn-text" { "Получить ссылку" }
                    span class="spinner" aria-hidden="true" {}
                }

                p class="microcopy" {
                    "Мы пришлём одноразовую ссылку для входа. Пароль не нужен."
                }
            }

            div id="auth-result" {}
        }
    }
}
