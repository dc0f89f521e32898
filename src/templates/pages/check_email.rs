use maud::{html, Markup};

/// Returns the partial HTML content for the success message.
/// Used for HTMX swaps to replace the login form.
pub fn check_email_content(email: &str) -> Markup {
    html! {
        div class="text-center py-8 px-4 fade-in" {
            h3 class="text-lg leading-6 font-medium" { "Проверьте почту" }

            div class="mt-2" {
                p class="text-sm text-gray-500" {
                    "Мы отправили ссылку для входа на "
                    strong { (email) }
                    "."
                }
                p class="text-sm text-gray-500 mt-2" {
                    "Ссылка одноразовая и скоро истечёт."
                }
            }

            div class="mt-6" {
                a href="/login" class="text-sm font-medium" {
                    "Указать другой email"
                }
            }
        }
    }
}
