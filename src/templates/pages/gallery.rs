use crate::domain::client::Client;
use crate::domain::gallery::GalleryCursor;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn gallery_page(email: &str, client: &Client, cursor: Option<GalleryCursor>) -> Markup {
    let base = format!("/clients/{}/photos", client.id);

    desktop_layout(
        "Фото объекта",
        Some(email),
        html! {
            main class="container gallery" {
                h1 { (client.full_name) }
                p class="muted" { (client.address) }

                @match cursor {
                    None => p { "Фотографий нет." },
                    Some(cursor) => {
                        figure {
                            img src=(client.property_photos[cursor.index()]) alt="Фото объекта";
                            figcaption { (cursor.index() + 1) " / " (cursor.len()) }
                        }
                        @if cursor.len() > 1 {
                            nav class="gallery-nav" {
                                a href={ (base) "?i=" (cursor.prev().index()) } { "←" }
                                a href={ (base) "?i=" (cursor.next().index()) } { "→" }
                            }
                        }
                    },
                }

                p { a href="/clients" { "← К списку клиентов" } }
            }
        },
    )
}
