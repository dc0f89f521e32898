use crate::domain::client::{Client, MeetingStatus};
use crate::domain::voice::ContactFields;
use maud::{html, Markup};

pub fn status_badge(status: MeetingStatus) -> Markup {
    html! {
        span class={ "badge badge-" (status.as_str()) } { (status.label()) }
    }
}

/// Human form of a canonical meeting stamp: `24.09.2025 19:00`.
pub fn meeting_label(stamp: &str) -> String {
    match crate::domain::meeting_time::parse_stamp(stamp) {
        Some(at) => at.format("%d.%m.%Y %H:%M").to_string(),
        None => stamp.to_string(),
    }
}

pub fn client_card(client: &Client) -> Markup {
    html! {
        article class="card client-card" id={ "client-" (client.id) } {
            @if let Some(src) = client.thumbnail() {
                a href={ "/clients/" (client.id) "/photos" } class="thumb" {
                    img src=(src) alt="Фото объекта" loading="lazy";
                    @if client.property_photos.len() > 1 {
                        span class="thumb-count" { "+" (client.property_photos.len() - 1) }
                    }
                }
            }
            div class="card-body" {
                h3 { (client.full_name) }
                p { a href={ "tel:" (client.phone) } { (client.phone) } }
                p class="muted" { (client.address) }
                p { (meeting_label(&client.meeting_date)) " " (status_badge(client.status)) }
            }
            div class="card-actions" {
                a href={ "/clients/" (client.id) "/edit" } { "Изменить" }
                form method="post" action={ "/clients/" (client.id) "/delete" }
                    hx-confirm="Удалить клиента?" {
                    button type="submit" class="danger" { "Удалить" }
                }
            }
        }
    }
}

/// One form per status so each button is a plain post.
pub fn status_buttons(client: &Client, back_to: &str) -> Markup {
    html! {
        div class="status-buttons" {
            @for status in MeetingStatus::ALL {
                @if status != client.status {
                    form method="post" action={ "/clients/" (client.id) "/status" } {
                        input type="hidden" name="status" value=(status.as_str());
                        input type="hidden" name="back" value=(back_to);
                        button type="submit" { (status.label()) }
                    }
                }
            }
        }
    }
}

/// The contact inputs the dictation box re-renders. `id` is the htmx swap target.
pub fn contact_fields(fields: &ContactFields) -> Markup {
    html! {
        div id="contact-fields" {
            label for="full_name" { "ФИО" }
            input type="text" id="full_name" name="full_name" value=(fields.full_name) required;

            label for="phone" { "Телефон" }
            input type="tel" id="phone" name="phone" value=(fields.phone);

            label for="address" { "Адрес объекта" }
            input type="text" id="address" name="address" value=(fields.address);
        }
    }
}
