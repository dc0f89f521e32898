use crate::domain::client::{Client, MeetingStatus};
use crate::domain::meeting_time::to_input_value;
use crate::domain::voice::ContactFields;
use crate::templates::components::contact_fields;
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};

/// Reads chosen files as data URLs into hidden `photo` inputs.
const PHOTO_SCRIPT: &str = r#"
document.addEventListener('change', function (e) {
  if (e.target.id !== 'photo-input') return;
  var list = document.getElementById('photo-list');
  Array.prototype.forEach.call(e.target.files, function (file) {
    var reader = new FileReader();
    reader.onload = function () {
      var item = document.createElement('div');
      item.className = 'photo-item';
      item.innerHTML = '<img alt=""><input type="hidden" name="photo">'
        + '<button type="button" onclick="this.parentNode.remove()">×</button>';
      item.querySelector('img').src = reader.result;
      item.querySelector('input').value = reader.result;
      list.appendChild(item);
    };
    reader.readAsDataURL(file);
  });
  e.target.value = '';
});
"#;

/// Values the form is rendered with.
#[derive(Debug, Clone, Default)]
pub struct ClientFormVm {
    pub contact: ContactFields,
    /// `datetime-local` value, `YYYY-MM-DDTHH:MM`.
    pub meeting: String,
    pub status: Option<MeetingStatus>,
    pub photos: Vec<String>,
}

impl ClientFormVm {
    pub fn from_client(client: &Client) -> Self {
        Self {
            contact: ContactFields {
                full_name: client.full_name.clone(),
                phone: client.phone.clone(),
                address: client.address.clone(),
            },
            meeting: to_input_value(&client.meeting_date),
            status: Some(client.status),
            photos: client.property_photos.clone(),
        }
    }
}

pub fn client_form(action: &str, submit_label: &str, vm: &ClientFormVm) -> Markup {
    html! {
        form method="post" action=(action) class="client-form" {
            fieldset class="dictation" {
                legend { "Голосовой ввод" }
                textarea name="transcript" rows="2"
                    placeholder="ФИО — Щемелев Алексей. Телефон — 9155151. Адрес — улица Ленина, 10" {}
                button type="button"
                    hx-post="/voice/parse"
                    hx-include="closest form"
                    hx-target="#contact-fields"
                    hx-swap="outerHTML" { "Заполнить из текста" }
            }

            (contact_fields(&vm.contact))

            label for="meeting_date" { "Дата и время встречи" }
            input type="datetime-local" id="meeting_date" name="meeting_date"
                value=(vm.meeting) required;

            @if let Some(current) = vm.status {
                label for="status" { "Статус" }
                select id="status" name="status" {
                    @for status in MeetingStatus::ALL {
                        option value=(status.as_str()) selected[status == current] { (status.label()) }
                    }
                }
            }

            fieldset class="photos" {
                legend { "Фото объекта" }
                input type="hidden" name="photos_submitted" value="1";
                div id="photo-list" {
                    @for photo in &vm.photos {
                        div class="photo-item" {
                            img src=(photo) alt="";
                            input type="hidden" name="photo" value=(photo);
                            button type="button" onclick="this.parentNode.remove()" { "×" }
                        }
                    }
                }
                input type="file" id="photo-input" accept="image/*" multiple;
            }

            button type="submit" class="primary" { (submit_label) }
        }
        script { (PreEscaped(PHOTO_SCRIPT)) }
    }
}

pub fn edit_client_page(email: &str, client: &Client) -> Markup {
    desktop_layout(
        "Редактирование клиента",
        Some(email),
        html! {
            main class="container narrow" {
                h1 { "Редактирование: " (client.full_name) }
                (client_form(
                    &format!("/clients/{}", client.id),
                    "Сохранить",
                    &ClientFormVm::from_client(client),
                ))
                p { a href="/clients" { "← К списку клиентов" } }
            }
        },
    )
}
