use crate::domain::client::Client;
use crate::templates::components::client_card;
use crate::templates::desktop_layout;
use crate::templates::pages::client_form::{client_form, ClientFormVm};
use maud::{html, Markup};

pub struct ClientsVm<'a> {
    pub email: &'a str,
    pub search: &'a str,
    pub clients: &'a [Client],
}

pub fn clients_page(vm: &ClientsVm<'_>) -> Markup {
    desktop_layout(
        "Клиенты",
        Some(vm.email),
        html! {
            main class="container" {
                h1 { "Клиенты" }

                form method="get" action="/clients" class="search"
                    hx-get="/clients"
                    hx-trigger="input changed delay:300ms from:#q"
                    hx-target="#client-list"
                    hx-select="#client-list"
                    hx-swap="outerHTML" {
                    input type="search" id="q" name="q" value=(vm.search)
                        placeholder="Поиск по имени, телефону или адресу";
                }

                (client_list(vm.clients, vm.search))

                details class="card" open[vm.clients.is_empty() && vm.search.is_empty()] {
                    summary { "Новый клиент" }
                    (client_form("/clients", "Добавить клиента", &ClientFormVm::default()))
                }
            }
        },
    )
}

fn client_list(clients: &[Client], search: &str) -> Markup {
    html! {
        section id="client-list" class="grid" {
            @if clients.is_empty() {
                @if search.trim().is_empty() {
                    p class="muted" { "Клиентов пока нет." }
                } @else {
                    p class="muted" { "Ничего не найдено." }
                }
            }
            @for client in clients {
                (client_card(client))
            }
        }
    }
}
