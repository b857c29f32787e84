use adw::prelude::*;
use adw::Application;
use std::cell::RefCell;
use std::rc::Rc;

use crate::api::client::ApiClient;
use crate::app::Settings;
use crate::session::ChatSession;
use crate::ui::chat_view::ChatView;
use crate::ui::sidebar::{Sidebar, SidebarPick};

pub fn show_main_window(app: &Application, settings: Settings) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Parley")
        .default_width(960)
        .default_height(640)
        .build();

    let overlay = adw::ToastOverlay::new();

    let split = adw::Flap::builder()
        .reveal_flap(true)
        .locked(true)
        .modal(false)
        .build();

    let session = Rc::new(RefCell::new(ChatSession::new(settings.username.clone())));
    let chat = ChatView::new(&session.borrow().header_text());

    let sidebar = {
        let session = session.clone();
        let chat = chat.clone();
        Sidebar::new(move |pick| {
            let mut session = session.borrow_mut();
            match pick {
                SidebarPick::AllChats => {
                    session.select_all_chats();
                }
                SidebarPick::Contact(key) => {
                    session.select_contact(&key);
                }
            }
            chat.set_header(&session.header_text());
        })
    };
    split.set_flap(Some(&sidebar.widget()));
    split.set_content(Some(&chat.widget()));

    overlay.set_child(Some(&split));

    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk4::Label::new(Some(&format!("Parley: {}", settings.username)));
    header.set_title_widget(Some(&title));
    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));
    window.present();

    let client = match ApiClient::new(&settings.base_url) {
        Ok(client) => client,
        Err(err) => {
            log::error!("Cannot use server {}: {err}", settings.base_url);
            overlay.add_toast(adw::Toast::new(&format!("Invalid server URL: {}", settings.base_url)));
            return;
        }
    };

    // Load failures are logged by the session and leave the sidebar as it was.
    {
        let client = client.clone();
        let session = session.clone();
        let sidebar = sidebar.clone();
        let chat = chat.clone();
        let rx = crate::utils::run_async_to_main(async move { client.users().await });
        rx.attach(None, move |res| {
            let mut session = session.borrow_mut();
            if session.apply_contacts(res) {
                sidebar.set_contacts(session.contacts(), session.selection());
                chat.set_header(&session.header_text());
            }
            glib::ControlFlow::Continue
        });
    }

    {
        let chat_for_send = chat.clone();
        chat.connect_send(move || {
            let input = chat_for_send.input();
            let begun = session.borrow_mut().begin_send(&input);
            let Some(message) = begun else {
                return;
            };
            chat_for_send.set_sending(true);
            let client = client.clone();
            let session = session.clone();
            let chat = chat_for_send.clone();
            let rx = crate::utils::run_async_to_main(async move { client.send_message(&message).await });
            rx.attach(None, move |res| {
                let outcome = session.borrow_mut().finish_send(res);
                chat.set_sending(false);
                if let Some(text) = outcome.input_after(&input, &chat.input()) {
                    chat.set_input(&text);
                }
                glib::ControlFlow::Continue
            });
        });
    }
}
