use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::app::Settings;

/// First-run window: asks for the server and the name to send as.
pub fn show_setup_window(app: &Application) {
    let defaults = Settings::default();

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Parley Setup")
        .default_width(420)
        .default_height(260)
        .resizable(false)
        .build();

    let toast_overlay = adw::ToastOverlay::new();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let title = gtk::Label::new(Some("Connect to a chat server"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let server_entry = gtk::Entry::new();
    server_entry.set_placeholder_text(Some("Server URL (e.g. http://127.0.0.1:8000)"));
    server_entry.set_text(&defaults.base_url);
    server_entry.set_hexpand(true);

    let name_entry = gtk::Entry::new();
    name_entry.set_placeholder_text(Some("Your name"));
    name_entry.set_text(&defaults.username);
    name_entry.set_hexpand(true);

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    form.append(&server_entry);
    form.append(&name_entry);
    root.append(&form);

    let status = gtk::Label::new(None);
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    root.append(&status);

    let connect_btn = gtk::Button::with_label("Connect");
    connect_btn.add_css_class("suggested-action");
    connect_btn.set_halign(gtk::Align::End);
    root.append(&connect_btn);

    toast_overlay.set_child(Some(&root));
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let header_title = gtk::Label::new(Some("Parley"));
    header.set_title_widget(Some(&header_title));
    container.append(&header);
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    let on_connect = {
        let app = app.clone();
        let window = window.clone();
        let overlay = toast_overlay.clone();
        let server_entry = server_entry.clone();
        let name_entry = name_entry.clone();
        move || {
            let base_url = crate::utils::normalize_url(&server_entry.text());
            let username = name_entry.text().trim().to_string();
            if base_url.is_empty() || username.is_empty() {
                overlay.add_toast(adw::Toast::new("Please enter a server URL and a name."));
                return;
            }

            let http = match reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(5))
                .build()
            {
                Ok(http) => http,
                Err(err) => {
                    log::error!("Cannot build HTTP client: {err}");
                    return;
                }
            };
            let client = match ApiClient::with_http(http, &base_url) {
                Ok(client) => client,
                Err(err) => {
                    overlay.add_toast(adw::Toast::new(&format!("Invalid server URL: {err}")));
                    return;
                }
            };

            status.set_label("Connecting…");

            let rx: glib::Receiver<Result<u16, ApiError>> =
                crate::utils::run_async_to_main(async move { client.ping().await });

            let status_label = status.clone();
            let app = app.clone();
            let window = window.clone();
            let overlay = overlay.clone();
            rx.attach(None, move |res| {
                // Settings are kept even when the probe fails; the server may come up later.
                let message = match res {
                    Ok(code) => format!("Connected (HTTP {code})"),
                    Err(err) => {
                        log::warn!("Server check failed: {err}");
                        "Saved (server unreachable)".to_string()
                    }
                };
                status_label.set_label(&message);

                let settings = Settings {
                    base_url: base_url.clone(),
                    username: username.clone(),
                };
                if let Err(e) = settings.save() {
                    log::warn!("Failed to save settings: {e}");
                    overlay.add_toast(adw::Toast::new(&format!("Failed to save settings: {}", e)));
                }
                crate::ui::main_window::show_main_window(&app, settings);
                window.close();
                glib::ControlFlow::Continue
            });
        }
    };

    use std::rc::Rc;
    let on_connect: Rc<dyn Fn()> = Rc::new(on_connect);
    {
        let on_connect = on_connect.clone();
        connect_btn.connect_clicked(move |_| (on_connect)());
    }
    {
        let on_connect = on_connect.clone();
        server_entry.connect_activate(move |_| (on_connect)());
    }
    {
        let on_connect = on_connect.clone();
        name_entry.connect_activate(move |_| (on_connect)());
    }

    window.present();
}
