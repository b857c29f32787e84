use gtk4::prelude::*;
use gtk4 as gtk;

/// Header, entry and send button. Holds no chat state of its own.
#[derive(Clone)]
pub struct ChatView {
    root: gtk::Box,
    header: gtk::Label,
    entry: gtk::Entry,
    send_btn: gtk::Button,
}

impl ChatView {
    pub fn new(header_text: &str) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let header = gtk::Label::new(Some(header_text));
        header.set_widget_name("chat-header");
        header.add_css_class("title-3");
        header.set_halign(gtk::Align::Start);
        root.append(&header);

        // Sent messages are not echoed locally; the area only reserves space.
        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        root.append(&scroller);

        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_widget_name("message-input");
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Type a message…"));
        let send_btn = gtk::Button::with_label("Send");
        send_btn.set_widget_name("send-button");
        input_row.append(&entry);
        input_row.append(&send_btn);
        root.append(&input_row);

        Self { root, header, entry, send_btn }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn set_header(&self, text: &str) {
        self.header.set_label(text);
    }

    pub fn input(&self) -> String {
        self.entry.text().to_string()
    }

    pub fn set_input(&self, text: &str) {
        self.entry.set_text(text);
    }

    /// The entry stays editable while a send is out; only the button is greyed.
    pub fn set_sending(&self, sending: bool) {
        self.send_btn.set_sensitive(!sending);
    }

    /// Run `send` on button click and on Enter in the entry.
    pub fn connect_send<F>(&self, send: F)
    where
        F: Fn() + 'static,
    {
        use std::rc::Rc;
        let send: Rc<dyn Fn()> = Rc::new(send);
        {
            let send = send.clone();
            self.send_btn.connect_clicked(move |_| (send)());
        }
        self.entry.connect_activate(move |_| (send)());
    }
}
