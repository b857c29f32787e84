use gtk4::prelude::*;
use gtk4 as gtk;

use crate::api::models::Contact;
use crate::session::{Selection, ALL_CHATS};

/// A sidebar row the user activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarPick {
    AllChats,
    Contact(String),
}

/// Contact list with a fixed "All Chats" row on top.
///
/// Activation is delegated: one `row-activated` handler on the list, connected at construction,
/// resolves rows by their widget name. Re-rendering contacts never touches handlers.
#[derive(Clone)]
pub struct Sidebar {
    root: gtk::Box,
    list: gtk::ListBox,
}

impl Sidebar {
    pub fn new<F>(on_pick: F) -> Self
    where
        F: Fn(SidebarPick) + 'static,
    {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let title = gtk::Label::new(Some("Contacts"));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let list = gtk::ListBox::new();
        list.set_widget_name("sidebar");
        list.set_selection_mode(gtk::SelectionMode::Single);
        list.set_vexpand(true);

        let all_chats = Self::row(ALL_CHATS);
        all_chats.set_widget_name("all-chats");
        list.append(&all_chats);

        list.connect_row_activated(move |_, row| {
            if row.index() == 0 {
                on_pick(SidebarPick::AllChats);
            } else {
                on_pick(SidebarPick::Contact(row.widget_name().to_string()));
            }
        });

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .build();
        scroller.set_child(Some(&list));
        root.append(&scroller);

        Self { root, list }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    fn row(text: &str) -> gtk::ListBoxRow {
        let row = gtk::ListBoxRow::new();
        let label = gtk::Label::new(Some(text));
        label.set_margin_top(8);
        label.set_margin_bottom(8);
        label.set_margin_start(8);
        label.set_margin_end(8);
        label.set_halign(gtk::Align::Start);
        row.set_child(Some(&label));
        row
    }

    /// Replace every contact row; the "All Chats" row stays. The row for `selection` is
    /// highlighted again afterwards.
    pub fn set_contacts(&self, contacts: &[Contact], selection: &Selection) {
        while let Some(row) = self.list.row_at_index(1) {
            self.list.remove(&row);
        }
        for contact in contacts {
            let row = Self::row(&contact.username);
            row.add_css_class("contact");
            row.set_widget_name(&contact.username);
            self.list.append(&row);
        }
        self.highlight(selection);
    }

    pub fn highlight(&self, selection: &Selection) {
        let row = match selection {
            Selection::AllChats => self.list.row_at_index(0),
            Selection::Contact(username) => {
                let mut index = 1;
                loop {
                    match self.list.row_at_index(index) {
                        Some(row) if row.widget_name().as_str() == username => break Some(row),
                        Some(_) => index += 1,
                        None => break self.list.row_at_index(0),
                    }
                }
            }
        };
        self.list.select_row(row.as_ref());
    }
}
