// Sample list content for the list screen. Static, never persisted.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleItem {
    /// Platform icon name (e.g. "ic_menu_camera")
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

impl SampleItem {
    const fn new(icon: &'static str, title: &'static str, description: &'static str) -> Self {
        Self { icon, title, description }
    }
}

const SAMPLE_ITEMS: [SampleItem; 5] = [
    SampleItem::new("ic_menu_camera", "Photos", "Access and manage your photos"),
    SampleItem::new("ic_menu_call", "Contacts", "View and edit your contacts"),
    SampleItem::new("ic_menu_agenda", "Calendar", "Schedule and manage events"),
    SampleItem::new("ic_menu_gallery", "Gallery", "Browse your media files"),
    SampleItem::new("ic_menu_send", "Messages", "Send and receive messages"),
];

pub fn sample_items() -> Vec<SampleItem> {
    SAMPLE_ITEMS.to_vec()
}
