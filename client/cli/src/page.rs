//! Display surface the controllers write into.
//!
//! Elements are addressed by the same IDs the web markup uses, so a controller
//! never needs to know whether it is painting a browser page or a terminal.

use crate::chart::{self, ChartSpec};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Element IDs shared with the page markup.
pub mod ids {
    pub const TOTAL_FOLDERS: &str = "total-folders";
    pub const TOTAL_FILES: &str = "total-files";
    pub const TOTAL_USERS: &str = "total-users";
    pub const FOLDER_CHART: &str = "folderChart";
    pub const USER_ACTIVITY_CHART: &str = "userActivityChart";
    pub const CREATE_FOLDER_FORM: &str = "create-folder-form";
    pub const FOLDER_NAME: &str = "folder-name";
    pub const UPLOAD_FILE_FORM: &str = "upload-file-form";
    pub const FILE_UPLOAD: &str = "file-upload";
    pub const FOLDER_LIST: &str = "folder-list";
}

/// One rendered row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub label: String,
    /// Item id the share control targets; `None` when the row has no control.
    pub share_target: Option<String>,
}

/// Sink for everything a controller displays.
///
/// Writes are full replacements, so repeating one is harmless.
pub trait Surface {
    fn set_text(&mut self, id: &str, text: &str);
    fn input_value(&self, id: &str) -> Option<String>;
    fn clear_input(&mut self, id: &str);
    fn replace_list(&mut self, id: &str, entries: Vec<ListEntry>);
    fn draw_chart(&mut self, id: &str, chart: ChartSpec);
    /// Blocking user-facing message.
    fn alert(&mut self, message: &str);
}

#[derive(Debug, Clone)]
enum Element {
    Text { caption: String, value: String },
    Form { fields: Vec<String> },
    Input(String),
    List(Vec<ListEntry>),
    Chart(Option<ChartSpec>),
}

/// In-memory page: an ordered set of elements plus the alerts raised so far.
#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: Vec<(String, Element)>,
    alerts: Vec<String>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout of the dashboard page.
    pub fn dashboard() -> Self {
        let mut page = Self::new();
        page.push(ids::TOTAL_FOLDERS, text("Total folders"));
        page.push(ids::TOTAL_FILES, text("Total files"));
        page.push(ids::TOTAL_USERS, text("Total users"));
        page.push(ids::FOLDER_CHART, Element::Chart(None));
        page.push(ids::USER_ACTIVITY_CHART, Element::Chart(None));
        page
    }

    /// Layout of the file manager page.
    pub fn file_manager() -> Self {
        let mut page = Self::new();
        page.push(
            ids::CREATE_FOLDER_FORM,
            Element::Form {
                fields: vec![ids::FOLDER_NAME.to_string()],
            },
        );
        page.push(ids::FOLDER_NAME, Element::Input(String::new()));
        page.push(
            ids::UPLOAD_FILE_FORM,
            Element::Form {
                fields: vec![ids::FILE_UPLOAD.to_string()],
            },
        );
        page.push(ids::FILE_UPLOAD, Element::Input(String::new()));
        page.push(ids::FOLDER_LIST, Element::List(Vec::new()));
        page
    }

    fn push(&mut self, id: &str, element: Element) {
        self.elements.push((id.to_string(), element));
    }

    fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|(eid, _)| eid == id).map(|(_, e)| e)
    }

    /// Replace the element under `id`, appending it if the layout lacks it.
    fn put(&mut self, id: &str, element: Element) {
        match self.elements.iter_mut().find(|(eid, _)| eid == id) {
            Some((_, slot)) => *slot = element,
            None => self.push(id, element),
        }
    }

    /// Fill in a form field, as a user typing into it would.
    pub fn set_input(&mut self, id: &str, value: &str) {
        self.put(id, Element::Input(value.to_string()));
    }

    /// Write the visible parts of the page as plain text.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (id, element) in &self.elements {
            match element {
                Element::Text { caption, value } => {
                    let value = if value.is_empty() { "-" } else { value.as_str() };
                    writeln!(out, "{}: {}", caption, value)?;
                }
                Element::List(entries) => {
                    if entries.is_empty() {
                        writeln!(out, "(empty)")?;
                    }
                    for entry in entries {
                        match &entry.share_target {
                            Some(target) => writeln!(out, "  {}  [share: {}]", entry.label, target)?,
                            None => writeln!(out, "  {}", entry.label)?,
                        }
                    }
                }
                Element::Chart(Some(spec)) => {
                    for line in chart::render_lines(spec, chart::DEFAULT_WIDTH, chart::DEFAULT_HEIGHT) {
                        writeln!(out, "{}", line)?;
                    }
                }
                Element::Chart(None) => {
                    tracing::debug!(id = %id, "chart surface not drawn");
                }
                Element::Form { .. } | Element::Input(_) => {}
            }
        }
        for alert in &self.alerts {
            writeln!(out, "! {}", alert)?;
        }
        Ok(())
    }
}

// Read-back of element state, for asserting on what a controller drew.
#[cfg(test)]
impl Page {
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.get(id)? {
            Element::Text { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, id: &str) -> Option<&[ListEntry]> {
        match self.get(id)? {
            Element::List(entries) => Some(entries.as_slice()),
            _ => None,
        }
    }

    pub fn chart(&self, id: &str) -> Option<&ChartSpec> {
        match self.get(id)? {
            Element::Chart(chart) => chart.as_ref(),
            _ => None,
        }
    }

    /// Input ids belonging to a form.
    pub fn form_fields(&self, id: &str) -> Option<&[String]> {
        match self.get(id)? {
            Element::Form { fields } => Some(fields.as_slice()),
            _ => None,
        }
    }
}

/// Run `f` against a shared surface. The lock is never held across an await.
pub fn paint<S, R>(surface: &Mutex<S>, f: impl FnOnce(&mut S) -> R) -> R {
    let mut guard = surface.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

fn text(caption: &str) -> Element {
    Element::Text {
        caption: caption.to_string(),
        value: String::new(),
    }
}

impl Surface for Page {
    fn set_text(&mut self, id: &str, value: &str) {
        let caption = match self.get(id) {
            Some(Element::Text { caption, .. }) => caption.clone(),
            _ => id.to_string(),
        };
        self.put(
            id,
            Element::Text {
                caption,
                value: value.to_string(),
            },
        );
    }

    fn input_value(&self, id: &str) -> Option<String> {
        match self.get(id)? {
            Element::Input(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn clear_input(&mut self, id: &str) {
        if let Some((_, Element::Input(value))) = self.elements.iter_mut().find(|(eid, _)| eid == id) {
            value.clear();
        }
    }

    fn replace_list(&mut self, id: &str, entries: Vec<ListEntry>) {
        self.put(id, Element::List(entries));
    }

    fn draw_chart(&mut self, id: &str, chart: ChartSpec) {
        self.put(id, Element::Chart(Some(chart)));
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
