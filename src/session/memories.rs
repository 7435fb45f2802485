//! Memories panel: filter form, result table and row actions

use super::status::StatusLine;
use crate::error::{DashError, Result};
use crate::types::{format_local_time, Memory, MemoryPage, MemoryQuery};
use crate::utils::string::{id_prefix, sanitize_cell};
use ratatui::widgets::TableState;
use tracing::{debug, warn};
use tui_textarea::TextArea;

pub const SERVER_REQUIRED: &str = "Server ID is required.";
const LOAD_FAILED: &str = "Failed to load memories.";

/// Focusable parts of the memories tab, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryField {
    Server,
    User,
    Query,
    Table,
}

impl MemoryField {
    pub fn next(self) -> Self {
        match self {
            MemoryField::Server => MemoryField::User,
            MemoryField::User => MemoryField::Query,
            MemoryField::Query => MemoryField::Table,
            MemoryField::Table => MemoryField::Server,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            MemoryField::Server => MemoryField::Table,
            MemoryField::User => MemoryField::Server,
            MemoryField::Query => MemoryField::User,
            MemoryField::Table => MemoryField::Query,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MemoryField::Server => "Server ID",
            MemoryField::User => "User ID",
            MemoryField::Query => "Query",
            MemoryField::Table => "Results",
        }
    }
}

/// The three filter inputs
pub struct FilterForm {
    server: TextArea<'static>,
    user: TextArea<'static>,
    query: TextArea<'static>,
}

impl FilterForm {
    pub fn new() -> Self {
        Self {
            server: TextArea::default(),
            user: TextArea::default(),
            query: TextArea::default(),
        }
    }

    pub fn input(&self, field: MemoryField) -> Option<&TextArea<'static>> {
        match field {
            MemoryField::Server => Some(&self.server),
            MemoryField::User => Some(&self.user),
            MemoryField::Query => Some(&self.query),
            MemoryField::Table => None,
        }
    }

    pub fn input_mut(&mut self, field: MemoryField) -> Option<&mut TextArea<'static>> {
        match field {
            MemoryField::Server => Some(&mut self.server),
            MemoryField::User => Some(&mut self.user),
            MemoryField::Query => Some(&mut self.query),
            MemoryField::Table => None,
        }
    }

    /// Replace a field's text
    pub fn set(&mut self, field: MemoryField, value: &str) {
        if let Some(input) = self.input_mut(field) {
            *input = TextArea::new(vec![value.to_string()]);
        }
    }

    /// A field's trimmed text
    pub fn value(&self, field: MemoryField) -> String {
        self.input(field)
            .map(|input| input.lines().concat().trim().to_string())
            .unwrap_or_default()
    }

    /// Build the list query; Server ID is the only required field
    pub fn to_query(&self) -> Result<MemoryQuery> {
        let server_id = self.value(MemoryField::Server);
        if server_id.is_empty() {
            return Err(DashError::Validation(SERVER_REQUIRED.to_string()));
        }

        let optional = |field| Some(self.value(field)).filter(|v: &String| !v.is_empty());
        Ok(MemoryQuery::for_server(server_id)
            .user(optional(MemoryField::User))
            .text(optional(MemoryField::Query)))
    }
}

impl Default for FilterForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Action bound to a rendered row, carrying the full identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Edit { id: String, server_id: String },
    Delete { id: String, server_id: String },
}

/// One rendered memory.
///
/// Keeps the full id and the server id the list was fetched under, so
/// actions never depend on the truncated text shown on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    id: String,
    scope: String,
    content: String,
    cells: [String; 5],
}

impl MemoryRow {
    pub fn new(memory: &Memory, scope: &str) -> Self {
        Self {
            id: memory.id.clone(),
            scope: scope.to_string(),
            content: memory.content.clone(),
            cells: [
                sanitize_cell(id_prefix(&memory.id)),
                sanitize_cell(&memory.content),
                sanitize_cell(&memory.server_id),
                sanitize_cell(memory.user_id.as_deref().unwrap_or_default()),
                format_local_time(memory.created_at.as_ref()),
            ],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Server id the delete/edit requests are scoped to
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Unsanitized content, used to prefill the edit prompt
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Display cells: id prefix, content, server, user, created
    pub fn cells(&self) -> &[String; 5] {
        &self.cells
    }

    pub fn edit_action(&self) -> RowAction {
        RowAction::Edit {
            id: self.id.clone(),
            server_id: self.scope.clone(),
        }
    }

    pub fn delete_action(&self) -> RowAction {
        RowAction::Delete {
            id: self.id.clone(),
            server_id: self.scope.clone(),
        }
    }
}

/// Memories tab state
pub struct MemoriesPanel {
    pub form: FilterForm,
    pub focus: MemoryField,
    pub table_state: TableState,
    pub status: StatusLine,
    rows: Vec<MemoryRow>,
    total: u64,
}

impl MemoriesPanel {
    pub fn new() -> Self {
        Self {
            form: FilterForm::new(),
            focus: MemoryField::Server,
            table_state: TableState::default(),
            status: StatusLine::default(),
            rows: Vec::new(),
            total: 0,
        }
    }

    pub fn rows(&self) -> &[MemoryRow] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Row with exactly this id
    pub fn find_row(&self, id: &str) -> Option<&MemoryRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn selected_row(&self) -> Option<&MemoryRow> {
        self.table_state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) => (i + 1).min(self.rows.len() - 1),
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let prev = self
            .table_state
            .selected()
            .map(|i| i.saturating_sub(1))
            .unwrap_or(0);
        self.table_state.select(Some(prev));
    }

    /// Validation failure: shown inline, nothing was sent
    pub(crate) fn reject(&mut self, error: &DashError) {
        self.status.error(error.to_string());
    }

    pub(crate) fn begin_load(&mut self) {
        self.status.clear();
    }

    /// Apply a list response; rows are always replaced wholesale
    pub(crate) fn apply_page(&mut self, server_id: &str, result: Result<MemoryPage>) {
        match result {
            Ok(page) => {
                debug!(
                    "Rendering {} of {} memories for server {}",
                    page.memories.len(),
                    page.total,
                    server_id
                );
                self.total = page.total;
                self.status.info(format!("Total: {}", page.total));
                self.rows = page
                    .memories
                    .iter()
                    .map(|memory| MemoryRow::new(memory, server_id))
                    .collect();
                let selected = self
                    .table_state
                    .selected()
                    .filter(|_| !self.rows.is_empty())
                    .map(|i| i.min(self.rows.len() - 1));
                self.table_state.select(selected);
            }
            Err(e) => {
                warn!("Memory query failed: {}", e);
                self.status.error(LOAD_FAILED);
            }
        }
    }
}

impl Default for MemoriesPanel {
    fn default() -> Self {
        Self::new()
    }
}
