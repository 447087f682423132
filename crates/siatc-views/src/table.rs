//! # Table Renderer
//!
//! A paged, searchable, sortable grid over the records of one entity.
//!
//! ## Derivation
//!
//! ```text
//! data ──search──▶ filtered ──sort──▶ ordered ──page──▶ visible rows
//! ```
//!
//! `ordered` is recomputed whenever the data, the query, or the sort state
//! changes. Paging only moves a window over it.
//!
//! - Search matches every field value of a record, not just the displayed
//!   columns. Changing the query returns to page 1.
//! - Sort is single-column and stable. Selecting the active column flips
//!   its direction; selecting another column sorts it ascending.
//! - Pages are 1-based. There is always at least one page, and moving past
//!   either end leaves the page unchanged.

use serde_json::Value;
use siatc_core::{
    compare_values, display_string, ActionDef, EntityDefinition, FieldType, Record, TableConfig,
    ViewDefinition, ViewType,
};

use crate::error::{ensure_view, ViewError};
use crate::event::ViewEvent;
use crate::search::filter_indices;

/// Localized token for a true boolean cell.
pub const TRUE_TOKEN: &str = "Sí";
/// Localized token for a false or empty boolean cell.
pub const FALSE_TOKEN: &str = "No";

/// Sort direction of the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// The active sort column and its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// A displayed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    /// Field label, or the raw key when the entity has no such field.
    pub label: String,
}

/// One visible row: the underlying record and its formatted cells, in
/// column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub item: &'a Record,
    pub cells: Vec<String>,
}

/// View-model of a table view.
#[derive(Debug, Clone)]
pub struct TableView {
    view: ViewDefinition,
    entity: EntityDefinition,
    config: TableConfig,
    data: Vec<Record>,
    query: String,
    sort: Option<SortState>,
    page: usize,
    /// Indices into `data`: filtered, then sorted.
    ordered: Vec<usize>,
}

impl TableView {
    /// Build a table over `data`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::WrongViewType` if `view` is not a table view and
    /// `ViewError::EntityMismatch` if it presents another entity.
    pub fn new(
        view: ViewDefinition,
        entity: EntityDefinition,
        data: Vec<Record>,
    ) -> Result<Self, ViewError> {
        ensure_view(&view, &entity, ViewType::Table)?;
        let Some(config) = view.as_table().cloned() else {
            return Err(ViewError::WrongViewType {
                view_id: view.id.clone(),
                expected: ViewType::Table,
                found: view.view_type(),
            });
        };
        let mut table = Self {
            view,
            entity,
            config,
            data,
            query: String::new(),
            sort: None,
            page: 1,
            ordered: Vec::new(),
        };
        table.rederive();
        Ok(table)
    }

    pub fn view(&self) -> &ViewDefinition {
        &self.view
    }

    pub fn entity(&self) -> &EntityDefinition {
        &self.entity
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size.max(1)
    }

    /// Number of records matching the current query.
    pub fn filtered_len(&self) -> usize {
        self.ordered.len()
    }

    /// `max(1, ceil(filtered / page_size))`.
    pub fn total_pages(&self) -> usize {
        self.ordered.len().div_ceil(self.page_size()).max(1)
    }

    /// Replace the search query and return to the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
        self.rederive();
    }

    /// Sort by `column`: flip the direction if it is already active,
    /// otherwise make it active ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = Some(match self.sort.take() {
            Some(active) if active.column == column => SortState {
                column: active.column,
                direction: active.direction.toggled(),
            },
            _ => SortState {
                column: column.to_string(),
                direction: SortDirection::Ascending,
            },
        });
        self.rederive();
    }

    /// Advance one page. Returns `false` when already on the last page.
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    /// Go back one page. Returns `false` when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    /// Jump to page `page`. Out-of-range pages are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.page = page;
            true
        } else {
            false
        }
    }

    /// Replace the data set, keeping the query, sort, and page where
    /// possible. The page is clamped into the new range.
    pub fn set_data(&mut self, data: Vec<Record>) {
        self.data = data;
        self.rederive();
        self.page = self.page.clamp(1, self.total_pages());
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Records of the current page, in display order.
    pub fn page_records(&self) -> Vec<&Record> {
        let start = (self.page - 1) * self.page_size();
        self.ordered
            .iter()
            .skip(start)
            .take(self.page_size())
            .map(|&i| &self.data[i])
            .collect()
    }

    /// Displayed columns, in configured order.
    pub fn columns(&self) -> Vec<Column> {
        self.config
            .columns
            .iter()
            .map(|key| Column {
                key: key.clone(),
                label: self.entity.label_for(key).to_string(),
            })
            .collect()
    }

    /// Text of one cell.
    ///
    /// Boolean fields render as [`TRUE_TOKEN`] / [`FALSE_TOKEN`]; every
    /// other value uses its display string.
    pub fn format_value(&self, key: &str, record: &Record) -> String {
        let value = record.get(key);
        let is_boolean = self
            .entity
            .field(key)
            .is_some_and(|f| f.field_type == FieldType::Boolean);
        if is_boolean {
            return match value {
                Some(Value::Bool(true)) => TRUE_TOKEN.to_string(),
                None | Some(Value::Null) | Some(Value::Bool(false)) => FALSE_TOKEN.to_string(),
                Some(other) => display_string(other),
            };
        }
        value.map(display_string).unwrap_or_default()
    }

    /// Formatted rows of the current page.
    pub fn rows(&self) -> Vec<Row<'_>> {
        self.page_records()
            .into_iter()
            .map(|item| Row {
                item,
                cells: self
                    .config
                    .columns
                    .iter()
                    .map(|key| self.format_value(key, item))
                    .collect(),
            })
            .collect()
    }

    /// Actions rendered once, above the grid.
    pub fn toolbar_actions(&self) -> Vec<&ActionDef> {
        self.view.actions.iter().filter(|a| a.is_toolbar()).collect()
    }

    /// Actions rendered on every row.
    pub fn row_actions(&self) -> Vec<&ActionDef> {
        self.view.actions.iter().filter(|a| !a.is_toolbar()).collect()
    }

    /// Emit the event for action `action_id`, optionally bound to a row.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::UnknownAction` if the view has no such action.
    pub fn trigger(&self, action_id: &str, item: Option<&Record>) -> Result<ViewEvent, ViewError> {
        let action = self
            .view
            .action(action_id)
            .ok_or_else(|| ViewError::UnknownAction {
                view_id: self.view.id.clone(),
                action_id: action_id.to_string(),
            })?;
        Ok(ViewEvent::Action {
            action: action.clone(),
            item: item.cloned(),
        })
    }

    fn rederive(&mut self) {
        let mut ordered = filter_indices(&self.data, &self.query);
        if let Some(sort) = &self.sort {
            let data = &self.data;
            let key = sort.column.as_str();
            ordered.sort_by(|&a, &b| {
                let ord = compare_values(data[a].get(key), data[b].get(key));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        self.ordered = ordered;
    }
}
