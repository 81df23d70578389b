//! Generic sortable/filterable/paginated projection over any row
//! collection.
//!
//! The engine owns only transient view state (sort key/direction, search
//! term, current page). Rows are supplied fresh on every projection, so
//! concurrent data changes can never tear a page: each `page()` call
//! filters, sorts, and clamps against the rows it was handed.

use std::cmp::Ordering;

/// A row's value for one column, as seen by sorting and filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => format!("{value}"),
            Self::Missing => String::new(),
        }
    }

    fn sort_text(&self) -> String {
        self.display().to_ascii_lowercase()
    }
}

/// Anything projectable as table rows.
pub trait TableRow {
    fn cell(&self, key: &str) -> CellValue;
}

/// Column descriptor; immutable per table instance. `format` optionally
/// overrides the default cell rendering.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub key: String,
    pub label: String,
    pub format: Option<fn(&CellValue) -> String>,
}

impl TableColumn {
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_owned(),
            label: label.to_owned(),
            format: None,
        }
    }

    #[must_use]
    pub fn with_format(key: &str, label: &str, format: fn(&CellValue) -> String) -> Self {
        Self {
            key: key.to_owned(),
            label: label.to_owned(),
            format: Some(format),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// One projected page.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a, R> {
    pub rows: Vec<&'a R>,
    pub total_filtered: usize,
    pub total_pages: usize,
    /// The clamped page index actually shown.
    pub page: usize,
}

/// Stateful table view. Page size is fixed per instance; `current_page`
/// is clamped into `[0, total_pages - 1]` on every projection.
#[derive(Debug, Clone)]
pub struct TableView {
    columns: Vec<TableColumn>,
    page_size: usize,
    sort_key: Option<String>,
    sort_direction: SortDirection,
    search_term: String,
    current_page: usize,
}

impl TableView {
    #[must_use]
    pub fn new(columns: Vec<TableColumn>, page_size: usize) -> Self {
        Self {
            columns,
            page_size: page_size.max(1),
            sort_key: None,
            sort_direction: SortDirection::Ascending,
            search_term: String::new(),
            current_page: 0,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    #[must_use]
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Changing the term always jumps back to the first page.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.trim().to_owned();
        self.current_page = 0;
    }

    /// Flip direction when `key` is already active, else select it
    /// ascending. The search term is left alone.
    pub fn toggle_sort(&mut self, key: &str) {
        if self.sort_key.as_deref() == Some(key) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = Some(key.to_owned());
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Out-of-range pages are tolerated and clamped at projection time.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Filter, sort, clamp, slice.
    pub fn page<'r, R: TableRow>(&mut self, rows: &'r [R]) -> TablePage<'r, R> {
        let needle = self.search_term.to_ascii_lowercase();
        let mut filtered = rows
            .iter()
            .filter(|row| row_matches(&self.columns, *row, &needle))
            .collect::<Vec<_>>();

        if let Some(key) = self.sort_key.clone() {
            let descending = self.sort_direction == SortDirection::Descending;
            filtered.sort_by(|a, b| {
                let ordering = compare_cells(&a.cell(&key), &b.cell(&key));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let total_filtered = filtered.len();
        let total_pages = total_filtered.div_ceil(self.page_size).max(1);
        self.current_page = self.current_page.min(total_pages - 1);

        let start = self.current_page * self.page_size;
        let rows = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        TablePage {
            rows,
            total_filtered,
            total_pages,
            page: self.current_page,
        }
    }
}

/// A row matches when any column's display form contains the needle,
/// case-insensitively. The empty needle matches everything.
fn row_matches<R: TableRow>(columns: &[TableColumn], row: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    columns.iter().any(|column| {
        row.cell(&column.key)
            .display()
            .to_ascii_lowercase()
            .contains(needle)
    })
}

/// Numbers compare numerically; everything else falls back to
/// case-insensitive text, with missing cells sorting as empty.
fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => a.sort_text().cmp(&b.sort_text()),
    }
}

/// Header, page rows, and footer as fixed-width text.
#[must_use]
pub fn render_table<R: TableRow>(view: &mut TableView, rows: &[R], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let page = view.page(rows);
    let columns = view.columns.clone();
    let cell_width = column_width(width, columns.len());

    let header = columns
        .iter()
        .map(|column| {
            let mut label = column.label.clone();
            if view.sort_key.as_deref() == Some(column.key.as_str()) {
                label.push(match view.sort_direction {
                    SortDirection::Ascending => '^',
                    SortDirection::Descending => 'v',
                });
            }
            pad(&label, cell_width)
        })
        .collect::<Vec<_>>()
        .join(" ");
    let mut lines = vec![fit_width(&header, width)];

    if page.total_filtered == 0 {
        lines.push(fit_width("(no rows)", width));
    }

    for row in &page.rows {
        let line = columns
            .iter()
            .map(|column| {
                let cell = row.cell(&column.key);
                let text = match column.format {
                    Some(format) => format(&cell),
                    None => cell.display(),
                };
                pad(&text, cell_width)
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(fit_width(&line, width));
    }

    lines.push(fit_width(
        &format!(
            "page {}/{} ({} rows)",
            page.page + 1,
            page.total_pages,
            page.total_filtered
        ),
        width,
    ));
    lines
}

fn column_width(width: usize, columns: usize) -> usize {
    if columns == 0 {
        return width;
    }
    (width.saturating_sub(columns.saturating_sub(1)) / columns).max(6)
}

fn pad(value: &str, width: usize) -> String {
    let mut out = value.chars().take(width).collect::<String>();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

fn fit_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_owned()
    } else {
        value.chars().take(width).collect()
    }
}
