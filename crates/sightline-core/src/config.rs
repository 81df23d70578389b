//! Viewer configuration.
//!
//! Nested section structs with full defaults, minimum enforcement via
//! `normalized()`, explicit validation, and `SIGHTLINE_*` environment
//! overrides. There is no config file; the embedding application passes a
//! `ViewConfig` (or relies on the defaults) when constructing views.

/// Root configuration for the view engines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewConfig {
    pub table: TableConfig,
    pub timeline: TimelineConfig,
    pub preview: PreviewConfig,
    pub json_tree: JsonTreeConfig,
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Rows per page; fixed per table instance.
    pub page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { page_size: 25 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineConfig {
    /// Evenly spaced scale intervals (markers = intervals + 1).
    pub scale_intervals: usize,
    /// Floor for bar widths so zero-duration events stay visible.
    pub min_visible_fraction: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            scale_intervals: 6,
            min_visible_fraction: 0.005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Maximum preview length in characters, ellipsis included.
    pub max_chars: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { max_chars: 120 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonTreeConfig {
    /// String leaves longer than this are truncated for display.
    pub string_truncate_chars: usize,
}

impl Default for JsonTreeConfig {
    fn default() -> Self {
        Self {
            string_truncate_chars: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Debounce window for event-list views.
    pub list_debounce_ms: u64,
    /// Debounce window for aggregate-stat views; longer, the dashboard
    /// tolerates more staleness.
    pub stats_debounce_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            list_debounce_ms: 250,
            stats_debounce_ms: 1_000,
        }
    }
}

impl ViewConfig {
    /// Copy with every out-of-range value pulled back to a usable one.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut config = self.clone();
        if config.table.page_size == 0 {
            config.table.page_size = TableConfig::default().page_size;
        }
        if config.timeline.scale_intervals == 0 {
            config.timeline.scale_intervals = TimelineConfig::default().scale_intervals;
        }
        if !(config.timeline.min_visible_fraction > 0.0)
            || config.timeline.min_visible_fraction >= 1.0
        {
            config.timeline.min_visible_fraction = TimelineConfig::default().min_visible_fraction;
        }
        if config.preview.max_chars < 2 {
            config.preview.max_chars = PreviewConfig::default().max_chars;
        }
        if config.json_tree.string_truncate_chars < 2 {
            config.json_tree.string_truncate_chars = JsonTreeConfig::default().string_truncate_chars;
        }
        if config.refresh.list_debounce_ms == 0 {
            config.refresh.list_debounce_ms = RefreshConfig::default().list_debounce_ms;
        }
        if config.refresh.stats_debounce_ms == 0 {
            config.refresh.stats_debounce_ms = RefreshConfig::default().stats_debounce_ms;
        }
        config
    }

    /// Strict validation for configs supplied by an embedding caller.
    pub fn validate(&self) -> Result<(), String> {
        if self.table.page_size == 0 {
            return Err("table.page_size must be at least 1".to_owned());
        }
        if self.timeline.scale_intervals == 0 {
            return Err("timeline.scale_intervals must be at least 1".to_owned());
        }
        if !(self.timeline.min_visible_fraction > 0.0 && self.timeline.min_visible_fraction < 1.0) {
            return Err("timeline.min_visible_fraction must be in (0, 1)".to_owned());
        }
        if self.preview.max_chars < 2 {
            return Err("preview.max_chars must be at least 2".to_owned());
        }
        if self.json_tree.string_truncate_chars < 2 {
            return Err("json_tree.string_truncate_chars must be at least 2".to_owned());
        }
        if self.refresh.list_debounce_ms == 0 || self.refresh.stats_debounce_ms == 0 {
            return Err("refresh debounce windows must be at least 1ms".to_owned());
        }
        Ok(())
    }

    /// Apply `SIGHTLINE_*` overrides from the process environment.
    #[must_use]
    pub fn overridden_from_env(&self) -> Self {
        self.overridden(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::overridden_from_env`] but with an injectable
    /// lookup. Unparseable values leave the existing setting in place.
    #[must_use]
    pub fn overridden(&self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = self.clone();
        if let Some(value) = parse_var(&lookup, "SIGHTLINE_TABLE_PAGE_SIZE") {
            config.table.page_size = value;
        }
        if let Some(value) = parse_var(&lookup, "SIGHTLINE_TIMELINE_SCALE_INTERVALS") {
            config.timeline.scale_intervals = value;
        }
        if let Some(value) = parse_var(&lookup, "SIGHTLINE_PREVIEW_MAX_CHARS") {
            config.preview.max_chars = value;
        }
        if let Some(value) = parse_var(&lookup, "SIGHTLINE_JSON_STRING_TRUNCATE") {
            config.json_tree.string_truncate_chars = value;
        }
        if let Some(value) = parse_var(&lookup, "SIGHTLINE_LIST_DEBOUNCE_MS") {
            config.refresh.list_debounce_ms = value;
        }
        if let Some(value) = parse_var(&lookup, "SIGHTLINE_STATS_DEBOUNCE_MS") {
            config.refresh.stats_debounce_ms = value;
        }
        config
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    lookup(key)?.trim().parse().ok()
}
