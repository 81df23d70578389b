//! sightline-view: derived visual structures over trace events.
//!
//! Every module here is a pure view model: builders turn a flat event
//! collection into a renderable structure (`build_*`/`layout_*`),
//! stateful views own only transient UI state (sort, search, page,
//! collapse sets), and `render_*` functions project to plain text lines
//! for whatever presentation surface embeds this crate. Nothing in this
//! crate performs I/O; data arrives through `sightline_core`'s
//! `EventSource` and change signals are coordinated by
//! [`live_update::LiveUpdateHub`].

pub mod event_table;
pub mod json_tree;
pub mod live_update;
pub mod preview;
pub mod session_detail;
pub mod span_tree;
pub mod stats_view;
pub mod table;
pub mod timeline;

/// Crate identity label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "sightline-view"
}
