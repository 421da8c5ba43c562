//! Panel catalog stored as a tab-separated summary

pub mod panel_list;

pub use panel_list::{
    HEADERS, PANEL_LIST_FILE, PANEL_PAGE_PREFIX, PanelListRow, collect_rows, read_panel_list,
    write_panel_list,
};
