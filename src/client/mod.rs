//! Xray API client and the core request/paging/polling helpers

pub mod ignore_rules;
pub mod inventory;
pub mod lookup;
pub mod pagination;
pub mod scan_wait;
pub mod xray;

pub use ignore_rules::{build_create_payload, ListRulesParams};
pub use pagination::{fetch_all_offset, fetch_all_pages};
pub use scan_wait::wait_for_terminal;
pub use xray::XrayClient;
