// In crates/table/src/lib.rs

pub mod error;
pub mod filter;
pub mod pager;
pub mod view;

pub use error::{ParseFilterError, Result};
pub use filter::{OutcomeFilter, SideFilter, TradeFilter, filter};
pub use pager::{PAGE_SIZE, Page, clamp_page, page_label, paginate, total_pages};
pub use view::{PageView, TablePage};
