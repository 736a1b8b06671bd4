//! FILENAME: core/view/src/html/mod.rs
//! The interactive markup view.
//!
//! - `builder`: chained markup writer and escaping helpers
//! - `snippets`: the individual table fragments
//! - `toolbar`: paging, clear and export links
//! - `view`: composes the fragments into one table

pub mod builder;
pub mod snippets;
pub mod toolbar;
pub mod view;

pub use builder::HtmlBuilder;
pub use snippets::HtmlSnippets;
pub use toolbar::{Toolbar, ToolbarItem};
pub use view::HtmlView;
