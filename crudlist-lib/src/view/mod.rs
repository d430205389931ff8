//! List view: sorting, search, filters, pagination, selection and columns

mod column;
mod engine;
mod filter;
mod options;
mod page;
mod prefs;
mod search;
mod selection;
mod sort;
mod state;

pub use column::*;
pub use engine::*;
pub use filter::*;
pub use options::*;
pub use page::*;
pub use prefs::*;
pub use search::*;
pub use selection::*;
pub use sort::*;
pub use state::*;
