//! Admin list core
//!
//! Loads collections with FIFO-sequenced requests and derives what an admin
//! list shows: sorted, searched, filtered and paginated rows, with selection,
//! column arrangement and batch deletion.

pub mod cache;
pub mod crud;
pub mod error;
pub mod loader;
pub mod model;
pub mod notify;
pub mod view;

pub use crud::ListController;
pub use error::Error;
pub use loader::DataLoader;
pub use view::ListView;
