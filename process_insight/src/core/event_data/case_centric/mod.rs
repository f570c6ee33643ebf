//! Case-centric Event Data
//!
//! Events grouped by case and ordered by timestamp, see [`EventTable`].
pub mod csv_import;
pub(crate) mod event_table;
pub mod io;
pub mod json_import;
pub mod source;

#[doc(inline)]
pub use event_table::*;
#[doc(inline)]
pub use io::EventTableError;
