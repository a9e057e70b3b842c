//! Road route CLI library.
//!
//! Terminal styling and output formatting shared by the `roadroute` binary.

pub mod output;
pub mod terminal;
