//! Reusable widgets

pub mod form_field;
pub mod response_table;
pub mod status_display;

pub use form_field::{FormField, FormFieldType};
pub use response_table::ResponseTableView;
pub use status_display::StatusDisplay;
