//! Response table: projection of response records into display rows and columns

pub mod columns;
pub mod export;
pub mod page;
pub mod projector;
pub mod row;
pub mod selection;

pub use columns::{derive_columns, width_for, ColumnDescriptor};
pub use page::{PageState, RefreshOutcome, RefreshTicket, ResponseListPage};
pub use projector::{ProjectorConfig, ResponseProjector};
pub use row::{CellValue, Link, ProjectedRow};
pub use selection::QuestionSelection;
