pub mod board;
pub mod session;
pub mod view;

pub use board::ReviewBoard;
pub use session::{CellData, ConfirmedGroup, ConfirmedTarget, ReviewSession};
pub use view::{FilteredRows, GridRect, ViewRow};
