pub mod category;
pub mod drill;
pub mod log_record;

pub use category::Category;
pub use drill::{Drill, DrillInput};
pub use log_record::{LogInput, LogRecord};
