pub mod report_handlers;
pub mod system_handlers;

pub use report_handlers::*;
pub use system_handlers::*;
