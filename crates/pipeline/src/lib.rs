pub mod context;
pub mod gate;

pub use context::CrawlContext;
pub use gate::{process_page, GateState};
