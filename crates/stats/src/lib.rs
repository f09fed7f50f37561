pub mod aggregator;
pub mod dedup;
pub mod stopwords;

pub use aggregator::StatsAggregator;
pub use dedup::{DedupVerdict, DuplicateDetector, PageChecksum};
pub use stopwords::Stopwords;
