pub mod aggregator;
pub mod source;

pub use aggregator::aggregate;
pub use source::{UsageSource, UsageWindow};
