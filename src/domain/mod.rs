// Domain layer - Pure data types and aggregation rules
pub mod equipment;
pub mod projection;
pub mod report;
pub mod summary;
