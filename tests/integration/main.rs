//! Integration tests for the aggregation pipeline.

mod aggregate;
mod mock_source;
