pub mod ingest;
pub mod records;
pub mod search;
pub mod transfer;
pub mod tree;
