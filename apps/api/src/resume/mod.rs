//! Resume ingestion: upload gate, text extraction and storage.

pub mod extract;
pub mod mime;
pub mod storage;
