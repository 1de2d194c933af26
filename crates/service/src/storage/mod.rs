//! Storage backends for the announcement collection.

pub mod json_file_store;

pub use json_file_store::JsonFileStore;
