pub mod chunker;
pub mod models;
pub mod read_request;
pub mod settings;
