//! Helpers over JSON documents

pub mod json_path;
