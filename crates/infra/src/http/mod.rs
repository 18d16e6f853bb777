//! Blocking HTTP session shared by every platform call

pub mod session;

pub use session::{header_map, HttpSession, HttpSessionBuilder};
