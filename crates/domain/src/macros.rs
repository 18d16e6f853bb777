//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Request methods, patch operations and similar enums travel as fixed
//! strings. The macro keeps their string form and parsing in one place.
//!
//! # Example
//!
//! ```rust
//! use aep_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum RunState {
//!     Active,
//!     Disabled,
//! }
//!
//! impl_wire_name_conversions!(RunState {
//!     Active => "active",
//!     Disabled => "disabled",
//! });
//!
//! assert_eq!(RunState::Active.to_string(), "active");
//! assert_eq!("DISABLED".parse::<RunState>().unwrap(), RunState::Disabled);
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// - Display writes the wire name exactly as declared
/// - FromStr matches the wire name case-insensitively
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
