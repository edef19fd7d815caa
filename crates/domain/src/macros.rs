//! Macro for implementing Display and FromStr for wire-named enums
//!
//! Sort directions, fetch states, button actions and notification actions
//! all travel as short lowercase strings. This macro gives them one
//! `Display`/`FromStr` pair with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use evdash_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ConnectorStatus {
//!     Available,
//!     Charging,
//!     Faulted,
//! }
//!
//! impl_domain_status_conversions!(ConnectorStatus {
//!     Available => "available",
//!     Charging => "charging",
//!     Faulted => "faulted",
//! });
//! ```

/// Implements Display and FromStr traits for wire-named enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $str,)+
                })
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!(
                        "Invalid {}: {}",
                        ::std::stringify!($enum_name),
                        s
                    )),
                }
            }
        }
    };
}
