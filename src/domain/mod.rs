//! Domain layer: products, badge flags, the wire format and errors.
//!
//! Nothing in here performs I/O. The decoder is a pure function from
//! [`WireProduct`] to [`Product`].
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`flags`]: Badge flag enum and bitset
//! - [`freshness`]: Timestamp parsing and "time ago" strings
//! - [`product`]: Product model and decoder
//! - [`wire`]: Compact server record format
//!
//! # Examples
//!
//! ```
//! use ratelist::domain::{decode_all, WireProduct};
//! use serde_json::json;
//!
//! let records = vec![WireProduct::from_value(json!({ "n": "Dupatta", "g": 450 }))];
//! let products = decode_all(&records);
//! assert_eq!(products[0].final_rate, Some(450.0));
//! ```

pub mod error;
pub mod flags;
pub mod freshness;
pub mod product;
pub mod wire;

pub use error::{RateListError, Result};
pub use flags::{BadgeFlag, BadgeFlags};
pub use product::{decode, decode_all, negative_stock_names, Product};
pub use wire::{WireFlags, WireProduct};
