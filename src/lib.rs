//! # keyed-sets
//!
//! Immutable, insertion-ordered key/value collections with a fluent
//! transformation API.
//!
//! ## Overview
//!
//! The crate provides two value types wrapping an ordered mapping from
//! [`Key`]s (integers or strings) to values:
//!
//! - [`Collection`]: a small API of `map`, `filter`, `sort`, `slice` and
//!   `flatten` plus basic accessors.
//! - [`DataSet`]: a superset adding appending, membership, `min`/`max`,
//!   `join`, deduplication, `reverse`, column extraction, `reduce`,
//!   `some`/`every` and JSON encoding.
//!
//! Instances are snapshots. Every transformation allocates a new instance
//! and leaves its receiver unchanged, so instances can be shared freely
//! (including across threads when `T` allows it).
//!
//! ## Example
//!
//! ```rust
//! use keyed_sets::prelude::*;
//!
//! let words = Collection::from_string("a,b,a,c", ",").unwrap();
//! let sorted = words.sort();
//! assert_eq!(sorted.first().map(String::as_str), Some("a"));
//!
//! let data = DataSet::from_values(words.values().cloned()).deduplicate();
//! assert_eq!(data.join("-"), "a-b-c");
//! assert_eq!(data.to_json().unwrap(), r#"{"0":"a","1":"b","3":"c"}"#);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use keyed_sets::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Collection, CollectionError, DataSet, DedupMode, JsonFlags, Key, Nested, Record, Scalar, Truthy,
    };
}

mod coerce;
mod collection;
mod dataset;
mod entries;
mod error;
mod iter;
mod json;
mod key;
mod nested;

pub use coerce::{Scalar, Truthy};
pub use collection::Collection;
pub use dataset::{DataSet, DedupMode};
pub use error::CollectionError;
pub use iter::{IntoIter, Iter};
pub use json::{DEFAULT_DEPTH, JsonFlags};
pub use key::Key;
pub use nested::{Nested, Record};
