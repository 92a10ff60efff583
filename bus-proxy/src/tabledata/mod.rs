//! TableData result payloads: decoding and normalization.
//!
//! Key characteristics of the service's datasets:
//! - The payload is an XML `<DS>` of `<D>` rows, sometimes escaped twice
//! - Field names differ between the online and offline operations
//! - Line numbers come in several encodings (`527`, `010527`, `10527`)
//! - Times are locale text like `3.9.15 0:17`

mod decode;
mod fields;
mod normalize;
mod types;

pub use decode::{decode, unescape_entities};
pub use normalize::{RowRejected, normalize, normalize_row};
pub use types::{Dataset, RawRow};

