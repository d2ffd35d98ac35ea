//! On-disk storage: the content-addressed raw blob store and the
//! zone layout of the destination tree.

pub mod content;
pub mod layout;

pub use content::{sha256_hex, shard_prefix, BlobRecord, ContentStore};
pub use layout::ZoneLayout;
