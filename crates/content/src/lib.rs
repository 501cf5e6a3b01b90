//! File content manager for varinterop values
//!
//! A [`FileValue`](varinterop_value::FileValue) is only an identity (the
//! SHA-256 of its bytes) plus a MIME type. [`ContentStore`] owns the bytes: it
//! persists them to a private temp directory, resolves identities back to
//! content with coalesced async reads, and deletes backing files on
//! [`release`](ContentStore::release), [`sweep`](ContentStore::sweep) or drop.
//!
//! ```rust
//! use varinterop_content::{ContentStore, ContentStoreConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> varinterop_content::Result<()> {
//! let store = ContentStore::new(ContentStoreConfig::default())?;
//! let file = store.store(&b"{\"a\":1}"[..], "application/json").await?;
//! assert!(file.is_text_based());
//! assert_eq!(&store.materialize(&file).await?[..], b"{\"a\":1}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod store;

pub use config::ContentStoreConfig;
pub use error::{ContentError, Result};
pub use identity::content_id;
pub use store::{ContentStats, ContentStore};
