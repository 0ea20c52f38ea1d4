//! Storage layer: a key-value blob store standing in for browser local
//! storage, and the project store built on top of it.

mod blob;
mod error;
mod projects;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore, keys, load_json, save_json};
pub use error::StoreError;
pub use projects::ProjectStore;
