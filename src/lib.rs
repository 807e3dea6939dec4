#![forbid(unsafe_code)]

//! Reader for AppleDouble sidecar files.
//!
//! macOS writes a `._name` file beside `name` on filesystems that cannot hold
//! Finder metadata natively (SMB and NFS shares, FAT volumes). The sidecar
//! holds a small header, a table of entry descriptors, and the entry bodies
//! they point at. This crate decodes a complete sidecar held in memory into a
//! [`Document`], with the Finder Info and File Info entries decoded and the
//! Finder Label color derived from the Finder flags.
//!
//! ```no_run
//! let bytes = std::fs::read("share/._IMG_0001.JPG").unwrap();
//! let document = appledouble::parse(&bytes).unwrap();
//! if let Some(color) = document.label_color() {
//!     println!("Label: {color}");
//! }
//! ```

pub mod cursor;
pub mod document;
pub mod entry;
pub mod error;
pub mod header;
pub mod raw;
pub mod sidecar;

pub use document::{Diagnostics, Document, Warning};
pub use entry::{Entry, EntryBody, EntryType, FileInfo};
pub use error::{CursorError, DecodeError, EntryError};
pub use finder_types::{ExtendedFinderInfo, FinderFlags, FinderInfo, FourCharCode, LabelColor};
pub use header::{EntryDescriptor, Header, MAGIC};

/// Decode a complete AppleDouble file. See [`Document::parse`].
pub fn parse(bytes: &[u8]) -> Result<Document, DecodeError> {
    Document::parse(bytes)
}
