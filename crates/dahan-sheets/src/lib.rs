//! Published spreadsheet tabs as a [`MasterDataSource`].
//!
//! Each dimension is configured with the URL of one sheet tab. A tab link
//! copied from the browser (`.../edit?gid=N`) is rewritten into its CSV
//! export form before fetching.
//!
//! [`MasterDataSource`]: dahan_core::source::MasterDataSource

pub mod error;
mod source;
mod urls;

pub use error::{Error, Result};
pub use source::SheetSource;
pub use urls::{SourceUrls, export_url, is_placeholder};
