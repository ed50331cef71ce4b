//! Downloading large, immutable resources to disk.
//!
//! - [`Fetcher`] is the HTTP-to-file seam; [`HttpFetcher`] is the real
//!   implementation and `MockFetcher` (behind the `mock` feature) serves
//!   canned bytes for tests.
//! - [`Checksum`] hashes files with MD5 for integrity checks.
//! - [`Downloader`] wraps a fetcher in a bounded, checksum-verified retry.
//! - [`Confirm`] asks the user before anything expensive happens.

mod checksum;
mod confirm;
mod download;
pub mod error;
mod fetcher;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use crate::checksum::Checksum;
pub use crate::confirm::{AssumeYes, Confirm, StdinConfirm};
pub use crate::download::Downloader;
pub use crate::fetcher::{Fetcher, HttpFetcher};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockFetcher;
