//! Parser for UEFI Secure Boot Advanced Targeting (SBAT) data.
//!
//! SBAT revokes signed boot components by generation number instead of
//! by hash. A signed image carries [`Metadata`] in its `.sbat` PE
//! section: one record per component, each naming the generation the
//! component was built at. The platform keeps [`Revocations`] in a UEFI
//! variable such as `SbatLevel`: per component name, the lowest
//! generation still allowed to boot. An image passes when none of its
//! components fall below the revocation cutoff.
//!
//! Both payloads are a restricted ASCII CSV. Parsing borrows from the
//! input and stores records through [`Veclike`], so it runs without an
//! allocator. The `alloc` feature adds `Vec` storage and the `serde`
//! feature adds serialization for the parsed types.
//!
//! ```
//! use arrayvec::ArrayVec;
//! use sbat::{ArrayMetadata, ArrayRevocations, ValidationResult};
//!
//! # fn main() -> Result<(), sbat::Error> {
//! let mut metadata = ArrayMetadata::<2>::new(ArrayVec::new());
//! metadata.parse(b"shim,4\ngrub,3\n")?;
//!
//! let mut revocations = ArrayRevocations::<4>::new(ArrayVec::new());
//! revocations.parse(b"sbat,1,2023012900\nshim,2\ngrub,3\n")?;
//!
//! assert_eq!(
//!     revocations.validate_metadata(&metadata),
//!     ValidationResult::Allowed
//! );
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::expect_used,
    clippy::unwrap_used,
    future_incompatible,
    missing_debug_implementations,
    nonstandard_style,
    unreachable_pub,
    missing_copy_implementations,
    unused_qualifications
)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod component;
mod csv;
mod generation;
mod metadata;
mod result;
mod revocations;
mod vec;

pub use component::Component;
pub use csv::ALLOWED_SPECIAL_CHARS;
pub use generation::Generation;
#[cfg(feature = "alloc")]
pub use metadata::VecMetadata;
pub use metadata::{ArrayMetadata, Entry, Metadata, Vendor};
pub use result::{Error, Result};
#[cfg(feature = "alloc")]
pub use revocations::VecRevocations;
pub use revocations::{ArrayRevocations, Revocations, ValidationResult};
pub use vec::Veclike;
