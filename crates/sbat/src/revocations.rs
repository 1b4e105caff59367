//! SBAT revocation list.
//!
//! The platform publishes this payload in a UEFI variable such as
//! `SbatLevel`. Each record names a component and the lowest generation
//! of it that is still allowed to boot.

use ascii::AsciiStr;

use crate::csv::{Record, parse_csv};
use crate::metadata::{Entry, Metadata};
use crate::vec::Veclike;
use crate::{Component, Error, Result};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use arrayvec::ArrayVec;

/// The first record carries an optional date after the name and
/// generation.
const MAX_HEADER_FIELDS: usize = 3;

/// Outcome of checking image metadata against a revocation list.
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationResult<'r, 'a> {
    /// No metadata entry is revoked.
    Allowed,

    /// At least one entry is revoked. Holds the first one found; later
    /// entries may be revoked as well.
    Revoked(&'r Entry<'a>),
}

/// Parsed SBAT revocation list.
///
/// Storage is injected by the caller, same as for [`Metadata`]. See the
/// [crate] documentation for a usage example.
#[derive(Debug, Eq, PartialEq)]
pub struct Revocations<'a, Storage>
where
    Storage: Veclike<Component<'a>>,
{
    date: Option<&'a AsciiStr>,
    components: Storage,
}

/// [`Revocations`] backed by a fixed-capacity array.
pub type ArrayRevocations<'a, const N: usize> = Revocations<'a, ArrayVec<Component<'a>, N>>;

/// [`Revocations`] backed by a `Vec`.
#[cfg(feature = "alloc")]
pub type VecRevocations<'a> = Revocations<'a, Vec<Component<'a>>>;

impl<'a, Storage> Revocations<'a, Storage>
where
    Storage: Veclike<Component<'a>>,
{
    /// Create a `Revocations` using `components` for storage. Existing
    /// data in `components` is not cleared; the date starts out `None`.
    #[must_use]
    pub fn new(components: Storage) -> Self {
        Self {
            date: None,
            components,
        }
    }

    /// Parse a revocation list from the raw contents of a UEFI variable.
    ///
    /// Any previously held components are cleared first. Each record
    /// needs a component name and generation; the date field of the
    /// first record is captured if present.
    pub fn parse(&mut self, input: &'a [u8]) -> Result<()> {
        self.components.clear();
        self.date = None;

        let mut first = true;

        parse_csv(input, |record: Record<'a, MAX_HEADER_FIELDS>| {
            if first {
                self.date = record.get_field(2);
                first = false;
            }

            self.components.try_push(Component::new(
                record.get_field(0).ok_or(Error::TooFewFields)?,
                record
                    .get_field_as_generation(1)?
                    .ok_or(Error::TooFewFields)?,
            ))
        })
    }

    /// Date the list was last updated, taken from the first record.
    #[must_use]
    pub fn date(&self) -> Option<&'a AsciiStr> {
        self.date
    }

    /// Check whether `input` is revoked.
    ///
    /// A component is revoked if the list holds an entry with the same
    /// name and a strictly greater generation. Components the list does
    /// not name are implicitly allowed.
    #[must_use]
    pub fn is_component_revoked(&self, input: &Component) -> bool {
        self.components.as_slice().iter().any(|revoked| {
            input.name() == revoked.name() && input.generation() < revoked.generation()
        })
    }

    /// Check every entry of `metadata` with
    /// [`is_component_revoked`](Self::is_component_revoked). An image
    /// must only be loaded if the result is
    /// [`Allowed`](ValidationResult::Allowed).
    pub fn validate_metadata<'r, 'b, MetadataStorage>(
        &self,
        metadata: &'r Metadata<'b, MetadataStorage>,
    ) -> ValidationResult<'r, 'b>
    where
        MetadataStorage: Veclike<Entry<'b>>,
    {
        if let Some(revoked_entry) = metadata
            .entries()
            .iter()
            .find(|entry| self.is_component_revoked(&entry.component))
        {
            ValidationResult::Revoked(revoked_entry)
        } else {
            ValidationResult::Allowed
        }
    }

    /// The revocation entries. Each generation is the lowest still
    /// allowed for that name; everything below it is revoked.
    #[must_use]
    pub fn revoked_components(&self) -> &[Component<'a>] {
        self.components.as_slice()
    }
}
