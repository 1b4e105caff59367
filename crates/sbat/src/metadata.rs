//! Image SBAT metadata.
//!
//! This payload lives in the `.sbat` section of a signed PE executable
//! and declares, per component the image contains, the generation it was
//! built at plus vendor provenance.

use core::marker::PhantomData;

use ascii::AsciiStr;

use crate::csv::{Record, parse_csv};
use crate::vec::Veclike;
use crate::{Component, Error, Result};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use arrayvec::ArrayVec;

/// A record has the two component fields plus up to four vendor fields.
const MAX_METADATA_FIELDS: usize = 6;

/// Vendor provenance fields of a metadata entry. All optional; they
/// document where the component came from and play no part in
/// revocation checks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Vendor<'a> {
    pub name: Option<&'a AsciiStr>,
    pub package_name: Option<&'a AsciiStr>,
    pub version: Option<&'a AsciiStr>,
    pub url: Option<&'a AsciiStr>,
}

/// One record of image metadata.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Entry<'a> {
    pub component: Component<'a>,
    pub vendor: Vendor<'a>,
}

impl<'a> Entry<'a> {
    #[must_use]
    pub fn new(component: Component<'a>, vendor: Vendor<'a>) -> Self {
        Self { component, vendor }
    }
}

/// Parsed image SBAT metadata.
///
/// Storage is injected by the caller, so the same code serves a
/// bootloader with a stack-allocated [`ArrayVec`] and a hosted tool with
/// a `Vec`. See the [crate] documentation for a usage example.
#[derive(Debug, Eq, PartialEq)]
pub struct Metadata<'a, Storage>
where
    Storage: Veclike<Entry<'a>>,
{
    entries: Storage,
    _lifetime: PhantomData<&'a ()>,
}

/// [`Metadata`] backed by a fixed-capacity array.
pub type ArrayMetadata<'a, const N: usize> = Metadata<'a, ArrayVec<Entry<'a>, N>>;

/// [`Metadata`] backed by a `Vec`.
#[cfg(feature = "alloc")]
pub type VecMetadata<'a> = Metadata<'a, Vec<Entry<'a>>>;

impl<'a, Storage> Metadata<'a, Storage>
where
    Storage: Veclike<Entry<'a>>,
{
    /// Create a `Metadata` using `entries` for storage. Existing data in
    /// `entries` is not cleared.
    #[must_use]
    pub fn new(entries: Storage) -> Self {
        Self {
            entries,
            _lifetime: PhantomData,
        }
    }

    /// Parse image metadata from the raw contents of a `.sbat` section.
    ///
    /// Any previously held entries are cleared first. Each record needs
    /// at least a component name and generation; the four vendor fields
    /// are optional.
    pub fn parse(&mut self, input: &'a [u8]) -> Result<()> {
        self.entries.clear();

        parse_csv(input, |record: Record<'a, MAX_METADATA_FIELDS>| {
            self.entries.try_push(Entry {
                component: Component::new(
                    record.get_field(0).ok_or(Error::TooFewFields)?,
                    record
                        .get_field_as_generation(1)?
                        .ok_or(Error::TooFewFields)?,
                ),
                vendor: Vendor {
                    name: record.get_field(2),
                    package_name: record.get_field(3),
                    version: record.get_field(4),
                    url: record.get_field(5),
                },
            })
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry<'a>] {
        self.entries.as_slice()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Vendor<'_> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct as _;

        let mut s = serializer.serialize_struct("Vendor", 4)?;
        s.serialize_field("name", &self.name.map(AsciiStr::as_str))?;
        s.serialize_field("package_name", &self.package_name.map(AsciiStr::as_str))?;
        s.serialize_field("version", &self.version.map(AsciiStr::as_str))?;
        s.serialize_field("url", &self.url.map(AsciiStr::as_str))?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Entry<'_> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct as _;

        let mut s = serializer.serialize_struct("Entry", 2)?;
        s.serialize_field("component", &self.component)?;
        s.serialize_field("vendor", &self.vendor)?;
        s.end()
    }
}
