//! Restricted CSV dialect shared by both SBAT payloads.
//!
//! Records are separated by `\n`, fields by `,`. There is no quoting and
//! no escaping; the field alphabet is limited so that a separator can
//! never occur inside a field. Blank records are skipped, which also
//! covers a trailing newline.

use arrayvec::ArrayVec;
use ascii::{AsciiChar, AsciiStr};

use crate::{Error, Generation, Result};

/// Characters allowed in a field in addition to ASCII alphanumerics.
///
/// The set covers everything shipped distro payloads use (vendor names
/// with spaces, package versions, URLs with query strings) while leaving
/// quote, backslash, comma, and every control character unrepresentable.
pub const ALLOWED_SPECIAL_CHARS: &[AsciiChar] = &[
    AsciiChar::Space,
    AsciiChar::Dot,
    AsciiChar::Minus,
    AsciiChar::UnderScore,
    AsciiChar::Tilde,
    AsciiChar::Colon,
    AsciiChar::Slash,
    AsciiChar::Question,
    AsciiChar::Equal,
    AsciiChar::Ampersand,
    AsciiChar::Plus,
    AsciiChar::At,
    AsciiChar::Hash,
    AsciiChar::Percent,
    AsciiChar::ParenOpen,
    AsciiChar::ParenClose,
];

fn validate_field(field: &AsciiStr) -> Result<()> {
    for ch in field.chars() {
        if !ch.is_alphanumeric() && !ALLOWED_SPECIAL_CHARS.contains(&ch) {
            return Err(Error::SpecialChar(ch));
        }
    }
    Ok(())
}

/// One parsed record. Fields past `MAX_FIELDS` are validated but not
/// stored; SBAT revisions may append fields and old parsers are expected
/// to ignore them.
pub(crate) struct Record<'a, const MAX_FIELDS: usize> {
    fields: ArrayVec<&'a AsciiStr, MAX_FIELDS>,
}

impl<'a, const MAX_FIELDS: usize> Record<'a, MAX_FIELDS> {
    fn from_line(line: &'a AsciiStr) -> Result<Self> {
        let mut fields = ArrayVec::new();
        for field in line.split(AsciiChar::Comma) {
            validate_field(field)?;
            // Fields past MAX_FIELDS are dropped, not an error.
            let _ = fields.try_push(field);
        }
        Ok(Self { fields })
    }

    pub(crate) fn get_field(&self, index: usize) -> Option<&'a AsciiStr> {
        self.fields.get(index).copied()
    }

    pub(crate) fn get_field_as_generation(&self, index: usize) -> Result<Option<Generation>> {
        self.get_field(index).map(Generation::from_ascii).transpose()
    }
}

/// Parse `input` record by record, handing each to `f`. The first error,
/// from parsing or from the callback, aborts the walk.
pub(crate) fn parse_csv<'a, const MAX_FIELDS: usize, F>(input: &'a [u8], mut f: F) -> Result<()>
where
    F: FnMut(Record<'a, MAX_FIELDS>) -> Result<()>,
{
    for line in input.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let line = AsciiStr::from_ascii(line).map_err(|_| Error::InvalidAscii)?;
        f(Record::from_line(line)?)?;
    }
    Ok(())
}
