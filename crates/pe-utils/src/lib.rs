#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

//! Minimal read-only PE/COFF parser.
//!
//! Just enough of the format to pull named sections out of a UEFI
//! executable: DOS header, COFF header, optional header magic, section
//! table. Everything is borrowed from the input; nothing is copied.

use std::fmt;

#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("file is truncated: `{0}` is out of range")]
    Truncated(&'static str),

    #[error("missing MZ signature")]
    MissingDosMagic,

    #[error("missing PE signature")]
    MissingPeMagic,

    #[error("unknown optional header magic `{0:#06x}`")]
    UnknownOptionalHeaderMagic(u16),

    #[error("section `{0}` lies outside the file")]
    SectionOutOfBounds(String),
}

const DOS_MAGIC: &[u8] = b"MZ";
const PE_MAGIC: &[u8] = b"PE\0\0";
const PE_OFFSET_OFFSET: usize = 0x3c;
const COFF_HEADER_SIZE: usize = 20;
const SECTION_HEADER_SIZE: usize = 40;
const PE32_MAGIC: u16 = 0x010b;
const PE32_PLUS_MAGIC: u16 = 0x020b;

/// COFF machine type of an executable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Machine {
    Ia32,
    X64,
    Arm,
    Aarch64,
    RiscV64,
    LoongArch64,
    Unknown(u16),
}

impl Machine {
    fn from_coff(value: u16) -> Self {
        match value {
            0x014c => Self::Ia32,
            0x8664 => Self::X64,
            // Mixed ARM/Thumb, the code UEFI firmware stamps on 32-bit
            // ARM images, plus ARMNT.
            0x01c2 | 0x01c4 => Self::Arm,
            0xaa64 => Self::Aarch64,
            0x5064 => Self::RiscV64,
            0x6264 => Self::LoongArch64,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ia32 => write!(f, "ia32"),
            Self::X64 => write!(f, "x64"),
            Self::Arm => write!(f, "arm"),
            Self::Aarch64 => write!(f, "aarch64"),
            Self::RiscV64 => write!(f, "riscv64"),
            Self::LoongArch64 => write!(f, "loongarch64"),
            Self::Unknown(value) => write!(f, "unknown ({value:#06x})"),
        }
    }
}

/// One entry of the section table, with its file data resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Section<'a> {
    name: &'a [u8],
    virtual_size: u32,
    raw_size: u32,
    data: &'a [u8],
}

impl<'a> Section<'a> {
    /// Section name with the NUL padding stripped.
    #[must_use]
    pub fn name(&self) -> &'a [u8] {
        self.name
    }

    #[must_use]
    pub fn virtual_size(&self) -> u32 {
        self.virtual_size
    }

    #[must_use]
    pub fn raw_size(&self) -> u32 {
        self.raw_size
    }

    /// Section contents, capped at the virtual size. Loaders ignore the
    /// alignment padding past the virtual size, so we never hand it out.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// A parsed PE executable.
///
/// Parsing validates the whole section table up front; accessors cannot
/// fail afterwards.
#[derive(Clone, Debug)]
pub struct PeFile<'a> {
    machine: Machine,
    sections: Vec<Section<'a>>,
}

impl<'a> PeFile<'a> {
    #[tracing::instrument(skip(data), err)]
    pub fn parse(data: &'a [u8]) -> Result<Self, Error> {
        if read_bytes(data, 0, 2, "DOS header")? != DOS_MAGIC {
            return Err(Error::MissingDosMagic);
        }

        let pe_offset = read_u32(data, PE_OFFSET_OFFSET, "PE offset")?;
        let pe_offset = usize::try_from(pe_offset).map_err(|_| Error::Truncated("PE signature"))?;
        if read_bytes(data, pe_offset, 4, "PE signature")? != PE_MAGIC {
            return Err(Error::MissingPeMagic);
        }

        let coff = pe_offset + PE_MAGIC.len();
        let machine = Machine::from_coff(read_u16(data, coff, "COFF header")?);
        let number_of_sections = usize::from(read_u16(data, coff + 2, "COFF header")?);
        let optional_size = usize::from(read_u16(data, coff + 16, "COFF header")?);

        let optional = coff + COFF_HEADER_SIZE;
        if optional_size >= 2 {
            let magic = read_u16(data, optional, "optional header")?;
            if magic != PE32_MAGIC && magic != PE32_PLUS_MAGIC {
                return Err(Error::UnknownOptionalHeaderMagic(magic));
            }
        }

        let table = optional
            .checked_add(optional_size)
            .ok_or(Error::Truncated("section table"))?;

        let mut sections = Vec::with_capacity(number_of_sections);
        for index in 0..number_of_sections {
            let entry = index
                .checked_mul(SECTION_HEADER_SIZE)
                .and_then(|offset| table.checked_add(offset))
                .ok_or(Error::Truncated("section table"))?;
            let header = read_bytes(data, entry, SECTION_HEADER_SIZE, "section table")?;

            let name = trim_name(&header[..8]);
            let virtual_size = read_u32(header, 8, "section table")?;
            let raw_size = read_u32(header, 16, "section table")?;
            let raw_offset = read_u32(header, 20, "section table")?;

            sections.push(Section {
                name,
                virtual_size,
                raw_size,
                data: section_slice(data, name, raw_offset, virtual_size.min(raw_size))?,
            });
        }

        log::debug!("parsed pe image: machine {machine}, {} sections", sections.len());
        Ok(Self { machine, sections })
    }

    #[must_use]
    pub fn machine(&self) -> Machine {
        self.machine
    }

    #[must_use]
    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    /// Data of the section called `name`, or `None` if the table has no
    /// such entry.
    #[must_use]
    pub fn section_data(&self, name: &str) -> Option<&'a [u8]> {
        self.sections
            .iter()
            .find(|section| section.name == name.as_bytes())
            .map(Section::data)
    }
}

fn read_bytes<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], Error> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::Truncated(what))
}

fn read_u16(data: &[u8], offset: usize, what: &'static str) -> Result<u16, Error> {
    let bytes = read_bytes(data, offset, 2, what)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], offset: usize, what: &'static str) -> Result<u32, Error> {
    let bytes = read_bytes(data, offset, 4, what)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn trim_name(name: &[u8]) -> &[u8] {
    let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
    &name[..end]
}

fn section_slice<'a>(
    data: &'a [u8],
    name: &[u8],
    offset: u32,
    len: u32,
) -> Result<&'a [u8], Error> {
    if len == 0 {
        return Ok(&[]);
    }

    let out_of_bounds = || Error::SectionOutOfBounds(String::from_utf8_lossy(name).into_owned());
    let offset = usize::try_from(offset).map_err(|_| out_of_bounds())?;
    let len = usize::try_from(len).map_err(|_| out_of_bounds())?;
    read_bytes(data, offset, len, "section data").map_err(|_| out_of_bounds())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a little PE image: DOS stub, COFF header, a two-byte
    /// optional header, section table, raw section data.
    fn build_pe(machine: u16, sections: &[(&[u8; 8], u32, &[u8])]) -> Vec<u8> {
        let mut image = vec![0_u8; 0x40];
        image[..2].copy_from_slice(b"MZ");
        image[PE_OFFSET_OFFSET..PE_OFFSET_OFFSET + 4].copy_from_slice(&0x40_u32.to_le_bytes());

        image.extend_from_slice(b"PE\0\0");

        let coff = image.len();
        image.resize(coff + COFF_HEADER_SIZE, 0);
        image[coff..coff + 2].copy_from_slice(&machine.to_le_bytes());
        image[coff + 2..coff + 4]
            .copy_from_slice(&u16::try_from(sections.len()).unwrap().to_le_bytes());
        image[coff + 16..coff + 18].copy_from_slice(&2_u16.to_le_bytes());

        image.extend_from_slice(&PE32_MAGIC.to_le_bytes());

        let table = image.len();
        image.resize(table + sections.len() * SECTION_HEADER_SIZE, 0);

        let mut raw_offset = image.len();
        for (index, (name, virtual_size, data)) in sections.iter().enumerate() {
            let entry = table + index * SECTION_HEADER_SIZE;
            image[entry..entry + 8].copy_from_slice(*name);
            image[entry + 8..entry + 12].copy_from_slice(&virtual_size.to_le_bytes());
            image[entry + 16..entry + 20]
                .copy_from_slice(&u32::try_from(data.len()).unwrap().to_le_bytes());
            image[entry + 20..entry + 24]
                .copy_from_slice(&u32::try_from(raw_offset).unwrap().to_le_bytes());
            raw_offset += data.len();
        }

        for (_, _, data) in sections {
            image.extend_from_slice(data);
        }

        image
    }

    #[test]
    fn parses_machine_and_sections() {
        let sbat = b"shim,4\n";
        let image = build_pe(
            0x8664,
            &[
                (b".text\0\0\0", 4, b"\x90\x90\x90\x90"),
                (b".sbat\0\0\0", 7, sbat),
            ],
        );

        let pe = PeFile::parse(&image).unwrap();
        assert_eq!(pe.machine(), Machine::X64);
        assert_eq!(pe.sections().len(), 2);
        assert_eq!(pe.sections()[0].name(), b".text");
        assert_eq!(pe.section_data(".sbat"), Some(sbat.as_slice()));
        assert_eq!(pe.section_data(".reloc"), None);
    }

    #[test]
    fn virtual_size_caps_the_payload() {
        // Raw data is padded to the file alignment; only the first
        // virtual_size bytes are real.
        let image = build_pe(0x8664, &[(b".sbat\0\0\0", 5, b"ab,1\n\0\0\0")]);

        let pe = PeFile::parse(&image).unwrap();
        assert_eq!(pe.section_data(".sbat"), Some(b"ab,1\n".as_slice()));
    }

    #[test]
    fn raw_size_caps_the_payload() {
        let image = build_pe(0x8664, &[(b".bss\0\0\0\0", 0x1000, b"xy")]);

        let pe = PeFile::parse(&image).unwrap();
        assert_eq!(pe.section_data(".bss"), Some(b"xy".as_slice()));
    }

    #[test]
    fn zero_sized_section_is_empty() {
        let image = build_pe(0x8664, &[(b".bss\0\0\0\0", 0x1000, b"")]);

        let pe = PeFile::parse(&image).unwrap();
        assert_eq!(pe.section_data(".bss"), Some(b"".as_slice()));
    }

    #[test]
    fn recognizes_arm_machine_codes() {
        let arm = build_pe(0x01c2, &[]);
        assert_eq!(PeFile::parse(&arm).unwrap().machine(), Machine::Arm);

        let armnt = build_pe(0x01c4, &[]);
        assert_eq!(PeFile::parse(&armnt).unwrap().machine(), Machine::Arm);
    }

    #[test]
    fn unknown_machine_is_reported_verbatim() {
        let image = build_pe(0x1234, &[]);

        let pe = PeFile::parse(&image).unwrap();
        assert_eq!(pe.machine(), Machine::Unknown(0x1234));
        assert_eq!(pe.machine().to_string(), "unknown (0x1234)");
    }

    #[test]
    fn rejects_non_pe_input() {
        assert_eq!(PeFile::parse(b"").unwrap_err(), Error::Truncated("DOS header"));
        assert_eq!(PeFile::parse(&[0_u8; 0x80]).unwrap_err(), Error::MissingDosMagic);

        let mut image = build_pe(0x8664, &[]);
        image[0x40] = b'X';
        assert_eq!(PeFile::parse(&image).unwrap_err(), Error::MissingPeMagic);
    }

    #[test]
    fn rejects_unknown_optional_header_magic() {
        let mut image = build_pe(0x8664, &[]);
        let optional = 0x40 + 4 + COFF_HEADER_SIZE;
        image[optional..optional + 2].copy_from_slice(&0x0999_u16.to_le_bytes());

        assert_eq!(PeFile::parse(&image).unwrap_err(), Error::UnknownOptionalHeaderMagic(0x0999));
    }

    #[test]
    fn rejects_section_data_past_the_end() {
        let image = build_pe(0x8664, &[(b".sbat\0\0\0", 7, b"shim,4\n")]);
        let truncated = &image[..image.len() - 1];

        assert_eq!(
            PeFile::parse(truncated).unwrap_err(),
            Error::SectionOutOfBounds(".sbat".to_string())
        );
    }

    #[test]
    fn rejects_truncated_section_table() {
        let mut image = build_pe(0x8664, &[]);
        let coff = 0x40 + 4;
        // Claim one section without providing a table entry.
        image[coff + 2..coff + 4].copy_from_slice(&1_u16.to_le_bytes());

        assert_eq!(PeFile::parse(&image).unwrap_err(), Error::Truncated("section table"));
    }
}
