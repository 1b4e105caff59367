//! Reading the revocation list from the firmware.
//!
//! Linux exposes UEFI variables through efivarfs. Every file there
//! starts with a four byte attribute word, followed by the variable
//! data.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::utils;

/// efivarfs mount point.
pub const EFIVARFS_PATH: &str = "/sys/firmware/efi/efivars";

/// Vendor GUID of shim's variables.
pub const SHIM_LOCK_GUID: &str = "605dab50-e046-4300-abb6-3dd810dd8b23";

/// Runtime-visible copy of the revocation list. `SbatLevel` itself is
/// boot-services only; shim mirrors it into this variable.
pub const SBAT_LEVEL_RT: &str = "SbatLevelRT";

pub fn variable_path(name: &str, guid: &str) -> PathBuf {
    Path::new(EFIVARFS_PATH).join(format!("{name}-{guid}"))
}

fn strip_attributes(raw: &[u8]) -> Option<&[u8]> {
    raw.get(4..)
}

/// Read a UEFI variable, without the attribute word and without
/// trailing NULs.
#[tracing::instrument(err)]
pub fn read_variable(path: &Path) -> anyhow::Result<Vec<u8>> {
    let raw = std::fs::read(path).with_context(|| format!("reading `{}`", path.display()))?;
    let data = strip_attributes(&raw)
        .with_context(|| format!("`{}` is shorter than the attribute prefix", path.display()))?;
    log::debug!("read {} bytes from `{}`", data.len(), path.display());
    Ok(utils::trim_trailing_nuls(data).to_vec())
}

#[tracing::instrument(err)]
pub fn read_sbat_level() -> anyhow::Result<Vec<u8>> {
    read_variable(&variable_path(SBAT_LEVEL_RT, SHIM_LOCK_GUID))
        .context("reading the firmware revocation list")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_paths_follow_the_efivarfs_layout() {
        assert_eq!(
            variable_path(SBAT_LEVEL_RT, SHIM_LOCK_GUID),
            Path::new("/sys/firmware/efi/efivars/SbatLevelRT-605dab50-e046-4300-abb6-3dd810dd8b23")
        );
    }

    #[test]
    fn strips_the_attribute_word() {
        assert_eq!(strip_attributes(&[7, 0, 0, 0, b'a']), Some(&[b'a'][..]));
        assert_eq!(strip_attributes(&[7, 0, 0, 0]), Some(&[][..]));
        assert_eq!(strip_attributes(&[7, 0]), None);
    }
}
