/// Strip trailing NUL padding from a payload.
///
/// Both sources pad: efivarfs variables carry a terminating NUL and
/// `.sbat` sections are zero-padded up to the file alignment. Interior
/// NULs are left alone; the parser rejects those.
pub fn trim_trailing_nuls(mut data: &[u8]) -> &[u8] {
    while let [rest @ .., 0] = data {
        data = rest;
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_nuls() {
        assert_eq!(trim_trailing_nuls(b"abc\0\0"), b"abc");
        assert_eq!(trim_trailing_nuls(b"abc"), b"abc");
        assert_eq!(trim_trailing_nuls(b"\0\0"), b"");
        assert_eq!(trim_trailing_nuls(b""), b"");
        assert_eq!(trim_trailing_nuls(b"a\0b\0"), b"a\0b");
    }
}
