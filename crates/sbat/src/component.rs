use core::fmt;

use ascii::AsciiStr;

use crate::Generation;

/// A component name paired with a generation.
///
/// This is the unit both artifacts speak in: image metadata declares the
/// generation an image was built at, a revocation list declares the
/// lowest generation still allowed to boot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Component<'a> {
    name: &'a AsciiStr,
    generation: Generation,
}

impl<'a> Component<'a> {
    #[must_use]
    pub fn new(name: &'a AsciiStr, generation: Generation) -> Self {
        Self { name, generation }
    }

    #[must_use]
    pub fn name(&self) -> &'a AsciiStr {
        self.name
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl fmt::Display for Component<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.name, self.generation)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Component<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct as _;

        let mut s = serializer.serialize_struct("Component", 2)?;
        s.serialize_field("name", self.name.as_str())?;
        s.serialize_field("generation", &self.generation)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn displays_as_csv_pair() {
        let name = AsciiStr::from_ascii("shim").unwrap();
        let component = Component::new(name, Generation::new(4).unwrap());
        assert_eq!(component.to_string(), "shim,4");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_name_and_generation() {
        let name = AsciiStr::from_ascii("shim").unwrap();
        let component = Component::new(name, Generation::new(4).unwrap());

        let json = serde_json::to_string(&component).unwrap();
        assert_eq!(json, r#"{"name":"shim","generation":4}"#);
    }
}
