use std::collections::HashSet;

use crate::data::{FileType, probe_hex};

/// Whitelist of accepted signatures.
///
/// When several registered signatures are prefixes of the same probe, the
/// longest one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureRegistry {
    types: HashSet<FileType>,
}

impl SignatureRegistry {
    pub fn new<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add<I, T>(&mut self, types: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        self.types.extend(types.into_iter().map(Into::into));
    }

    pub fn remove<I, T>(&mut self, types: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        for file_type in types {
            self.types.remove(&file_type.into());
        }
    }

    pub fn contains(&self, file_type: &FileType) -> bool { self.types.contains(file_type) }

    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    pub fn len(&self) -> usize { self.types.len() }

    /// Registered signatures in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &FileType> { self.types.iter() }

    /// Find the signature matching a lowercase hex probe.
    pub fn match_hex(&self, hex: &str) -> Option<&FileType> {
        self.types
            .iter()
            .filter(|t| t.is(hex))
            .max_by_key(|t| t.as_str().len())
    }

    pub fn match_bytes(&self, bytes: &[u8]) -> Option<&FileType> { self.match_hex(&probe_hex(bytes)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut registry = SignatureRegistry::new([FileType::PDF]);
        registry.add([FileType::PNG, FileType::PDF]);
        assert_eq!(registry.len(), 2);

        registry.remove([FileType::PDF]);
        assert!(!registry.contains(&FileType::pdf()));
        assert!(registry.contains(&FileType::png()));
    }

    #[test]
    fn test_match_pdf() {
        let registry = SignatureRegistry::new([FileType::PDF, FileType::ZIP]);
        let hit = registry.match_bytes(b"%PDF-1.4\n%");
        assert_eq!(hit, Some(&FileType::pdf()));
    }

    #[test]
    fn test_no_match() {
        let registry = SignatureRegistry::new([FileType::PDF]);
        assert_eq!(registry.match_bytes(b"PK\x03\x04"), None);
        assert_eq!(registry.match_bytes(b""), None);
    }

    #[test]
    fn test_empty_signature_accepts_anything() {
        let registry = SignatureRegistry::new([""]);
        assert_eq!(registry.match_bytes(b"anything"), Some(&FileType::new("")));
        assert_eq!(registry.match_bytes(b""), Some(&FileType::new("")));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let registry = SignatureRegistry::new(["", "2550", FileType::PDF]);
        assert_eq!(registry.match_bytes(b"%PDF-1.7"), Some(&FileType::pdf()));
        assert_eq!(registry.match_bytes(b"%P"), Some(&FileType::new("2550")));
        assert_eq!(registry.match_bytes(b"\x00"), Some(&FileType::new("")));
    }
}
