//! Construction-time interpreter options.

use bitflags::bitflags;

bitflags! {
    /// Interpreter-wide feature switches.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Features: u32 {
        /// Make `*` select clear mode and commit clear effects.
        const CLEAR_MODE = 1 << 0;
    }
}

/// Options applied when an interpreter is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Source byte stored as 0 when loading a program.
    pub nul: Option<u8>,
    /// Enabled features.
    pub features: Features,
}

impl Options {
    /// Use `nul` as the visible placeholder for NUL cells.
    pub fn with_nul(mut self, nul: u8) -> Self {
        self.nul = Some(nul);
        self
    }

    /// Enable `features` in addition to those already set.
    pub fn with_features(mut self, features: Features) -> Self {
        self.features |= features;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.nul, None);
        assert!(options.features.is_empty());
        assert_eq!(Features::default(), Features::empty());
    }

    #[test]
    fn test_builder() {
        let options = Options::default()
            .with_nul(b'.')
            .with_features(Features::CLEAR_MODE);
        assert_eq!(options.nul, Some(b'.'));
        assert!(options.features.contains(Features::CLEAR_MODE));
    }

    #[test]
    fn test_unknown_bits_are_truncated() {
        assert_eq!(Features::from_bits_truncate(0xFFFF_FFFF), Features::CLEAR_MODE);
        assert_eq!(Features::all().bits(), 1);
    }
}
