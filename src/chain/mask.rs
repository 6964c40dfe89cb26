//! Prefix masks
//!
//! Select which frames a registration sees by their leading bytes.

use crate::protocol::Frame;

/// Ordered prefix pattern; `None` positions match any byte
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mask {
    pattern: Vec<Option<u8>>,
}

impl Mask {
    pub fn new(pattern: Vec<Option<u8>>) -> Self {
        Self { pattern }
    }

    /// Empty mask: matches every frame
    pub fn any() -> Self {
        Self::default()
    }

    /// Every position must equal the given byte
    pub fn exact(prefix: &[u8]) -> Self {
        Self {
            pattern: prefix.iter().copied().map(Some).collect(),
        }
    }

    /// Whether the frame's prefix satisfies this mask
    ///
    /// Positions are compared pairwise up to the shorter of the two, so mask
    /// positions past the end of the frame are not checked.
    pub fn matches(&self, frame: &Frame) -> bool {
        self.pattern
            .iter()
            .zip(frame.as_bytes())
            .all(|(want, &got)| want.map_or(true, |w| w == got))
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

impl From<&[u8]> for Mask {
    fn from(prefix: &[u8]) -> Self {
        Mask::exact(prefix)
    }
}

impl<const N: usize> From<[u8; N]> for Mask {
    fn from(prefix: [u8; N]) -> Self {
        Mask::exact(&prefix)
    }
}

impl From<Vec<Option<u8>>> for Mask {
    fn from(pattern: Vec<Option<u8>>) -> Self {
        Mask::new(pattern)
    }
}
