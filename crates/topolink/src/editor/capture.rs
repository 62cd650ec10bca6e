//! Exclusive pointer capture.

use std::fmt;

/// Holder of the pointer between press and release.
///
/// Capturing always succeeds and steals the pointer from the previous
/// holder, which is returned so the caller can tell it.
pub struct PointerCapture<T> {
    holder: Option<T>,
}

impl<T> Default for PointerCapture<T> {
    fn default() -> Self {
        Self { holder: None }
    }
}

impl<T: fmt::Debug> fmt::Debug for PointerCapture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointerCapture").field(&self.holder).finish()
    }
}

impl<T: Copy + PartialEq> PointerCapture<T> {
    pub fn capture(&mut self, holder: T) -> Option<T> {
        self.holder.replace(holder).filter(|previous| *previous != holder)
    }

    /// Releases the pointer if `holder` has it. Returns `false` if the pointer
    /// was taken over in the meantime.
    pub fn release(&mut self, holder: T) -> bool {
        if self.holder == Some(holder) {
            self.holder = None;
            true
        } else {
            false
        }
    }

    pub fn holder(&self) -> Option<T> {
        self.holder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_steals() {
        let mut capture = PointerCapture::default();
        assert_eq!(capture.capture(1), None);
        assert_eq!(capture.capture(1), None);
        assert_eq!(capture.capture(2), Some(1));

        assert!(!capture.release(1));
        assert_eq!(capture.holder(), Some(2));
        assert!(capture.release(2));
        assert_eq!(capture.holder(), None);
    }
}
