//! Backing-surface size tracking.

use winit::dpi::PhysicalSize;

/// Size of the backing surface in physical pixels, as last applied.
///
/// The window's client area can change at any time; the backing surface only
/// follows when `sync_to` is called.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }

    /// Adopts `client` if it differs from the current size.
    ///
    /// Returns `true` when the size changed and the surface must be reconfigured.
    pub fn sync_to(&mut self, client: PhysicalSize<u32>) -> bool {
        if self.width == client.width && self.height == client.height {
            return false;
        }
        self.width = client.width;
        self.height = client.height;
        true
    }

    #[inline]
    pub fn is_drawable(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// `width / height`, or `None` for a degenerate (minimized) surface.
    pub fn aspect_ratio(self) -> Option<f32> {
        self.is_drawable()
            .then(|| self.width as f32 / self.height as f32)
    }
}

impl From<PhysicalSize<u32>> for Viewport {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_follows_client_only_on_sync() {
        let mut vp = Viewport::new(800, 600);

        // The client area shrinks; nothing happens until the next sync.
        let client = PhysicalSize::new(400, 300);
        assert_eq!(vp.size(), PhysicalSize::new(800, 600));

        assert!(vp.sync_to(client));
        assert_eq!(vp.size(), PhysicalSize::new(400, 300));
    }

    #[test]
    fn sync_is_idempotent() {
        let mut vp = Viewport::new(800, 600);
        assert!(!vp.sync_to(PhysicalSize::new(800, 600)));
        assert!(vp.sync_to(PhysicalSize::new(801, 600)));
        assert!(!vp.sync_to(PhysicalSize::new(801, 600)));
    }

    #[test]
    fn aspect_ratio() {
        assert_eq!(Viewport::new(800, 400).aspect_ratio(), Some(2.0));
        assert_eq!(Viewport::new(800, 0).aspect_ratio(), None);
        assert_eq!(Viewport::new(0, 600).aspect_ratio(), None);
    }
}
