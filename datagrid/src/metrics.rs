//! Scrollbar width measurement and its process-wide cache.
//!
//! The host supplies a [`ScrollbarProbe`]: a way to create a throwaway
//! scrolling container, read its outer and inner widths, and tear it
//! down. [`measure_scrollbar`] holds the probe element in a guard so it is
//! torn down on every exit path, including unwinding.

use std::sync::atomic::{AtomicU32, Ordering};

/// Host hook for measuring the platform scrollbar.
pub trait ScrollbarProbe {
    /// Handle to the probe element.
    type Element;

    /// Create a scrolling container with overflowing content.
    fn create(&mut self) -> Self::Element;

    /// Width including the scrollbar.
    fn outer_width(&self, element: &Self::Element) -> u16;

    /// Width available to content.
    fn inner_width(&self, element: &Self::Element) -> u16;

    /// Remove the probe element.
    fn destroy(&mut self, element: Self::Element);
}

/// A probe for hosts that already know their scrollbar width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticProbe(pub u16);

impl ScrollbarProbe for StaticProbe {
    type Element = ();

    fn create(&mut self) {}

    fn outer_width(&self, _element: &()) -> u16 {
        self.0
    }

    fn inner_width(&self, _element: &()) -> u16 {
        0
    }

    fn destroy(&mut self, _element: ()) {}
}

struct ProbeGuard<'a, P: ScrollbarProbe> {
    probe: &'a mut P,
    element: Option<P::Element>,
}

impl<'a, P: ScrollbarProbe> ProbeGuard<'a, P> {
    fn new(probe: &'a mut P) -> Self {
        let element = probe.create();
        Self {
            probe,
            element: Some(element),
        }
    }

    fn gutter(&self) -> u16 {
        match &self.element {
            Some(element) => self
                .probe
                .outer_width(element)
                .saturating_sub(self.probe.inner_width(element)),
            None => 0,
        }
    }
}

impl<P: ScrollbarProbe> Drop for ProbeGuard<'_, P> {
    fn drop(&mut self) {
        if let Some(element) = self.element.take() {
            self.probe.destroy(element);
        }
    }
}

/// Measure the scrollbar width once, without caching.
pub fn measure_scrollbar<P: ScrollbarProbe>(probe: &mut P) -> u16 {
    let guard = ProbeGuard::new(probe);
    guard.gutter()
}

const UNSET: u32 = u32::MAX;

static SCROLLBAR_WIDTH: AtomicU32 = AtomicU32::new(UNSET);

/// Scrollbar width, measured on first use and cached for the process.
pub fn scrollbar_width<P: ScrollbarProbe>(probe: &mut P) -> u16 {
    if let Some(width) = cached_scrollbar_width() {
        return width;
    }
    let width = measure_scrollbar(probe);
    match SCROLLBAR_WIDTH.compare_exchange(UNSET, width as u32, Ordering::AcqRel, Ordering::Acquire)
    {
        Ok(_) => {
            log::debug!("measured scrollbar width: {}", width);
            width
        }
        // Another caller measured first; keep theirs.
        Err(existing) => existing as u16,
    }
}

/// The cached width, if it has been measured.
pub fn cached_scrollbar_width() -> Option<u16> {
    match SCROLLBAR_WIDTH.load(Ordering::Acquire) {
        UNSET => None,
        width => Some(width as u16),
    }
}

/// Forget the cached width so the next call measures again.
pub fn invalidate_scrollbar_width() {
    SCROLLBAR_WIDTH.store(UNSET, Ordering::Release);
}
