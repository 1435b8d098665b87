//! The scrollbar cache is process-wide, so everything touching it lives in
//! one test to keep the harness's threads from interleaving.

use std::panic::{AssertUnwindSafe, catch_unwind};

use datagrid::metrics::{
    ScrollbarProbe, StaticProbe, cached_scrollbar_width, invalidate_scrollbar_width,
    measure_scrollbar, scrollbar_width,
};

#[derive(Default)]
struct CountingProbe {
    outer: u16,
    inner: u16,
    created: usize,
    destroyed: usize,
    fail: bool,
}

impl ScrollbarProbe for CountingProbe {
    type Element = usize;

    fn create(&mut self) -> usize {
        self.created += 1;
        self.created
    }

    fn outer_width(&self, _element: &usize) -> u16 {
        if self.fail {
            panic!("probe measurement failed");
        }
        self.outer
    }

    fn inner_width(&self, _element: &usize) -> u16 {
        self.inner
    }

    fn destroy(&mut self, _element: usize) {
        self.destroyed += 1;
    }
}

#[test]
fn test_scrollbar_measurement_and_cache() {
    // Uncached measurement tears the probe down.
    let mut probe = CountingProbe {
        outer: 100,
        inner: 83,
        ..Default::default()
    };
    assert_eq!(measure_scrollbar(&mut probe), 17);
    assert_eq!((probe.created, probe.destroyed), (1, 1));

    // Teardown also happens when measuring panics.
    let mut failing = CountingProbe {
        fail: true,
        ..Default::default()
    };
    let result = catch_unwind(AssertUnwindSafe(|| measure_scrollbar(&mut failing)));
    assert!(result.is_err());
    assert_eq!((failing.created, failing.destroyed), (1, 1));

    // Inner wider than outer means no gutter.
    let mut overlay = CountingProbe {
        outer: 80,
        inner: 100,
        ..Default::default()
    };
    assert_eq!(measure_scrollbar(&mut overlay), 0);

    // First use measures; later calls reuse the cached value.
    invalidate_scrollbar_width();
    assert_eq!(cached_scrollbar_width(), None);
    let mut first = CountingProbe {
        outer: 100,
        inner: 83,
        ..Default::default()
    };
    assert_eq!(scrollbar_width(&mut first), 17);
    assert_eq!(cached_scrollbar_width(), Some(17));

    let mut second = CountingProbe {
        outer: 100,
        inner: 90,
        ..Default::default()
    };
    assert_eq!(scrollbar_width(&mut second), 17);
    assert_eq!(second.created, 0);

    // Invalidation forces a fresh measurement.
    invalidate_scrollbar_width();
    assert_eq!(scrollbar_width(&mut second), 10);
    assert_eq!(second.created, 1);

    invalidate_scrollbar_width();
    assert_eq!(scrollbar_width(&mut StaticProbe(1)), 1);
    invalidate_scrollbar_width();
}
