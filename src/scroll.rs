//! Keeping the active caption centered in its scroll container.

use tracing::debug;

/// Anything that can bring a segment's rendered element into view.
pub trait Scroller {
    fn center_on(&mut self, segment_id: &str);
}

/// Closures make convenient scrollers for hosts that already have a scroll routine.
impl<F: FnMut(&str)> Scroller for F {
    fn center_on(&mut self, segment_id: &str) {
        self(segment_id)
    }
}

/// On-screen box of a rendered segment, measured from the top of the container's content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

/// The host UI's scrollable transcript list.
pub trait ScrollContainer {
    /// Visible height of the container.
    fn viewport_height(&self) -> f64;

    /// Where the element for `segment_id` sits, or `None` when it isn't rendered.
    fn element_bounds(&self, segment_id: &str) -> Option<Bounds>;

    fn set_scroll_top(&mut self, offset: f64);
}

/// Scroll offset that puts the element's midpoint in the middle of the viewport.
///
/// Clamped at zero so elements near the top don't scroll past the start of the list.
pub fn center_offset(bounds: Bounds, viewport_height: f64) -> f64 {
    let midpoint = bounds.top + bounds.height / 2.0;
    (midpoint - viewport_height / 2.0).max(0.0)
}

/// A [`Scroller`] that does the centering math against a [`ScrollContainer`].
#[derive(Debug)]
pub struct ContainerScroller<C> {
    container: C,
}

impl<C: ScrollContainer> ContainerScroller<C> {
    pub fn new(container: C) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn into_inner(self) -> C {
        self.container
    }
}

impl<C: ScrollContainer> Scroller for ContainerScroller<C> {
    fn center_on(&mut self, segment_id: &str) {
        let Some(bounds) = self.container.element_bounds(segment_id) else {
            debug!(segment_id, "no rendered element to scroll to");
            return;
        };

        let offset = center_offset(bounds, self.container.viewport_height());
        debug!(segment_id, offset, "centering active segment");
        self.container.set_scroll_top(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rows of equal height stacked from the top, like a plain transcript list.
    struct Rows {
        ids: Vec<&'static str>,
        row_height: f64,
        viewport: f64,
        scroll_top: Option<f64>,
    }

    impl ScrollContainer for Rows {
        fn viewport_height(&self) -> f64 {
            self.viewport
        }

        fn element_bounds(&self, segment_id: &str) -> Option<Bounds> {
            let row = self.ids.iter().position(|id| *id == segment_id)?;
            Some(Bounds {
                top: row as f64 * self.row_height,
                height: self.row_height,
            })
        }

        fn set_scroll_top(&mut self, offset: f64) {
            self.scroll_top = Some(offset);
        }
    }

    fn rows() -> Rows {
        Rows {
            ids: vec!["a", "b", "c", "d", "e", "f", "g", "h"],
            row_height: 40.0,
            viewport: 120.0,
            scroll_top: None,
        }
    }

    #[test]
    fn center_offset_puts_midpoint_in_the_middle() {
        let b = Bounds {
            top: 400.0,
            height: 40.0,
        };
        assert_eq!(center_offset(b, 200.0), 320.0);
    }

    #[test]
    fn center_offset_clamps_at_zero() {
        let b = Bounds {
            top: 10.0,
            height: 20.0,
        };
        assert_eq!(center_offset(b, 300.0), 0.0);
    }

    #[test]
    fn container_scroller_sets_the_offset() {
        let mut scroller = ContainerScroller::new(rows());
        scroller.center_on("e");
        // Row 4 spans 160..200, midpoint 180, half viewport 60.
        assert_eq!(scroller.container().scroll_top, Some(120.0));
    }

    #[test]
    fn container_scroller_ignores_unrendered_segments() {
        let mut scroller = ContainerScroller::new(rows());
        scroller.center_on("missing");
        assert_eq!(scroller.into_inner().scroll_top, None);
    }

    #[test]
    fn closures_are_scrollers() {
        let mut seen = Vec::new();
        let mut scroller = |id: &str| seen.push(id.to_owned());
        scroller.center_on("a");
        scroller.center_on("b");
        assert_eq!(seen, ["a", "b"]);
    }
}
