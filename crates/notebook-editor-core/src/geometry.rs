//! Screen geometry types and the geometry capability.

/// Gap between the bottom of the toolbar and the top of the selection, in px.
pub const TOOLBAR_GAP: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Layout queries the toolbar positioner needs from the rendering engine.
pub trait Geometry {
    /// Bounding box of the current selection, in viewport coordinates.
    fn selection_bounds(&self) -> Option<Rect>;

    /// Vertical document scroll offset.
    fn scroll_top(&self) -> f64;
}

/// Where to put a toolbar of `toolbar` size so it sits centered above
/// `selection`, in document coordinates.
pub fn place_above(selection: Rect, toolbar: Size, scroll_top: f64) -> Point {
    Point {
        x: selection.center_x() - toolbar.width / 2.0,
        y: selection.top - toolbar.height - TOOLBAR_GAP + scroll_top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_above_centers_horizontally() {
        let sel = Rect::new(100.0, 200.0, 60.0, 18.0);
        let pos = place_above(sel, Size::new(40.0, 30.0), 0.0);
        assert_eq!(pos.x, 110.0);
        assert_eq!(pos.y, 162.0);
    }

    #[test]
    fn test_place_above_adds_scroll() {
        let sel = Rect::new(0.0, 50.0, 20.0, 10.0);
        let pos = place_above(sel, Size::new(20.0, 10.0), 300.0);
        assert_eq!(pos.y, 50.0 - 10.0 - TOOLBAR_GAP + 300.0);
    }
}
