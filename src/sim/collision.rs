//! Axis-aligned collision geometry
//!
//! Every entity collides as its bounding rectangle. Tests are discrete: the
//! rectangles are compared where they sit this tick, so a fast body can skip
//! over a thin one between ticks.

use glam::IVec2;

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn new(pos: IVec2, size: IVec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> i32 {
        self.pos.x
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> i32 {
        self.pos.y
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// Point on the middle of the top edge
    pub fn top_center(&self) -> IVec2 {
        IVec2::new(self.pos.x + self.size.x / 2, self.pos.y)
    }

    /// True if the two rectangles share a non-empty area.
    ///
    /// Rectangles that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Indices of every rectangle in `others` that overlaps `rect`, in order
pub fn overlapping_indices<'a, I>(rect: &Rect, others: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    others
        .into_iter()
        .enumerate()
        .filter(|(_, other)| rect.overlaps(other))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(IVec2::new(x, y), IVec2::new(w, h))
    }

    #[test]
    fn test_overlap_partial() {
        let a = rect(0, 0, 10, 10);
        let b = rect(5, 5, 10, 10);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = rect(0, 0, 10, 10);
        assert!(!a.overlaps(&rect(10, 0, 10, 10)));
        assert!(!a.overlaps(&rect(0, 10, 10, 10)));
    }

    #[test]
    fn test_contained_rect_overlaps() {
        let outer = rect(0, 0, 100, 100);
        let inner = rect(40, 40, 5, 5);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_top_center() {
        let r = rect(100, 200, 60, 60);
        assert_eq!(r.top_center(), IVec2::new(130, 200));
        assert_eq!(r.center(), IVec2::new(130, 230));
    }

    #[test]
    fn test_overlapping_indices_keeps_order() {
        let probe = rect(0, 0, 20, 20);
        let others = [rect(50, 50, 5, 5), rect(10, 10, 5, 5), rect(-5, -5, 6, 6)];
        assert_eq!(overlapping_indices(&probe, others.iter()), vec![1, 2]);
    }
}
