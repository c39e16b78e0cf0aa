//! Tooltip placement around a hovered anchor

use serde::Serialize;

use super::Rect;

/// Space between anchor and tooltip
pub const TOOLTIP_GAP: f32 = 8.0;
/// Minimum distance kept from the viewport edges
pub const VIEWPORT_MARGIN: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub side: Side,
}

/// Place a `width` x `height` tooltip centered over `anchor`, flipping below
/// when there is no room above and sliding sideways to stay on screen.
pub fn place(anchor: Rect, width: f32, height: f32, viewport: Rect) -> Placement {
    let above_y = anchor.y - TOOLTIP_GAP - height;
    let (y, side) = if above_y >= viewport.y + VIEWPORT_MARGIN {
        (above_y, Side::Above)
    } else {
        (anchor.bottom() + TOOLTIP_GAP, Side::Below)
    };

    let min_x = viewport.x + VIEWPORT_MARGIN;
    let max_x = (viewport.right() - VIEWPORT_MARGIN - width).max(min_x);
    let x = (anchor.center().x - width / 2.0).clamp(min_x, max_x);

    Placement { x, y, side }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect { x: 0.0, y: 0.0, width: 800.0, height: 600.0 };

    #[test]
    fn centered_above() {
        let anchor = Rect::new(300.0, 200.0, 100.0, 30.0);
        let p = place(anchor, 120.0, 40.0, VIEWPORT);
        assert_eq!(p, Placement { x: 290.0, y: 152.0, side: Side::Above });
    }

    #[test]
    fn flips_below_near_top() {
        let anchor = Rect::new(300.0, 10.0, 100.0, 30.0);
        let p = place(anchor, 120.0, 40.0, VIEWPORT);
        assert_eq!(p.side, Side::Below);
        assert_eq!(p.y, 48.0);
    }

    #[test]
    fn clamped_to_edges() {
        let left = place(Rect::new(0.0, 300.0, 20.0, 20.0), 120.0, 40.0, VIEWPORT);
        assert_eq!(left.x, VIEWPORT_MARGIN);

        let right = place(Rect::new(780.0, 300.0, 20.0, 20.0), 120.0, 40.0, VIEWPORT);
        assert_eq!(right.x, 800.0 - VIEWPORT_MARGIN - 120.0);

        // wider than the viewport: pin to the left margin
        let wide = place(Rect::new(400.0, 300.0, 20.0, 20.0), 1000.0, 40.0, VIEWPORT);
        assert_eq!(wide.x, VIEWPORT_MARGIN);
    }
}
