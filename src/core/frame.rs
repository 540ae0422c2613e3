use crate::core::geo::Point;
use crate::{PinError, Result};
use serde::{Deserialize, Serialize};

/// The visible rectangle of a map display, in the display's local coordinates
///
/// Gesture positions are interpreted relative to this rectangle. Width and
/// height are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct Frame {
    origin: Point,
    width: f64,
    height: f64,
}

/// Unchecked wire form of a [`Frame`]
#[derive(Deserialize)]
struct RawFrame {
    #[serde(default)]
    origin: Point,
    width: f64,
    height: f64,
}

impl TryFrom<RawFrame> for Frame {
    type Error = PinError;

    fn try_from(raw: RawFrame) -> Result<Self> {
        Frame::new(raw.origin, raw.width, raw.height)
    }
}

impl Frame {
    /// Creates a frame with its top-left corner at `origin`
    pub fn new(origin: Point, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(PinError::InvalidFrame(format!("{width}x{height}")));
        }
        Ok(Self {
            origin,
            width,
            height,
        })
    }

    /// Creates a frame anchored at (0, 0)
    pub fn from_size(width: f64, height: f64) -> Result<Self> {
        Self::new(Point::default(), width, height)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn mid_x(&self) -> f64 {
        self.origin.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.origin.y + self.height / 2.0
    }

    /// Gets the center point of the frame
    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Checks if the frame contains a point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.height
    }

    /// Offset of `point` from the frame center as a fraction of the frame size
    ///
    /// Each axis lies in [-0.5, 0.5] while the point stays inside the frame.
    pub fn relative_offset(&self, point: &Point) -> Point {
        let offset = point.subtract(&self.center());
        Point::new(offset.x / self.width, offset.y / self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_frames() {
        assert!(Frame::from_size(0.0, 200.0).is_err());
        assert!(Frame::from_size(300.0, -1.0).is_err());
        assert!(Frame::from_size(f64::NAN, 200.0).is_err());
    }

    #[test]
    fn test_deserialize_validates_size() {
        let frame: Frame = serde_json::from_str(r#"{"width":300.0,"height":200.0}"#).unwrap();
        assert_eq!(frame, Frame::from_size(300.0, 200.0).unwrap());

        assert!(serde_json::from_str::<Frame>(r#"{"width":0.0,"height":0.0}"#).is_err());
        assert!(serde_json::from_str::<Frame>(
            r#"{"origin":{"x":1.0,"y":1.0},"width":300.0,"height":-5.0}"#
        )
        .is_err());
    }

    #[test]
    fn test_center_and_relative_offset() {
        let frame = Frame::from_size(300.0, 200.0).unwrap();
        assert_eq!(frame.center(), Point::new(150.0, 100.0));

        let rel = frame.relative_offset(&Point::new(225.0, 150.0));
        assert_eq!(rel, Point::new(0.25, 0.25));
    }

    #[test]
    fn test_offset_origin() {
        let frame = Frame::new(Point::new(10.0, 20.0), 100.0, 100.0).unwrap();
        assert_eq!(frame.center(), Point::new(60.0, 70.0));
        assert!(frame.contains(&Point::new(10.0, 120.0)));
        assert!(!frame.contains(&Point::new(5.0, 50.0)));
        assert_eq!(frame.relative_offset(&Point::new(10.0, 20.0)), Point::new(-0.5, -0.5));
    }
}
