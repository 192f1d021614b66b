use serde::{Deserialize, Serialize};

/// RGBA color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba([r, g, b, a])
    }
}

pub const DEFAULT_SWATH_COLOR: Rgba = Rgba::new(255, 0, 0, 127);
pub const DEFAULT_TRACK_COLOR: Rgba = Rgba::new(255, 255, 255, 200);

pub const TRACK_OUTLINE_COLOR: Rgba = Rgba::new(255, 255, 255, 200);
pub const TRACK_OUTLINE_WIDTH: f64 = 5.0;
pub const PATH_WIDTH: f64 = 1.0;
pub const PATH_RESOLUTION: f64 = 120.0;

pub const LABEL_FILL_COLOR: Rgba = Rgba::new(0, 255, 0, 255);
pub const LABEL_OUTLINE_COLOR: Rgba = Rgba::new(0, 0, 0, 255);
pub const LABEL_OUTLINE_WIDTH: f64 = 4.0;
pub const LABEL_FONT: &str = "15pt Lucida Console";
pub const LABEL_PIXEL_OFFSET: [f64; 2] = [12.0, 0.0];

pub const MARKER_SCALE: f64 = 2.0;

/// 16x16 satellite icon
pub const MARKER_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAABAAAAAQCAYAAAAf8/9hAAAAAXNSR0IArs4c6QAAAARnQU1BAACxjwv8YQUAAAAJcEhZcwAADsMAAA7DAcdvqGQAAADJSURBVDhPnZHRDcMgEEMZjVEYpaNklIzSEfLfD4qNnXAJSFWfhO7w2Zc0Tf9QG2rXrEzSUeZLOGm47WoH95x3Hl3jEgilvDgsOQUTqsNl68ezEwn1vae6lceSEEYvvWNT/Rxc4CXQNGadho1NXoJ+9iaqc2xi2xbt23PJCDIB6TQjOC6Bho/sDy3fBQT8PrVhibU7yBFcEPaRxOoeTwbwByCOYf9VGp1BYI1BA+EeHhmfzKbBoJEQwn1yzUZtyspIQUha85MpkNIXB7GizqDEECsAAAAASUVORK5CYII=";
