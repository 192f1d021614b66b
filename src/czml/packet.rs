use serde::Serialize;

use super::style::Rgba;

/// One CZML packet. Serialized without a tag; each variant carries its own `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Packet {
    Document(DocumentPacket),
    Path(PathPacket),
    Marker(MarkerPacket),
    Corridor(CorridorPacket),
}

#[cfg(test)]
impl Packet {
    pub fn id(&self) -> &str {
        match self {
            Packet::Document(p) => &p.id,
            Packet::Path(p) => &p.id,
            Packet::Marker(p) => &p.id,
            Packet::Corridor(p) => &p.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentPacket {
    pub id: String,
    pub name: String,
    pub version: String,
    pub clock: Clock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clock {
    pub interval: String,
    pub current_time: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
    pub cartographic_degrees: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorValue {
    pub rgba: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPacket {
    pub id: String,
    pub name: String,
    pub availability: String,
    pub position: Position,
    pub path: Path,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub material: PolylineMaterial,
    pub width: f64,
    pub resolution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineMaterial {
    pub polyline_outline: PolylineOutline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineOutline {
    pub color: ColorValue,
    pub outline_color: ColorValue,
    pub outline_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPacket {
    pub id: String,
    pub name: String,
    pub availability: String,
    pub position: Position,
    pub billboard: Billboard,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Billboard {
    pub image: String,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub fill_color: ColorValue,
    pub font: String,
    pub horizontal_origin: HorizontalOrigin,
    pub outline_color: ColorValue,
    pub outline_width: f64,
    pub pixel_offset: PixelOffset,
    pub style: LabelStyle,
    pub text: String,
    pub vertical_origin: VerticalOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelOffset {
    pub cartesian2: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalOrigin {
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalOrigin {
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelStyle {
    FillAndOutline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorridorPacket {
    pub id: String,
    pub name: String,
    pub corridor: Corridor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Corridor {
    pub positions: Position,
    pub width: f64,
    pub material: SolidMaterial,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidMaterial {
    pub solid_color: SolidColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolidColor {
    pub color: ColorValue,
}
