use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::CzmlError;
use super::packet::{
    Billboard, Clock, ColorValue, Corridor, CorridorPacket, DocumentPacket, HorizontalOrigin,
    Label, LabelStyle, MarkerPacket, Packet, Path, PathPacket, PixelOffset, PolylineMaterial,
    PolylineOutline, Position, SolidColor, SolidMaterial, VerticalOrigin,
};
use super::style::{
    LABEL_FILL_COLOR, LABEL_FONT, LABEL_OUTLINE_COLOR, LABEL_OUTLINE_WIDTH, LABEL_PIXEL_OFFSET,
    MARKER_IMAGE, MARKER_SCALE, PATH_RESOLUTION, PATH_WIDTH, TRACK_OUTLINE_COLOR,
    TRACK_OUTLINE_WIDTH,
};
use crate::constellation::SatelliteDescriptor;
use crate::sampler::{TimeStep, TrackSample};

pub const DOCUMENT_ID: &str = "document";
pub const CZML_VERSION: &str = "1.0";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// CZML document for one satellite. The `document` packet is always first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    packets: Vec<Packet>,
}

impl Document {
    /// Satellite name carried by the leading `document` packet
    pub fn name(&self) -> &str {
        match self.packets.first() {
            Some(Packet::Document(p)) => &p.name,
            _ => "",
        }
    }
}

#[cfg(test)]
impl Document {
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn clock(&self) -> Option<&Clock> {
        match self.packets.first() {
            Some(Packet::Document(p)) => Some(&p.clock),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap()
    }
}

/// Seconds precision, no offset suffix
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Flatten samples into `cartographicDegrees` order: `[elapsed?, lon, lat, alt]` per sample
pub fn flatten(samples: &[TrackSample]) -> Vec<f64> {
    let mut values = Vec::with_capacity(samples.iter().map(TrackSample::arity).sum());
    for sample in samples {
        if let Some(elapsed) = sample.elapsed_s {
            values.push(elapsed);
        }
        values.push(sample.longitude_deg);
        values.push(sample.latitude_deg);
        values.push(sample.altitude_m);
    }
    values
}

/// Build the four-packet document: clock, propagated orbit path, satellite marker and
/// ground swath corridor.
///
/// `track` carries elapsed time and altitude; `surface` is the same ground track without
/// time and with altitude zeroed, used as the corridor outline.
pub fn assemble(
    descriptor: &SatelliteDescriptor,
    steps: &[TimeStep],
    track: &[TrackSample],
    surface: &[TrackSample],
) -> Result<Document, CzmlError> {
    let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
        return Err(CzmlError::EmptyWindow);
    };
    for samples in [track, surface] {
        if samples.len() != steps.len() {
            return Err(CzmlError::TrackLength {
                track: samples.len(),
                steps: steps.len(),
            });
        }
    }

    let name = &descriptor.name;
    let start_time = format_timestamp(first.start_time);
    let end_time = format_timestamp(last.end_time);
    let interval = format!("{}/{}", start_time, end_time);

    let position = Position {
        epoch: Some(start_time.clone()),
        cartographic_degrees: flatten(track),
    };

    let document = DocumentPacket {
        id: DOCUMENT_ID.to_string(),
        name: name.clone(),
        version: CZML_VERSION.to_string(),
        clock: Clock {
            interval: interval.clone(),
            current_time: start_time,
            multiplier: descriptor.speed,
        },
    };

    let path = PathPacket {
        id: format!("{}/Propagated Orbit", name),
        name: format!("{} Propagated Orbit", name),
        availability: interval.clone(),
        position: position.clone(),
        path: Path {
            material: PolylineMaterial {
                polyline_outline: PolylineOutline {
                    color: ColorValue {
                        rgba: descriptor.track_color,
                    },
                    outline_color: ColorValue {
                        rgba: TRACK_OUTLINE_COLOR,
                    },
                    outline_width: TRACK_OUTLINE_WIDTH,
                },
            },
            width: PATH_WIDTH,
            resolution: PATH_RESOLUTION,
        },
    };

    let marker = MarkerPacket {
        id: format!("{}/Satellite", name),
        name: format!("{} Satellite", name),
        availability: interval,
        position,
        billboard: Billboard {
            image: MARKER_IMAGE.to_string(),
            scale: MARKER_SCALE,
        },
        label: Label {
            fill_color: ColorValue {
                rgba: LABEL_FILL_COLOR,
            },
            font: LABEL_FONT.to_string(),
            horizontal_origin: HorizontalOrigin::Left,
            outline_color: ColorValue {
                rgba: LABEL_OUTLINE_COLOR,
            },
            outline_width: LABEL_OUTLINE_WIDTH,
            pixel_offset: PixelOffset {
                cartesian2: LABEL_PIXEL_OFFSET,
            },
            style: LabelStyle::FillAndOutline,
            text: name.clone(),
            vertical_origin: VerticalOrigin::Center,
        },
    };

    let corridor = CorridorPacket {
        id: format!("{}/Corridor", name),
        name: format!("{} Ground Swath", name),
        corridor: Corridor {
            positions: Position {
                epoch: None,
                cartographic_degrees: flatten(surface),
            },
            width: descriptor.swath_width,
            material: SolidMaterial {
                solid_color: SolidColor {
                    color: ColorValue {
                        rgba: descriptor.swath_color,
                    },
                },
            },
        },
    };

    Ok(Document {
        packets: vec![
            Packet::Document(document),
            Packet::Path(path),
            Packet::Marker(marker),
            Packet::Corridor(corridor),
        ],
    })
}
