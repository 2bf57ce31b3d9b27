//! Coordinate spaces of the reference map.
//!
//! Three spaces are in play and must not be mixed:
//! - client space: pointer positions reported by the browser, in CSS pixels;
//! - natural space: pixels of the map image at its intrinsic size, which is
//!   what incidents store;
//! - normalized space: fractions of the reference size, used for
//!   percentage-based overlay placement.
//!
//! The image is rendered responsively, so client space and natural space only
//! agree when the image happens to be displayed at its intrinsic size.
use crate::error::{GeometryUnavailableError, MalformedCoordinateError};
use crate::models::{ClientPoint, DisplayGeometry, ImageSize, NaturalPoint, NormalizedPoint};

// Intrinsic size of the reference map asset in pixels
pub const MAP_WIDTH_PX: f64 = 1200.0;
pub const MAP_HEIGHT_PX: f64 = 899.0;

pub const REFERENCE_SIZE: ImageSize = ImageSize::new(MAP_WIDTH_PX, MAP_HEIGHT_PX);

/// File name of the map asset in the backend's static directory, and the
/// path the frontend loads it from.
pub const MAP_IMAGE_FILE: &str = "map.jpg";
pub const MAP_IMAGE_URL: &str = "/static/map.jpg";

/// Convert a pointer position to natural-image pixels using the geometry
/// captured for the current render.
pub fn to_natural_pixels(
    pointer: ClientPoint,
    geometry: &DisplayGeometry,
) -> Result<NaturalPoint, GeometryUnavailableError> {
    let rendered = geometry.rendered();
    let natural = geometry.natural();
    if !rendered.is_measurable() || !natural.is_measurable() {
        return Err(GeometryUnavailableError);
    }

    let frac_x = (pointer.x - geometry.left) / rendered.width;
    let frac_y = (pointer.y - geometry.top) / rendered.height;

    Ok(NaturalPoint {
        x: frac_x * natural.width,
        y: frac_y * natural.height,
    })
}

/// Inverse of [`to_natural_pixels`]: where a natural-pixel point currently
/// sits in client space.
pub fn from_natural_pixels(
    point: NaturalPoint,
    geometry: &DisplayGeometry,
) -> Result<ClientPoint, GeometryUnavailableError> {
    let rendered = geometry.rendered();
    let natural = geometry.natural();
    if !rendered.is_measurable() || !natural.is_measurable() {
        return Err(GeometryUnavailableError);
    }

    Ok(ClientPoint {
        x: geometry.left + point.x / natural.width * rendered.width,
        y: geometry.top + point.y / natural.height * rendered.height,
    })
}

pub fn to_normalized(
    point: NaturalPoint,
    size: ImageSize,
) -> Result<NormalizedPoint, GeometryUnavailableError> {
    if !size.is_measurable() {
        return Err(GeometryUnavailableError);
    }
    Ok(NormalizedPoint {
        x: point.x / size.width,
        y: point.y / size.height,
    })
}

pub fn from_normalized(point: NormalizedPoint, size: ImageSize) -> NaturalPoint {
    NaturalPoint {
        x: point.x * size.width,
        y: point.y * size.height,
    }
}

/// Parse a packed coordinate string such as `(100.5, 200.25)`.
///
/// Accepts one optional pair of surrounding double quotes, which the storage
/// layer leaves behind when the composite value is stringified.
pub fn parse_packed_coordinates(raw: &str) -> Result<NaturalPoint, MalformedCoordinateError> {
    let malformed = |reason| MalformedCoordinateError {
        raw: raw.to_string(),
        reason,
    };

    let mut s = raw.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s = s[1..s.len() - 1].trim();
    }

    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| malformed("expected a parenthesized pair"))?;

    let (x_str, y_str) = inner
        .split_once(',')
        .ok_or_else(|| malformed("expected two comma-separated values"))?;
    if y_str.contains(',') {
        return Err(malformed("expected exactly two values"));
    }

    let parse_axis = |part: &str| -> Option<f64> {
        part.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    };
    let x = parse_axis(x_str).ok_or_else(|| malformed("x is not a finite number"))?;
    let y = parse_axis(y_str).ok_or_else(|| malformed("y is not a finite number"))?;

    Ok(NaturalPoint { x, y })
}

/// Pack a natural-pixel point into the stored `(x, y)` form.
pub fn format_packed_coordinates(point: NaturalPoint) -> String {
    format!("({}, {})", point.x, point.y)
}
