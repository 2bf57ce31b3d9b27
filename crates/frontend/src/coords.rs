use dumpwatch_shared::coords;
use dumpwatch_shared::error::GeometryUnavailableError;
use dumpwatch_shared::models::{ClientPoint, DisplayGeometry, NaturalPoint};
use wasm_bindgen::JsCast;

pub const MAP_IMAGE_ID: &str = "incident-map-image";

/// Snapshot the map image's on-screen box and intrinsic size.
///
/// `None` until the element exists. A loaded-but-unmeasured image yields zero
/// sizes, which the mapper rejects.
pub fn measure_image(image_id: &str) -> Option<DisplayGeometry> {
    let document = web_sys::window()?.document()?;
    let image = document
        .get_element_by_id(image_id)?
        .dyn_into::<web_sys::HtmlImageElement>()
        .ok()?;
    let rect = image.get_bounding_client_rect();

    Some(DisplayGeometry {
        left: rect.left(),
        top: rect.top(),
        rendered_width: rect.width(),
        rendered_height: rect.height(),
        natural_width: f64::from(image.natural_width()),
        natural_height: f64::from(image.natural_height()),
    })
}

/// Pure part of click handling: pointer position to natural pixels, clamped to
/// the image so sub-pixel border hits stay on the map.
pub fn pointer_to_natural(
    pointer: ClientPoint,
    geometry: Option<DisplayGeometry>,
) -> Result<NaturalPoint, GeometryUnavailableError> {
    let geometry = geometry.ok_or(GeometryUnavailableError)?;
    let point = coords::to_natural_pixels(pointer, &geometry)?;
    Ok(NaturalPoint {
        x: point.x.clamp(0.0, geometry.natural_width),
        y: point.y.clamp(0.0, geometry.natural_height),
    })
}

/// Measure the image and convert a click on it.
pub fn click_to_natural(
    client_x: f64,
    client_y: f64,
    image_id: &str,
) -> Result<NaturalPoint, GeometryUnavailableError> {
    pointer_to_natural(
        ClientPoint {
            x: client_x,
            y: client_y,
        },
        measure_image(image_id),
    )
}

/// Short position readout for the map footer.
pub fn format_position(point: NaturalPoint) -> String {
    format!("x {:.0}, y {:.0}", point.x, point.y)
}
