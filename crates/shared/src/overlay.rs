use std::collections::HashSet;

use crate::coords;
use crate::error::{GeometryUnavailableError, MalformedCoordinateError};
use crate::models::{
    ImageSize, Incident, IncidentStatus, NaturalPoint, NormalizedPoint, PendingClick,
};

/// Where a pin sits over the map image, in percent of the image box.
/// The pin's visual center is anchored to this point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinPlacement {
    pub left_percent: f64,
    pub top_percent: f64,
}

impl PinPlacement {
    /// Inline CSS for an absolutely positioned pin centered on the point.
    pub fn style(&self) -> String {
        format!(
            "left: {}%; top: {}%; transform: translate(-50%, -50%);",
            self.left_percent, self.top_percent
        )
    }
}

/// Place a normalized position over an image whose reference size is
/// `reference`. A reference with no area means the image has not loaded yet.
pub fn project(
    pos: NormalizedPoint,
    reference: ImageSize,
) -> Result<PinPlacement, GeometryUnavailableError> {
    if !reference.is_measurable() {
        return Err(GeometryUnavailableError);
    }
    Ok(PinPlacement {
        left_percent: pos.x * 100.0,
        top_percent: pos.y * 100.0,
    })
}

/// Place a natural-pixel position, normalizing it against `reference` first.
pub fn project_natural(
    pos: NaturalPoint,
    reference: ImageSize,
) -> Result<PinPlacement, GeometryUnavailableError> {
    let normalized = coords::to_normalized(pos, reference)?;
    project(normalized, reference)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKind {
    Reported,
    Resolved,
    Pending,
}

impl PinKind {
    pub fn for_status(status: IncidentStatus) -> Self {
        match status {
            IncidentStatus::Reported => PinKind::Reported,
            IncidentStatus::Resolved => PinKind::Resolved,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PinKind::Reported => "Reported Incident Pin",
            PinKind::Resolved => "Resolved Incident Pin",
            PinKind::Pending => "Click Pin",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pin<'a> {
    pub kind: PinKind,
    /// `None` for the pending-click pin.
    pub incident_id: Option<&'a str>,
    pub placement: PinPlacement,
}

/// An incident left off the map because its coordinates did not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPin<'a> {
    pub incident_id: &'a str,
    pub error: MalformedCoordinateError,
}

/// All pins for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayFrame<'a> {
    pub pins: Vec<Pin<'a>>,
    pub skipped: Vec<SkippedPin<'a>>,
}

/// Which malformed incidents have already been logged. Projection runs on
/// every render, so warnings go through here to fire once per bad record.
///
/// Keyed on id and raw value: a record that is edited and still malformed is
/// reported again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkipLog {
    seen: HashSet<(String, String)>,
}

impl SkipLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn about each skipped pin not seen before. Returns how many were new.
    pub fn record(&mut self, skipped: &[SkippedPin<'_>]) -> usize {
        let mut fresh = 0;
        for skip in skipped {
            let key = (skip.incident_id.to_string(), skip.error.raw.clone());
            if self.seen.insert(key) {
                tracing::warn!(incident = %skip.incident_id, error = %skip.error, "Skipping incident pin");
                fresh += 1;
            }
        }
        fresh
    }
}

/// Project every visible incident plus the pending click against one
/// reference size, so saved pins and the click pin can never disagree.
///
/// Incidents with malformed coordinates are collected in
/// [`OverlayFrame::skipped`]; the rest of the frame still renders. Pass them
/// to a [`SkipLog`] to report them.
pub fn project_pins<'a, I>(
    incidents: I,
    pending: Option<PendingClick>,
    reference: ImageSize,
) -> Result<OverlayFrame<'a>, GeometryUnavailableError>
where
    I: IntoIterator<Item = &'a Incident>,
{
    if !reference.is_measurable() {
        return Err(GeometryUnavailableError);
    }

    let mut frame = OverlayFrame::default();
    for incident in incidents {
        let pos = match incident.position() {
            Ok(pos) => pos,
            Err(error) => {
                frame.skipped.push(SkippedPin {
                    incident_id: incident.id.as_str(),
                    error,
                });
                continue;
            }
        };
        frame.pins.push(Pin {
            kind: PinKind::for_status(incident.status),
            incident_id: Some(incident.id.as_str()),
            placement: project_natural(pos, reference)?,
        });
    }

    if let Some(click) = pending {
        frame.pins.push(Pin {
            kind: PinKind::Pending,
            incident_id: None,
            placement: project_natural(click, reference)?,
        });
    }

    Ok(frame)
}
