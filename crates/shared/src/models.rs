use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    Reported,
    Resolved,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Reported => f.pad("REPORTED"),
            IncidentStatus::Resolved => f.pad("RESOLVED"),
        }
    }
}

/// An incident as the remote store returns it.
///
/// `coordinates` is kept in its packed wire form (`"(x, y)"`, natural-image
/// pixels); use [`Incident::position`] to parse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub coordinates: String,
    pub status: IncidentStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reported_at: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
}

impl Incident {
    pub fn position(&self) -> Result<NaturalPoint, crate::error::MalformedCoordinateError> {
        crate::coords::parse_packed_coordinates(&self.coordinates)
    }

    pub fn is_resolved(&self) -> bool {
        self.status == IncidentStatus::Resolved
    }
}

/// Which subset of the cached incidents is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Reported,
    Resolved,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 3] =
        [FilterMode::All, FilterMode::Reported, FilterMode::Resolved];

    pub fn matches(self, incident: &Incident) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Reported => incident.status == IncidentStatus::Reported,
            FilterMode::Resolved => incident.status == IncidentStatus::Resolved,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Reported => "Reported",
            FilterMode::Resolved => "Resolved",
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "reported" => Ok(FilterMode::Reported),
            "resolved" => Ok(FilterMode::Resolved),
            other => Err(format!("unknown filter mode: {other}")),
        }
    }
}

/// Pointer position in viewport (client) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientPoint {
    pub x: f64,
    pub y: f64,
}

/// Position in natural-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NaturalPoint {
    pub x: f64,
    pub y: f64,
}

/// Position as fractions of the reference image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

/// A click on the map that has not been reported yet, in natural pixels.
pub type PendingClick = NaturalPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub const fn new(width: f64, height: f64) -> Self {
        ImageSize { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Snapshot of the displayed map image taken for one render pass: its
/// bounding box in client space and its intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGeometry {
    pub left: f64,
    pub top: f64,
    pub rendered_width: f64,
    pub rendered_height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl DisplayGeometry {
    pub fn rendered(&self) -> ImageSize {
        ImageSize::new(self.rendered_width, self.rendered_height)
    }

    pub fn natural(&self) -> ImageSize {
        ImageSize::new(self.natural_width, self.natural_height)
    }
}

/// Body of a create request sent by the report flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncident {
    pub description: String,
    pub coordinates: String,
}

/// Body of a status update sent by the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: IncidentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_deserializes_wire_shape() {
        let json = r#"{"id":"42","coordinates":"(100.5,200.25)","status":"REPORTED","description":"Sofa on the curb","reportedAt":"2024-03-01T10:00:00Z"}"#;
        let incident: Incident = serde_json::from_str(json).unwrap();
        assert_eq!(incident.id, "42");
        assert_eq!(incident.status, IncidentStatus::Reported);
        assert_eq!(incident.reported_at.as_deref(), Some("2024-03-01T10:00:00Z"));
        assert!(incident.resolved_at.is_none());
        let pos = incident.position().unwrap();
        assert!((pos.x - 100.5).abs() < 1e-9);
        assert!((pos.y - 200.25).abs() < 1e-9);
    }

    #[test]
    fn test_status_display_honors_width() {
        assert_eq!(format!("{:<10}|", IncidentStatus::Reported), "REPORTED  |");
        assert_eq!(format!("{:>10}|", IncidentStatus::Resolved), "  RESOLVED|");
        assert_eq!(IncidentStatus::Resolved.to_string(), "RESOLVED");
    }

    #[test]
    fn test_incident_extra_fields_default() {
        let json = r#"{"id":"1","coordinates":"(1,2)","status":"RESOLVED"}"#;
        let incident: Incident = serde_json::from_str(json).unwrap();
        assert!(incident.description.is_empty());
        assert!(incident.is_resolved());
    }

    #[test]
    fn test_filter_mode_matches() {
        let reported = Incident {
            id: "a".into(),
            coordinates: "(0, 0)".into(),
            status: IncidentStatus::Reported,
            description: String::new(),
            reported_at: None,
            resolved_at: None,
        };
        assert!(FilterMode::All.matches(&reported));
        assert!(FilterMode::Reported.matches(&reported));
        assert!(!FilterMode::Resolved.matches(&reported));
    }

    #[test]
    fn test_filter_mode_from_str() {
        assert_eq!("ALL".parse::<FilterMode>().unwrap(), FilterMode::All);
        assert_eq!("resolved".parse::<FilterMode>().unwrap(), FilterMode::Resolved);
        assert!("open".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_image_size_measurable() {
        assert!(ImageSize::new(1200.0, 899.0).is_measurable());
        assert!(!ImageSize::new(0.0, 899.0).is_measurable());
        assert!(!ImageSize::new(f64::NAN, 10.0).is_measurable());
    }
}
