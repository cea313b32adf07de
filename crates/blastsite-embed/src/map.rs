//! Service-area map bridge.

use blastsite_core::{GeoPoint, ServiceArea};

use crate::error::EmbedError;

pub const METERS_PER_MILE: f64 = 1_609.344;

#[derive(Debug, Clone, PartialEq)]
pub struct CircleStyle {
    pub stroke_color: String,
    pub stroke_opacity: f64,
    pub stroke_weight: u32,
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#1d4ed8".to_string(),
            stroke_opacity: 0.8,
            stroke_weight: 2,
            fill_color: "#3b82f6".to_string(),
            fill_opacity: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapHandle(pub u64);

/// Mapping primitives exposed by the externally loaded map script.
pub trait MapApi {
    /// # Errors
    ///
    /// Returns [`EmbedError::Map`] when the container is missing or the
    /// script rejects the call.
    fn create_map(
        &mut self,
        container_id: &str,
        center: GeoPoint,
        zoom: u8,
    ) -> Result<MapHandle, EmbedError>;

    /// # Errors
    ///
    /// Returns [`EmbedError::Map`] when the script rejects the marker.
    fn add_marker(&mut self, map: MapHandle, position: GeoPoint, title: &str)
        -> Result<(), EmbedError>;

    /// # Errors
    ///
    /// Returns [`EmbedError::Map`] when the script rejects the circle.
    fn add_circle(
        &mut self,
        map: MapHandle,
        center: GeoPoint,
        radius_meters: f64,
        style: &CircleStyle,
    ) -> Result<(), EmbedError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOutcome {
    /// No map capability was loaded; nothing rendered.
    NotAvailable,
    Rendered(MapHandle),
    Failed,
}

/// Zoom level that keeps the whole service circle in view.
#[must_use]
pub fn zoom_for_radius(radius_miles: f64) -> u8 {
    if radius_miles <= 25.0 {
        10
    } else if radius_miles <= 75.0 {
        8
    } else {
        7
    }
}

/// Draws the business marker and the service-radius circle.
///
/// An absent `api` renders nothing. Script failures are logged and reported
/// as [`MapOutcome::Failed`]; they never propagate to the page.
pub fn render_service_area<M: MapApi + ?Sized>(
    api: Option<&mut M>,
    container_id: &str,
    business_name: &str,
    area: &ServiceArea,
) -> MapOutcome {
    let Some(api) = api else {
        tracing::debug!(container_id, "map script not loaded; skipping service area");
        return MapOutcome::NotAvailable;
    };

    match draw(api, container_id, business_name, area) {
        Ok(handle) => MapOutcome::Rendered(handle),
        Err(err) => {
            tracing::warn!(container_id, error = %err, "service area map failed");
            MapOutcome::Failed
        }
    }
}

fn draw<M: MapApi + ?Sized>(
    api: &mut M,
    container_id: &str,
    business_name: &str,
    area: &ServiceArea,
) -> Result<MapHandle, EmbedError> {
    let handle = api.create_map(container_id, area.center, zoom_for_radius(area.radius_miles))?;
    api.add_marker(handle, area.center, business_name)?;
    api.add_circle(
        handle,
        area.center,
        area.radius_miles * METERS_PER_MILE,
        &CircleStyle::default(),
    )?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Map(String, u8),
        Marker(String),
        Circle(f64),
    }

    #[derive(Default)]
    struct RecordingMap {
        calls: Vec<Call>,
        reject_circle: bool,
    }

    impl MapApi for RecordingMap {
        fn create_map(
            &mut self,
            container_id: &str,
            _center: GeoPoint,
            zoom: u8,
        ) -> Result<MapHandle, EmbedError> {
            self.calls.push(Call::Map(container_id.to_string(), zoom));
            Ok(MapHandle(7))
        }

        fn add_marker(
            &mut self,
            _map: MapHandle,
            _position: GeoPoint,
            title: &str,
        ) -> Result<(), EmbedError> {
            self.calls.push(Call::Marker(title.to_string()));
            Ok(())
        }

        fn add_circle(
            &mut self,
            _map: MapHandle,
            _center: GeoPoint,
            radius_meters: f64,
            _style: &CircleStyle,
        ) -> Result<(), EmbedError> {
            if self.reject_circle {
                return Err(EmbedError::Map("circle rejected".to_string()));
            }
            self.calls.push(Call::Circle(radius_meters));
            Ok(())
        }
    }

    fn area(radius_miles: f64) -> ServiceArea {
        ServiceArea {
            center: GeoPoint {
                latitude: 39.7589,
                longitude: -84.1916,
            },
            radius_miles,
            places: vec!["Dayton".to_string()],
        }
    }

    #[test]
    fn draws_marker_and_radius_in_meters() {
        let mut api = RecordingMap::default();
        let outcome = render_service_area(Some(&mut api), "service-map", "Precision Blast Co.", &area(50.0));

        assert_eq!(outcome, MapOutcome::Rendered(MapHandle(7)));
        assert_eq!(api.calls.len(), 3);
        assert_eq!(api.calls[0], Call::Map("service-map".to_string(), 8));
        assert_eq!(api.calls[1], Call::Marker("Precision Blast Co.".to_string()));
        let Call::Circle(radius) = api.calls[2] else {
            panic!("expected circle, got {:?}", api.calls[2]);
        };
        assert!((radius - 80_467.2).abs() < 1e-6);
    }

    #[test]
    fn missing_api_renders_nothing() {
        let outcome = render_service_area::<RecordingMap>(None, "service-map", "Biz", &area(10.0));
        assert_eq!(outcome, MapOutcome::NotAvailable);
    }

    #[test]
    fn script_error_is_contained() {
        let mut api = RecordingMap {
            reject_circle: true,
            ..RecordingMap::default()
        };
        let outcome = render_service_area(Some(&mut api), "service-map", "Biz", &area(10.0));
        assert_eq!(outcome, MapOutcome::Failed);
    }

    #[test]
    fn zoom_steps_down_with_radius() {
        assert_eq!(zoom_for_radius(25.0), 10);
        assert_eq!(zoom_for_radius(60.0), 8);
        assert_eq!(zoom_for_radius(120.0), 7);
    }
}
