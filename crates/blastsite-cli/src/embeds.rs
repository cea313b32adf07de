//! Previews for the third-party form and map integrations.
//!
//! Both bridges run for real; the browser capabilities they drive are replaced
//! by hosts that record each call as the script statement it stands for.

use std::sync::{Mutex, PoisonError};

use blastsite_core::{AppConfig, FormEmbedConfig, GeoPoint, SiteProfile};
use blastsite_embed::{
    render_service_area, CircleStyle, EmbedError, FormBridge, FormHost, FormOptions, MapApi,
    MapHandle, MapOutcome, PollConfig, RenderOutcome,
};

/// Form host that is ready immediately and records each create call.
#[derive(Debug, Default)]
struct ScriptFormHost {
    statements: Mutex<Vec<String>>,
}

impl FormHost for ScriptFormHost {
    fn is_ready(&self) -> bool {
        true
    }

    fn create_form(&self, options: &FormOptions) -> Result<(), EmbedError> {
        let body =
            serde_json::to_string(options).map_err(|e| EmbedError::FormHost(e.to_string()))?;
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("forms.create({body});"));
        Ok(())
    }
}

/// Map API that records each drawing call.
#[derive(Debug, Default)]
struct ScriptMap {
    next_handle: u64,
    statements: Vec<String>,
}

fn lat_lng(point: GeoPoint) -> String {
    format!("{{ lat: {}, lng: {} }}", point.latitude, point.longitude)
}

impl MapApi for ScriptMap {
    fn create_map(
        &mut self,
        container_id: &str,
        center: GeoPoint,
        zoom: u8,
    ) -> Result<MapHandle, EmbedError> {
        self.next_handle += 1;
        self.statements.push(format!(
            "const map{} = maps.create({container_id:?}, {}, {zoom});",
            self.next_handle,
            lat_lng(center)
        ));
        Ok(MapHandle(self.next_handle))
    }

    fn add_marker(
        &mut self,
        map: MapHandle,
        position: GeoPoint,
        title: &str,
    ) -> Result<(), EmbedError> {
        self.statements.push(format!(
            "maps.marker(map{}, {}, {title:?});",
            map.0,
            lat_lng(position)
        ));
        Ok(())
    }

    fn add_circle(
        &mut self,
        map: MapHandle,
        center: GeoPoint,
        radius_meters: f64,
        style: &CircleStyle,
    ) -> Result<(), EmbedError> {
        self.statements.push(format!(
            "maps.circle(map{}, {}, {radius_meters:.1}, {:?}, {});",
            map.0,
            lat_lng(center),
            style.fill_color,
            style.fill_opacity
        ));
        Ok(())
    }
}

/// Mounts the form once through [`FormBridge`] and returns the recorded calls.
pub(crate) async fn form_statements(
    form: &FormEmbedConfig,
    target: &str,
    poll: PollConfig,
) -> anyhow::Result<Vec<String>> {
    let host = ScriptFormHost::default();
    let bridge = FormBridge::new(FormOptions::new(form, target), poll);

    match bridge.mount(&host).await {
        RenderOutcome::Rendered => {}
        other => anyhow::bail!("form was not rendered: {other:?}"),
    }
    Ok(host
        .statements
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner))
}

/// Draws the business service area and returns the recorded calls.
pub(crate) fn map_statements(
    profile: &SiteProfile,
    container_id: &str,
) -> anyhow::Result<Vec<String>> {
    let mut api = ScriptMap::default();
    match render_service_area(
        Some(&mut api),
        container_id,
        &profile.business.name,
        &profile.business.service_area,
    ) {
        MapOutcome::Rendered(_) => Ok(api.statements),
        other => anyhow::bail!("service area map was not rendered: {other:?}"),
    }
}

/// Print the calls the lead-capture form bridge makes for the configured form.
///
/// # Errors
///
/// Returns an error if the site profile cannot be loaded, has no form
/// configured, or the bridge does not render.
pub(crate) async fn run_form(config: &AppConfig, target: &str) -> anyhow::Result<()> {
    let profile = blastsite_core::load_site_profile(&config.site_path)?;
    let form = profile
        .form
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("site profile has no form configured"))?;

    let poll = PollConfig::from_millis(config.form_poll_interval_ms, config.form_timeout_ms);
    for statement in form_statements(form, target, poll).await? {
        println!("{statement}");
    }
    Ok(())
}

/// Print the calls the map bridge makes for the business service area.
///
/// # Errors
///
/// Returns an error if the site profile cannot be loaded or the map does not
/// render.
pub(crate) fn run_map(config: &AppConfig, container_id: &str) -> anyhow::Result<()> {
    let profile = blastsite_core::load_site_profile(&config.site_path)?;
    for statement in map_statements(&profile, container_id)? {
        println!("{statement}");
    }
    Ok(())
}
