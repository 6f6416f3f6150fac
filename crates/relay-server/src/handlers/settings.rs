//! Public settings and endpoint catalog.

use axum::{Json, extract::State};
use relay_core::{
    CacheSettings, EndpointInfo, Envelope, HttpMethod, ParamInfo, RateLimitSettings,
    catalog::group_by_category,
};
use serde::Serialize;

use crate::routes;
use crate::state::AppState;

/// Settings safe to publish: no keys, no admin secret.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    pub name: String,
    pub version: String,
    pub rate_limit: RateLimitSettings,
    pub cache: CacheSettings,
    pub require_apikey: bool,
    pub maintenance: PublicMaintenance,
    pub total_endpoints: usize,
    pub categories: Vec<CategoryGroup>,
}

#[derive(Debug, Serialize)]
pub struct PublicMaintenance {
    pub enabled: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub name: &'static str,
    pub items: Vec<EndpointView>,
}

#[derive(Debug, Serialize)]
pub struct EndpointView {
    pub name: &'static str,
    pub path: String,
    pub methods: &'static [HttpMethod],
    pub description: &'static str,
    pub params: &'static [ParamInfo],
}

impl From<&EndpointInfo> for EndpointView {
    fn from(info: &EndpointInfo) -> Self {
        Self {
            name: info.name,
            path: info.example_path(),
            methods: info.methods,
            description: info.description,
            params: info.params,
        }
    }
}

pub async fn public_settings(State(state): State<AppState>) -> Json<Envelope<PublicSettings>> {
    let settings = state.settings().snapshot();

    let categories: Vec<CategoryGroup> = group_by_category(routes::catalog())
        .into_iter()
        .map(|(category, endpoints)| CategoryGroup {
            name: category.display_name(),
            items: endpoints.into_iter().map(EndpointView::from).collect(),
        })
        .collect();

    Json(Envelope::ok(PublicSettings {
        name: settings.name.clone(),
        version: settings.version.clone(),
        rate_limit: settings.rate_limit,
        cache: settings.cache,
        require_apikey: settings.api_settings.require_apikey,
        maintenance: PublicMaintenance {
            enabled: settings.maintenance.enabled,
            message: settings.maintenance.display_message().to_string(),
        },
        total_endpoints: categories.iter().map(|c| c.items.len()).sum(),
        categories,
    }))
}
