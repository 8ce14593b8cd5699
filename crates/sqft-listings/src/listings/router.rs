use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use url::form_urlencoded;

use super::admin::{AdminGate, AuthError};
use super::browse::{FilterCriteria, SortKey, SortKeyError, PRICE_PRESETS};
use super::catalog::{CatalogError, ListingCatalog};
use super::domain::{DomainError, ListingDraft, ListingId, PropertyType, BHK_OPTIONS};
use super::price::normalize_price;
use super::seo::{fallback_sitemap, render_sitemap};
use super::share::ShareLinks;
use super::store::{ListingStore, MediaStore, StoreError};
use crate::config::SiteConfig;

/// Shared state behind the listing routes.
pub struct ListingApi<S, M> {
    pub catalog: ListingCatalog<S, M>,
    pub gate: AdminGate,
    pub site: SiteConfig,
}

impl<S, M> ListingApi<S, M> {
    pub fn new(catalog: ListingCatalog<S, M>, gate: AdminGate, site: SiteConfig) -> Self {
        Self {
            catalog,
            gate,
            site,
        }
    }
}

type ApiState<S, M> = State<Arc<ListingApi<S, M>>>;

/// Router builder exposing the public browse surface and the admin console API.
pub fn listing_router<S, M>(api: Arc<ListingApi<S, M>>) -> Router
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    Router::new()
        .route("/api/v1/listings", get(browse_handler::<S, M>))
        .route("/api/v1/listings/filters", get(filter_options_handler))
        .route("/api/v1/listings/featured", get(featured_handler::<S, M>))
        .route("/api/v1/listings/closed", get(closed_handler::<S, M>))
        .route("/api/v1/listings/:listing_id", get(listing_handler::<S, M>))
        .route(
            "/api/v1/listings/:listing_id/share",
            get(share_handler::<S, M>),
        )
        .route(
            "/api/v1/admin/session",
            post(login_handler::<S, M>).delete(logout_handler::<S, M>),
        )
        .route(
            "/api/v1/admin/listings",
            get(admin_list_handler::<S, M>).post(create_handler::<S, M>),
        )
        .route(
            "/api/v1/admin/listings/:listing_id",
            put(update_handler::<S, M>).delete(delete_handler::<S, M>),
        )
        .route("/api/v1/admin/images", post(upload_handler::<S, M>))
        .route("/meta-tags", get(meta_tags_handler::<S, M>))
        .route("/sitemap.xml", get(sitemap_handler::<S, M>))
        .with_state(api)
}

/// Browse query string. Multi-value parameters repeat their key
/// (`?location=Adyar&location=ECR`) so values may contain commas.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BrowseQuery {
    pub search: Option<String>,
    pub property_types: Vec<String>,
    pub bhk: Vec<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub locations: Vec<String>,
    pub sort: Option<String>,
}

impl BrowseQuery {
    /// Decode a raw `application/x-www-form-urlencoded` query string.
    /// Unknown keys are ignored; the last occurrence wins for single-value keys.
    pub fn from_query_string(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "search" => query.search = Some(value),
                "type" => query.property_types.push(value),
                "bhk" => query.bhk.push(value),
                "min_price" => query.min_price = Some(value),
                "max_price" => query.max_price = Some(value),
                "location" => query.locations.push(value),
                "sort" => query.sort = Some(value),
                _ => {}
            }
        }
        query
    }

    pub fn into_criteria(self) -> Result<(FilterCriteria, SortKey), QueryError> {
        let mut criteria = FilterCriteria {
            search: self.search.unwrap_or_default(),
            min_price: parse_bound(self.min_price.as_deref())?,
            max_price: parse_bound(self.max_price.as_deref())?,
            ..FilterCriteria::default()
        };

        for value in non_blank(&self.property_types) {
            criteria.property_types.insert(value.parse::<PropertyType>()?);
        }
        criteria.bhk = non_blank(&self.bhk).map(str::to_string).collect();
        criteria.locations = non_blank(&self.locations).map(str::to_string).collect();

        let sort = match self.sort.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.parse::<SortKey>()?,
            _ => SortKey::Default,
        };

        Ok((criteria, sort))
    }
}

fn non_blank(values: &[String]) -> impl Iterator<Item = &str> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Accepts plain amounts ("2500000") and unit shorthand ("25L", "2 Cr").
fn parse_bound(raw: Option<&str>) -> Result<Option<f64>, QueryError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let amount = normalize_price(value);
    if amount.is_nan() {
        return Err(QueryError::InvalidPrice(value.to_string()));
    }
    Ok(Some(amount))
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    PropertyType(#[from] DomainError),
    #[error(transparent)]
    Sort(#[from] SortKeyError),
    #[error("invalid price bound '{0}'")]
    InvalidPrice(String),
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct MetaTagsQuery {
    pub listing: Option<String>,
}

pub(crate) async fn browse_handler<S, M>(
    State(api): ApiState<S, M>,
    RawQuery(raw): RawQuery,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    let query = BrowseQuery::from_query_string(raw.as_deref().unwrap_or_default());
    let (criteria, sort) = match query.into_criteria() {
        Ok(parsed) => parsed,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match api.catalog.browse(&criteria, sort) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

/// Fixed option lists for the filter panel.
pub(crate) async fn filter_options_handler() -> Response {
    let property_types: Vec<_> = PropertyType::ALL
        .iter()
        .map(|kind| json!({ "value": kind.as_str(), "label": kind.label() }))
        .collect();
    let price_presets: Vec<_> = PRICE_PRESETS
        .iter()
        .map(|(label, amount)| json!({ "label": label, "value": amount }))
        .collect();
    let sorts: Vec<_> = [
        SortKey::Default,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Newest,
    ]
    .iter()
    .map(SortKey::as_str)
    .collect();

    let payload = json!({
        "property_types": property_types,
        "bhk": BHK_OPTIONS,
        "price_presets": price_presets,
        "sorts": sorts,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn featured_handler<S, M>(State(api): ApiState<S, M>) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    match api.catalog.featured() {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn closed_handler<S, M>(State(api): ApiState<S, M>) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    match api.catalog.closed() {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn listing_handler<S, M>(
    State(api): ApiState<S, M>,
    Path(listing_id): Path<String>,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    let Ok(id) = listing_id.parse::<ListingId>() else {
        return listing_not_found();
    };
    match api.catalog.get(id) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn share_handler<S, M>(
    State(api): ApiState<S, M>,
    Path(listing_id): Path<String>,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    let Ok(id) = listing_id.parse::<ListingId>() else {
        return listing_not_found();
    };
    match api.catalog.get(id) {
        Ok(listing) => {
            let links = ShareLinks::for_listing(&listing, &api.site);
            (StatusCode::OK, Json(links)).into_response()
        }
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn login_handler<S, M>(
    State(api): ApiState<S, M>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    match api.gate.login(&request.password, Utc::now()) {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(AuthError::Disabled) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, AuthError::Disabled.to_string())
        }
        Err(error) => auth_error_response(error),
    }
}

pub(crate) async fn logout_handler<S, M>(
    State(api): ApiState<S, M>,
    headers: HeaderMap,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return auth_error_response(AuthError::Unauthorized);
    };
    match api.gate.logout(token) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => auth_error_response(error),
    }
}

pub(crate) async fn admin_list_handler<S, M>(
    State(api): ApiState<S, M>,
    headers: HeaderMap,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    if let Err(rejection) = require_session(&api.gate, &headers) {
        return rejection;
    }
    match api.catalog.all() {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn create_handler<S, M>(
    State(api): ApiState<S, M>,
    headers: HeaderMap,
    Json(draft): Json<ListingDraft>,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    if let Err(rejection) = require_session(&api.gate, &headers) {
        return rejection;
    }
    match api.catalog.create(draft) {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn update_handler<S, M>(
    State(api): ApiState<S, M>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
    Json(draft): Json<ListingDraft>,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    if let Err(rejection) = require_session(&api.gate, &headers) {
        return rejection;
    }
    let Ok(id) = listing_id.parse::<ListingId>() else {
        return listing_not_found();
    };
    match api.catalog.update(id, draft) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn delete_handler<S, M>(
    State(api): ApiState<S, M>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    if let Err(rejection) = require_session(&api.gate, &headers) {
        return rejection;
    }
    let Ok(id) = listing_id.parse::<ListingId>() else {
        return listing_not_found();
    };
    match api.catalog.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn upload_handler<S, M>(
    State(api): ApiState<S, M>,
    headers: HeaderMap,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    if let Err(rejection) = require_session(&api.gate, &headers) {
        return rejection;
    }
    match api.catalog.upload_image(body.to_vec(), &query.filename) {
        Ok(url) => (StatusCode::CREATED, Json(json!({ "url": url }))).into_response(),
        Err(error) => catalog_error_response(error),
    }
}

pub(crate) async fn meta_tags_handler<S, M>(
    State(api): ApiState<S, M>,
    Query(query): Query<MetaTagsQuery>,
) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    let id = query
        .listing
        .as_deref()
        .and_then(|value| value.parse::<ListingId>().ok());
    let tags = api.catalog.meta_tags(id, &api.site);
    (StatusCode::OK, Json(tags)).into_response()
}

pub(crate) async fn sitemap_handler<S, M>(State(api): ApiState<S, M>) -> Response
where
    S: ListingStore + 'static,
    M: MediaStore + 'static,
{
    let (status, body) = match api.catalog.recently_updated() {
        Ok(listings) => (
            StatusCode::OK,
            render_sitemap(&api.site.base_url, &listings, Utc::now().date_naive()),
        ),
        Err(error) => {
            warn!(error = %error, "sitemap generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                fallback_sitemap(&api.site.base_url),
            )
        }
    };
    (status, [(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn require_session(gate: &AdminGate, headers: &HeaderMap) -> Result<(), Response> {
    let token = bearer_token(headers).ok_or_else(|| auth_error_response(AuthError::Unauthorized))?;
    gate.authorize(token, Utc::now())
        .map_err(auth_error_response)
}

fn auth_error_response(error: AuthError) -> Response {
    let status = match error {
        AuthError::Unavailable | AuthError::ExpiryOutOfRange => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::Disabled | AuthError::InvalidCredentials | AuthError::Unauthorized => {
            StatusCode::UNAUTHORIZED
        }
    };
    error_response(status, error.to_string())
}

fn catalog_error_response(error: CatalogError) -> Response {
    let status = match &error {
        CatalogError::Draft(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CatalogError::InvalidMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        CatalogError::Store(StoreError::NotFound) => return listing_not_found(),
        CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error.to_string())
}

fn listing_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "listing not found")
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({
        "error": message.into(),
    });
    (status, Json(payload)).into_response()
}
