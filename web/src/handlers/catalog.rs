//! Catalog read endpoints and the admin product create.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tezmarket_core::repository::NewProduct;
use tezmarket_core::types::{Category, CategoryId, Money, Product, ProductId};

/// Query parameters for `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Filter to one category id.
    pub category: Option<String>,
    /// Case-insensitive substring search.
    pub search: Option<String>,
    /// `true` selects the popular rail.
    pub popular: Option<String>,
}

/// `GET /api/products`
///
/// The filters are mutually exclusive and checked in the order
/// popular → category → search, matching the storefront's usage.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = if query.popular.as_deref() == Some("true") {
        state.products.list_popular().await?
    } else if let Some(category) = query.category {
        state
            .products
            .list_by_category(CategoryId::new(category))
            .await?
    } else if let Some(search) = query.search {
        state.products.search(search).await?
    } else {
        state.products.list().await?
    };
    Ok(Json(products))
}

/// `GET /api/products/:id`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    state
        .products
        .find(ProductId::new(id.clone()))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product", id))
}

/// Request body for the admin product create.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Display name, required non-empty.
    pub name: String,
    /// Short description.
    pub description: Option<String>,
    /// Decimal price string, e.g. `"89.00"`.
    pub price: String,
    /// Display weight.
    pub weight: Option<String>,
    /// Catalog image.
    pub image_url: Option<String>,
    /// Owning category id.
    pub category_id: Option<String>,
    /// Orderable flag, default true.
    #[serde(default = "default_true")]
    pub in_stock: bool,
    /// Popular-rail flag, default false.
    #[serde(default)]
    pub is_popular: bool,
}

const fn default_true() -> bool {
    true
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::bad_request("product name is required"));
    }
    let price: Money = request
        .price
        .parse()
        .map_err(|e| AppError::bad_request(format!("invalid price: {e}")))?;

    let product = state
        .products
        .insert(NewProduct {
            name: request.name,
            description: request.description,
            price,
            weight: request.weight,
            image_url: request.image_url,
            category_id: request.category_id.map(CategoryId::new),
            in_stock: request.in_stock,
            is_popular: request.is_popular,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/categories`
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.categories.list().await?))
}
