//! Catalog route handlers: product listings and the product entry form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use corner_shop_core::{Price, Product};

use crate::db::{FindQuery, find_documents, insert_document};
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::routes::notice::{Notice, NoticeQuery};
use crate::routes::views::ProductView;
use crate::services::uploads::{UploadError, save_image};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub username: Option<String>,
    pub notice: Notice,
    pub products: Vec<ProductView>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub username: Option<String>,
    pub products: Vec<ProductView>,
}

/// Product entry form template.
#[derive(Template, WebTemplate)]
#[template(path = "add_products.html")]
pub struct AddProductsTemplate {
    pub username: Option<String>,
    pub notice: Notice,
}

async fn load_products(state: &AppState) -> Result<Vec<ProductView>> {
    let products = find_documents::<Product>(state.store(), &FindQuery::all()).await?;
    Ok(products.iter().map(ProductView::from).collect())
}

/// Display the home page.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NoticeQuery>,
) -> Result<HomeTemplate> {
    Ok(HomeTemplate {
        username: user.map(|u| u.username),
        notice: query.notice(),
        products: load_products(&state).await?,
    })
}

/// Display the product listing.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<ProductsTemplate> {
    let products = load_products(&state).await?;
    tracing::debug!(count = products.len(), "Listing products");
    Ok(ProductsTemplate {
        username: user.map(|u| u.username),
        products,
    })
}

/// Display the product entry form.
pub async fn new_product(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    AddProductsTemplate {
        username: user.map(|u| u.username),
        notice: query.notice(),
    }
}

/// Fields collected from the product entry form.
#[derive(Debug, Default)]
struct ProductForm {
    name: String,
    price: String,
    description: String,
    image: Option<(String, Vec<u8>)>,
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.image = Some((file_name, bytes.to_vec()));
                }
            }
            "name" | "price" | "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                match name.as_str() {
                    "name" => form.name = text,
                    "price" => form.price = text,
                    _ => form.description = text,
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Handle the product entry form.
///
/// The image is optional. A product is stored only once its image (if any)
/// is written.
#[instrument(skip(state, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect> {
    let form = read_product_form(multipart).await?;

    let name = form.name.trim();
    let Ok(price) = Price::parse(&form.price) else {
        return Ok(Redirect::to("/add_products?error=invalid"));
    };
    if name.is_empty() {
        return Ok(Redirect::to("/add_products?error=invalid"));
    }

    let image = match &form.image {
        Some((file_name, bytes)) => match save_image(state.upload_dir(), file_name, bytes).await {
            Ok(stored) => stored,
            Err(UploadError::Io(e)) => return Err(UploadError::Io(e).into()),
            Err(e) => {
                tracing::info!(error = %e, "Rejected product image");
                return Ok(Redirect::to("/add_products?error=upload"));
            }
        },
        None => String::new(),
    };

    let product = Product {
        name: name.to_string(),
        price,
        description: form.description.trim().to_string(),
        image,
    };
    let id = insert_document(state.store(), &product).await?;
    tracing::info!(product_id = %id, name = %product.name, "Product added");

    Ok(Redirect::to("/add_products?success=product_added"))
}
