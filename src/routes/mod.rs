use axum::Router;

use crate::state::AppState;

pub mod cart;
pub mod compliments;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod payments;
pub mod stores;
pub mod users;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(stores::router())
        .merge(cart::router())
        .merge(compliments::router())
        .merge(orders::router())
        .merge(payments::router())
}
