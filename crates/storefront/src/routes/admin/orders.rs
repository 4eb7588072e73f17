//! Admin order status updates.

use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use voltmart_core::{OrderId, OrderStatus};

use crate::middleware::RequireAdmin;
use crate::routes::admin::{finish, reject};
use crate::state::AppState;

/// Order status form data.
#[derive(Debug, Deserialize)]
pub struct OrderStatusForm {
    #[serde(default)]
    pub status: String,
}

/// Parse a status the console is allowed to set.
fn selectable_status(raw: &str) -> Option<OrderStatus> {
    raw.parse::<OrderStatus>()
        .ok()
        .filter(|s| s.is_admin_selectable())
}

/// Change an order's status.
#[instrument(skip(state, session, admin))]
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Form(form): Form<OrderStatusForm>,
) -> Response {
    let Some(status) = selectable_status(&form.status) else {
        return reject(&session, "Invalid status").await;
    };

    let result = state
        .api()
        .update_order_status(&admin.token, id, status)
        .await;
    finish(
        &session,
        result,
        "Order status updated successfully!",
        "Failed to update order status. Please try again.",
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectable_status() {
        assert_eq!(selectable_status("Shipped"), Some(OrderStatus::Shipped));
        assert_eq!(selectable_status("Processing"), None);
        assert_eq!(selectable_status("bogus"), None);
    }
}
