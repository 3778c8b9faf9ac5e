use utoipa::OpenApi;

use crate::routes::{order, payment};

#[derive(OpenApi)]
#[openapi(
    paths(
        order::handlers::order_create,
        order::handlers::order_fetch,
        order::handlers::order_list,
        order::handlers::order_pending,
        order::handlers::order_status_update,
        order::handlers::order_cancel,
        order::handlers::order_edit,
        payment::handlers::payment_qr_generate,
        payment::handlers::payment_fetch_by_order,
        payment::handlers::payment_list,
        payment::handlers::payment_proof_upload,
        payment::handlers::payment_proof_upload_for_order,
        payment::handlers::payment_verify,
        payment::handlers::payment_confirm,
        payment::handlers::payment_reject,
        payment::handlers::payment_qr_regenerate,
    ),
    tags(
        (name = "Order", description = "Order intake and fulfillment workflow"),
        (name = "Payment", description = "Payment QR issuance and settlement review")
    )
)]
pub struct ApiDoc {}
