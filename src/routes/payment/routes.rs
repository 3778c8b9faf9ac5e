use crate::middleware::RequireAuth;
use actix_web::web;

use super::handlers::{
    payment_confirm, payment_fetch_by_order, payment_list, payment_proof_upload,
    payment_proof_upload_for_order, payment_qr_generate, payment_qr_regenerate, payment_reject,
    payment_verify,
};

pub fn payment_route(cfg: &mut web::ServiceConfig) {
    // Public: the ordering page generates and polls its own payment.
    cfg.service(web::resource("/qr/generate").route(web::post().to(payment_qr_generate)));
    cfg.service(web::resource("/order/{order_id}").route(web::get().to(payment_fetch_by_order)));

    cfg.service(web::resource("/list").route(web::post().to(payment_list).wrap(RequireAuth)));
    cfg.service(
        web::resource("/proof/order/{order_id}")
            .route(web::post().to(payment_proof_upload_for_order).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/proof/{id}").route(web::post().to(payment_proof_upload).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/verify/{id}").route(web::post().to(payment_verify).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/confirm/{id}").route(web::post().to(payment_confirm).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/reject/{id}").route(web::post().to(payment_reject).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/qr/regenerate/{id}")
            .route(web::post().to(payment_qr_regenerate).wrap(RequireAuth)),
    );
}
