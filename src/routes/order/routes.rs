use crate::middleware::RequireAuth;
use actix_web::web;

use super::handlers::{
    order_cancel, order_create, order_edit, order_fetch, order_list, order_pending,
    order_status_update,
};

pub fn order_route(cfg: &mut web::ServiceConfig) {
    // Intake is public: customers place orders without an account.
    cfg.service(web::resource("/create").route(web::post().to(order_create)));
    cfg.service(web::resource("/list").route(web::post().to(order_list).wrap(RequireAuth)));
    cfg.service(web::resource("/pending").route(web::get().to(order_pending).wrap(RequireAuth)));
    cfg.service(web::resource("/fetch/{id}").route(web::get().to(order_fetch).wrap(RequireAuth)));
    cfg.service(
        web::resource("/status/{id}").route(web::post().to(order_status_update).wrap(RequireAuth)),
    );
    cfg.service(
        web::resource("/cancel/{id}").route(web::post().to(order_cancel).wrap(RequireAuth)),
    );
    cfg.service(web::resource("/edit/{id}").route(web::post().to(order_edit).wrap(RequireAuth)));
}
