use crate::routes::{order_route, payment_route};
use crate::schemas::GenericResponse;
use actix_web::{web, HttpResponse};

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(GenericResponse::success("running", Some(())))
}

pub fn main_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check));
    cfg.service(web::scope("/order").configure(order_route))
        .service(web::scope("/payment").configure(payment_route));
}
