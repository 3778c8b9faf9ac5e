pub mod order;
pub mod payment;
mod routes;

pub use order::order_route;
pub use payment::payment_route;
pub use routes::main_route;
