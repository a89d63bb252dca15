mod handlers;
pub mod response;
mod routes;
mod session;

pub use routes::create_router;
pub use session::AdminSession;
