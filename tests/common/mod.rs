pub mod app;
pub mod factory;
pub mod postgres;

#[allow(unused_imports)]
pub use app::TestApp;
#[allow(unused_imports)]
pub use factory::{Factory, TestAuth};
#[allow(unused_imports)]
pub use postgres::PgTestApp;
