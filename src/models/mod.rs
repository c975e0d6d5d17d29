pub mod company;
pub mod project;
pub mod team;
pub mod user;

pub use company::*;
pub use project::*;
pub use team::*;
pub use user::*;
