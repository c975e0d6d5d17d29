pub mod company;
pub mod project;
pub mod team;
pub mod team_member;
pub mod user;
