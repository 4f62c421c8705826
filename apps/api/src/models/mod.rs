pub mod course;
pub mod skill;
