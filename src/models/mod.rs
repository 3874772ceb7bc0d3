pub mod candidate;
pub mod department;
pub mod position;
pub mod problem;
pub mod stack;
pub mod submission;
pub mod user;
