pub mod candidate_portal;
pub mod candidates;
pub mod departments;
pub mod health;
pub mod panel;
pub mod positions;
pub mod problems;
pub mod session;
pub mod settings;
pub mod stacks;
pub mod submissions;
