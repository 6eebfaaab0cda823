pub mod recommend;
pub mod task;
