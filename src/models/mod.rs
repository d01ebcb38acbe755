pub mod generation;
pub mod job;
pub mod tryon;
pub mod video;
