pub mod backup;
pub mod batch;
pub mod codec;
pub mod filters;
pub mod prompt;
