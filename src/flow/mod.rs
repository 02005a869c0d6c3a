pub mod recovery;
pub mod step;
pub mod walker;
