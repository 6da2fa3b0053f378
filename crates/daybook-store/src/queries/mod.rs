pub mod labels;
pub mod notes;
