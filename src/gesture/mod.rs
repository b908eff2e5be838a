pub mod classifier;
pub mod label;

pub use classifier::{Classification, GestureClassifier};
pub use label::{GestureLabel, ShapeLabel};
