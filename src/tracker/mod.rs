pub mod hand;
pub mod smooth;
pub mod validation;

pub use hand::{HandPipeline, HandReport, HandTracker};
pub use smooth::GestureSmoother;
pub use validation::{Progress, Validation, ValidationWindow, WindowState};
