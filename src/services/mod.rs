pub mod recommendations;
pub mod similarity;

pub use recommendations::{recommend, NUM_RECOMMENDATIONS};
