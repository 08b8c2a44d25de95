pub mod dataset;

pub use dataset::Dataset;
pub use dataset::FeatureSchema;
