pub mod capture;
pub mod config;
pub mod detection;
pub mod detector;
pub mod growth;
pub mod models;
pub mod render;
pub mod store;

pub use detection::{ContourError, LeafCount, LeafCounter};
pub use growth::{
    CameraModel, GrowthEngine, GrowthError, GrowthThresholds, HeightPolicy, StageThreshold,
};
pub use models::{
    BoundingBox, DrawInstruction, GrowthAssessment, GrowthRecord, LeafMeasurement, Region,
};
