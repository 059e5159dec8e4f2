pub mod optimizer;

pub use optimizer::{ImageOptimizer, OptimizedImage, OptimizerSettings, OutputFormat};
