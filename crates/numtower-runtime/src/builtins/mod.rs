pub mod math;
pub mod stats;

pub use math::Function;
pub use stats::Statistic;
