// Domain types and value objects
pub mod observation;
pub mod series;

// Re-export commonly used types
pub use observation::{PriceField, PriceObservation};
pub use series::PriceSeries;
