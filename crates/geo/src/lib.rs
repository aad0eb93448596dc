//! Geographic services
//!
//! Address geocoding with a layered fallback chain, great-circle
//! distance, and the competitor locator that turns a business request
//! into the set of in-radius candidates.

pub mod distance;
pub mod geocoder;
pub mod locator;
pub mod postal;

pub use distance::haversine_distance;
pub use geocoder::Geocoder;
pub use locator::{Candidate, CompetitorLocator};
pub use postal::estimate_by_postal_code;
