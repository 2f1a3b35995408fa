mod location;

pub use location::{Location, LocationFilter, LocationType};
