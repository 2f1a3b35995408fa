mod investment;

pub use investment::{Investment, InvestmentFilter, InvestmentSector};
