mod desa;

pub use desa::{
    Bumdes, Desa, DesaStatistics, InfrastructureRatings, InvestmentBlurb, ProductItem,
    TourismItem,
};
