mod investment_service;

pub use investment_service::InvestmentService;
