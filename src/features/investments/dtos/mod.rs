mod investment_dto;

pub use investment_dto::{
    CreateInvestmentDto, InvestmentQueryParams, InvestmentResponseDto, UpdateInvestmentDto,
};
