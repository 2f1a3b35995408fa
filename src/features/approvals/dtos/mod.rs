mod approval_dto;

pub use approval_dto::{
    ApprovalQueryParams, ApprovalResponseDto, ApprovalStatsDto, RejectSubmissionDto,
    ReviewResultDto, StatusCountsDto,
};
