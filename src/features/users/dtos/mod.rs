mod user_dto;

pub use user_dto::{
    ChangeRoleDto, DeleteUserRequestDto, RegisterProfileDto, UserQueryParams, UserResponseDto,
    UsernameAvailabilityDto,
};
