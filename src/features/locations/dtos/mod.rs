mod location_dto;

pub use location_dto::{
    CreateLocationDto, LocationQueryParams, LocationResponseDto, UpdateLocationDto,
};
