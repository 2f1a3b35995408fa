mod desa_dto;

pub use desa_dto::{CreateDesaDto, DesaQueryParams, DesaResponseDto, UpdateDesaDto};
