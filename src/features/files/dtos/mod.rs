mod file_dto;

pub use file_dto::{
    check_image, DeleteFileByUrlDto, DeleteFileResponseDto, FileResponseDto, UploadImageDto,
};
