pub mod category_dto;

pub use category_dto::{
    CategoryDetailDto, CategoryFlatDto, CategoryListingDto, CategoryResponseDto,
    CategorySummaryDto, CategoryTreeDto, CreateCategoryDto, DeleteCategoryResponseDto,
    UpdateCategoryDto,
};
