//! Transaction categories.

pub mod service;
pub mod types;

pub use service::CategoryService;
pub use types::{
    Category, CategoryPatch, CategoryType, DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR,
    DefaultCategory, NewCategory,
};
