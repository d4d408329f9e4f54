use std::sync::Arc;

use crate::error::AppResult;
use crate::models::Category;
use crate::repositories::CategoryStore;

pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryStore>) -> Self {
        Self { categories }
    }

    pub fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.categories.list()
    }
}
