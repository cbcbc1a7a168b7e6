use std::path::Path;

use super::{read_json, write_json};
use crate::domain::Ingredient;
use crate::error::{KeepsakeError, Result};

pub fn load_ingredients(path: &Path) -> Result<Vec<Ingredient>> {
    if !path.exists() {
        return Err(KeepsakeError::InvalidConfig(format!(
            "ingredient file {} not found",
            path.display()
        )));
    }
    read_json(path)
}

pub fn save_ingredients(path: &Path, ingredients: &[Ingredient]) -> Result<()> {
    write_json(path, ingredients)
}
