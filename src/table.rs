//! Recipe table input contract.
//!
//! A table is an ordered list of rows, each naming a product and its
//! ingredient list. Rows are validated into strictly binary
//! [`Combination`]s before a graph is built; a product may repeat with
//! different ingredient pairs (alternate recipes). Order matters: it
//! fixes the "first discovered wins" tie-break during search.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CraftError, Result};

/// One row of the raw table as supplied by the caller (or JSON file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRow {
    /// The element this row produces.
    pub product: String,
    /// The ingredients consumed. Must be exactly two names.
    pub ingredients: Vec<String>,
}

/// A validated, strictly binary combination rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub product: String,
    pub ingredient_a: String,
    pub ingredient_b: String,
}

/// The full ordered recipe table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeTable {
    pub rows: Vec<RecipeRow>,
}

impl RecipeTable {
    pub fn new(rows: Vec<RecipeRow>) -> Self {
        Self { rows }
    }

    /// Build a table from `(product, ingredient_a, ingredient_b)` triples.
    pub fn from_triples<I, S>(triples: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        let rows = triples
            .into_iter()
            .map(|(product, a, b)| RecipeRow {
                product: product.into(),
                ingredients: vec![a.into(), b.into()],
            })
            .collect();
        Self { rows }
    }

    /// Load a table from a JSON file: `[{"product": "Dust", "ingredients": ["Air", "Earth"]}, ...]`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Validate every row into a binary [`Combination`].
    ///
    /// Fails fast on an empty table or any row whose ingredient list is
    /// not exactly two names. Row order is preserved.
    pub fn validate(&self) -> Result<Vec<Combination>> {
        if self.rows.is_empty() {
            return Err(CraftError::Graph("recipe table is empty".to_string()));
        }

        let mut combinations = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            if row.ingredients.len() != 2 {
                return Err(CraftError::Graph(format!(
                    "row {} ('{}') has {} ingredients, expected exactly 2",
                    i,
                    row.product,
                    row.ingredients.len()
                )));
            }
            combinations.push(Combination {
                product: row.product.clone(),
                ingredient_a: row.ingredients[0].clone(),
                ingredient_b: row.ingredients[1].clone(),
            });
        }
        Ok(combinations)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ok() {
        let table = RecipeTable::from_triples(vec![
            ("Dust", "Air", "Earth"),
            ("Energy", "Air", "Fire"),
        ]);
        let combos = table.validate().unwrap();
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].product, "Dust");
        assert_eq!(combos[0].ingredient_a, "Air");
        assert_eq!(combos[0].ingredient_b, "Earth");
    }

    #[test]
    fn test_validate_empty_table() {
        let table = RecipeTable::default();
        let err = table.validate().unwrap_err();
        assert!(matches!(err, CraftError::Graph(_)));
    }

    #[test]
    fn test_validate_non_binary_row() {
        let table = RecipeTable::new(vec![RecipeRow {
            product: "Alloy".to_string(),
            ingredients: vec![
                "Fire".to_string(),
                "Earth".to_string(),
                "Water".to_string(),
            ],
        }]);
        let err = table.validate().unwrap_err();
        assert!(matches!(err, CraftError::Graph(_)));
        assert!(err.to_string().contains("Alloy"));
    }

    #[test]
    fn test_product_may_repeat() {
        let table = RecipeTable::from_triples(vec![
            ("Mud", "Water", "Earth"),
            ("Mud", "Rain", "Earth"),
        ]);
        let combos = table.validate().unwrap();
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].product, combos[1].product);
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");
        std::fs::write(
            &path,
            r#"[{"product": "Dust", "ingredients": ["Air", "Earth"]}]"#,
        )
        .unwrap();

        let table = RecipeTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].product, "Dust");
    }

    #[test]
    fn test_load_missing_file() {
        let result = RecipeTable::load(Path::new("does_not_exist.json"));
        assert!(matches!(result, Err(CraftError::Io(_))));
    }
}
