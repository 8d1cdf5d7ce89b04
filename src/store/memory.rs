use crate::error::{CateringError, Result};
use crate::models::{checked_price, Ingredient, PriceQuote, Recipe, Unit};
use crate::store::{
    edit_row, IngredientStore, IngredientTable, PriceListWriter, RecipeBook, RecipeCatalog,
    WriteGuard,
};
use chrono::NaiveDate;
use std::sync::RwLock;

/// Price list held in memory, used by tests and embedders
#[derive(Debug)]
pub struct MemoryIngredientStore {
    table: RwLock<IngredientTable>,
    guard: WriteGuard,
}

impl MemoryIngredientStore {
    pub fn new(rows: impl IntoIterator<Item = Ingredient>) -> Self {
        Self {
            table: RwLock::new(IngredientTable::new(rows)),
            guard: WriteGuard::in_process(),
        }
    }

    fn write(&self, edit: impl FnOnce(&mut IngredientTable) -> Result<()>) -> Result<()> {
        self.guard.with_lock(|| {
            let mut table = self
                .table
                .write()
                .map_err(|e| CateringError::Lock(e.to_string()))?;
            edit(&mut table)
        })
    }
}

impl IngredientStore for MemoryIngredientStore {
    fn snapshot(&self) -> Result<IngredientTable> {
        let table = self
            .table
            .read()
            .map_err(|e| CateringError::Lock(e.to_string()))?;
        Ok(table.clone())
    }
}

impl PriceListWriter for MemoryIngredientStore {
    fn add_ingredient(&self, ingredient: Ingredient) -> Result<()> {
        ingredient.validate()?;
        self.write(|table| {
            if table.contains(&ingredient.name) {
                return Err(CateringError::AlreadyExists(format!(
                    "Ingredient '{}'",
                    ingredient.name
                )));
            }
            table.insert(ingredient);
            Ok(())
        })
    }

    fn update_unit(&self, name: &str, unit: Unit) -> Result<()> {
        self.write(|table| {
            edit_row(table, name, |row| {
                row.unit = unit;
                Ok(())
            })
        })
    }

    fn update_price(&self, name: &str, price: f64) -> Result<()> {
        let price = checked_price(price)?;
        self.write(|table| {
            edit_row(table, name, |row| {
                row.price = price;
                Ok(())
            })
        })
    }

    fn touch(&self, name: &str, today: NaiveDate) -> Result<()> {
        self.write(|table| {
            edit_row(table, name, |row| {
                row.last_update = today;
                Ok(())
            })
        })
    }

    fn apply_quote(&self, name: &str, quote: PriceQuote, today: NaiveDate) -> Result<()> {
        self.write(|table| {
            edit_row(table, name, |row| {
                row.unit = quote.unit;
                row.price = quote.price;
                row.last_update = today;
                Ok(())
            })
        })
    }
}

/// Recipe catalog held in memory
#[derive(Debug, Default)]
pub struct MemoryRecipeCatalog {
    book: RwLock<RecipeBook>,
}

impl MemoryRecipeCatalog {
    pub fn new(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        Self {
            book: RwLock::new(RecipeBook::new(recipes)),
        }
    }
}

impl RecipeCatalog for MemoryRecipeCatalog {
    fn snapshot(&self) -> Result<RecipeBook> {
        let book = self
            .book
            .read()
            .map_err(|e| CateringError::Lock(e.to_string()))?;
        Ok(book.clone())
    }

    fn add_recipe(&self, recipe: Recipe) -> Result<()> {
        recipe.validate()?;
        let mut book = self
            .book
            .write()
            .map_err(|e| CateringError::Lock(e.to_string()))?;
        if book.get(&recipe.name).is_some() {
            return Err(CateringError::AlreadyExists(format!("Recipe '{}'", recipe.name)));
        }
        book.insert(recipe);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_apply_quote_updates_whole_record() {
        let store = MemoryIngredientStore::new(vec![
            Ingredient::new("parsley", 0.5, Unit::Single, "yasar halim", date(1)).unwrap(),
        ]);
        store
            .apply_quote("Parsley", PriceQuote::new(0.79, Unit::Bunch).unwrap(), date(9))
            .unwrap();

        let row = store.get_ingredient("parsley").unwrap().unwrap();
        assert_eq!(row.unit, Unit::Bunch);
        assert_eq!(row.price, 0.79);
        assert_eq!(row.last_update, date(9));
    }

    #[test]
    fn test_add_duplicate_ingredient_fails() {
        let store = MemoryIngredientStore::new(Vec::new());
        let row = Ingredient::new("salt", 0.65, Unit::Pack, "aldi", date(1)).unwrap();
        store.add_ingredient(row.clone()).unwrap();

        let err = store.add_ingredient(row).unwrap_err();
        assert!(matches!(err, CateringError::AlreadyExists(_)));
    }

    #[test]
    fn test_update_missing_ingredient_fails() {
        let store = MemoryIngredientStore::new(Vec::new());
        let err = store.update_price("saffron", 4.0).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_price_rejects_zero() {
        let store = MemoryIngredientStore::new(vec![
            Ingredient::new("salt", 0.65, Unit::Pack, "aldi", date(1)).unwrap(),
        ]);
        assert!(store.update_price("salt", 0.0).is_err());
        assert_eq!(store.get_price("salt").unwrap(), 0.65);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = MemoryIngredientStore::new(vec![
            Ingredient::new("salt", 0.65, Unit::Pack, "aldi", date(1)).unwrap(),
        ]);
        let snapshot = store.snapshot().unwrap();
        store.update_price("salt", 0.99).unwrap();

        assert_eq!(snapshot.get("salt").unwrap().price, 0.65);
        assert_eq!(store.get_price("salt").unwrap(), 0.99);
    }

    #[test]
    fn test_recipe_catalog_add_and_get() {
        let catalog = MemoryRecipeCatalog::default();
        let recipe = Recipe::new(
            "Matbucha",
            [("tomatoes".to_string(), 1.2)],
            [("dinner".to_string(), 8.0)],
        )
        .unwrap();
        catalog.add_recipe(recipe.clone()).unwrap();

        assert_eq!(catalog.get_recipe("MATBUCHA").unwrap(), recipe);
        assert!(matches!(
            catalog.add_recipe(recipe),
            Err(CateringError::AlreadyExists(_))
        ));
    }
}
