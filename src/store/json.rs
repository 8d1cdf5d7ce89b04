use crate::error::{CateringError, Result};
use crate::models::{checked_price, normalize_key, Ingredient, PriceQuote, Recipe, Unit};
use crate::store::{
    edit_row, IngredientStore, IngredientTable, PriceListWriter, RecipeBook, RecipeCatalog,
    WriteGuard,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================
// Price list file
// ============================================================

/// Price list persisted as a JSON array of rows sorted by ingredient name
///
/// Reads go straight to the file. Writes run read-modify-write under the
/// [`WriteGuard`] and replace the file atomically, so a reader never observes
/// a half-written record.
#[derive(Debug)]
pub struct JsonIngredientStore {
    path: PathBuf,
    guard: WriteGuard,
}

impl JsonIngredientStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let guard = WriteGuard::for_file(&path);
        Self { path, guard }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IngredientTable> {
        if !self.path.exists() {
            debug!("Price list {:?} does not exist yet, starting empty", self.path);
            return Ok(IngredientTable::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let rows: Vec<Ingredient> = serde_json::from_str(&content)?;

        // Rows are checked like any other entry point; one bad row fails the snapshot
        let mut table = IngredientTable::default();
        for mut row in rows {
            row.name = normalize_key(&row.name);
            row.shop = normalize_key(&row.shop);
            row.validate().map_err(|e| invalid_record(&self.path, e))?;
            if table.contains(&row.name) {
                return Err(invalid_record(
                    &self.path,
                    CateringError::Format(format!("duplicate ingredient '{}'", row.name)),
                ));
            }
            table.insert(row);
        }
        Ok(table)
    }

    fn save(&self, table: IngredientTable) -> Result<()> {
        write_atomically(&self.path, &table.into_rows())
    }

    fn write(&self, edit: impl FnOnce(&mut IngredientTable) -> Result<()>) -> Result<()> {
        self.guard.with_lock(|| {
            let mut table = self.load()?;
            edit(&mut table)?;
            self.save(table)
        })
    }
}

impl IngredientStore for JsonIngredientStore {
    fn snapshot(&self) -> Result<IngredientTable> {
        self.load()
    }
}

impl PriceListWriter for JsonIngredientStore {
    fn add_ingredient(&self, ingredient: Ingredient) -> Result<()> {
        ingredient.validate()?;
        let name = ingredient.name.clone();
        self.write(|table| {
            if table.contains(&ingredient.name) {
                return Err(CateringError::AlreadyExists(format!(
                    "Ingredient '{}'",
                    ingredient.name
                )));
            }
            table.insert(ingredient);
            Ok(())
        })?;
        info!(ingredient = %name, "Ingredient added to price list");
        Ok(())
    }

    fn update_unit(&self, name: &str, unit: Unit) -> Result<()> {
        self.write(|table| {
            edit_row(table, name, |row| {
                row.unit = unit;
                Ok(())
            })
        })?;
        info!(ingredient = %normalize_key(name), unit = %unit, "Unit updated");
        Ok(())
    }

    fn update_price(&self, name: &str, price: f64) -> Result<()> {
        let price = checked_price(price)?;
        self.write(|table| {
            edit_row(table, name, |row| {
                row.price = price;
                Ok(())
            })
        })?;
        info!(ingredient = %normalize_key(name), price, "Price updated");
        Ok(())
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
        })?;
        info!(
            ingredient = %normalize_key(name),
            price = quote.price,
            unit = %quote.unit,
            "Ingredient updated from price feed"
        );
        Ok(())
    }
}

// ============================================================
// Recipe catalog file
// ============================================================

/// Recipe catalog persisted as a JSON object keyed by recipe name
#[derive(Debug)]
pub struct JsonRecipeCatalog {
    path: PathBuf,
    guard: WriteGuard,
}

impl JsonRecipeCatalog {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let guard = WriteGuard::for_file(&path);
        Self { path, guard }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RecipeBook> {
        if !self.path.exists() {
            debug!("Recipe catalog {:?} does not exist yet, starting empty", self.path);
            return Ok(RecipeBook::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let entries: BTreeMap<String, Recipe> = serde_json::from_str(&content)?;

        let mut book = RecipeBook::default();
        for (name, mut recipe) in entries {
            recipe.name = normalize_key(&name);
            if book.get(&recipe.name).is_some() {
                return Err(invalid_record(
                    &self.path,
                    CateringError::Format(format!("duplicate recipe '{}'", recipe.name)),
                ));
            }
            recipe.ingredients = normalize_keys(recipe.ingredients, &recipe.name, "ingredient")
                .map_err(|e| invalid_record(&self.path, e))?;
            recipe.portions = normalize_keys(recipe.portions, &recipe.name, "event type")
                .map_err(|e| invalid_record(&self.path, e))?;
            recipe.validate().map_err(|e| invalid_record(&self.path, e))?;
            book.insert(recipe);
        }
        Ok(book)
    }
}

/// Normalise the keys of one recipe map, rejecting keys that collide
fn normalize_keys(
    entries: BTreeMap<String, f64>,
    recipe: &str,
    what: &str,
) -> Result<BTreeMap<String, f64>> {
    let mut normalized = BTreeMap::new();
    for (key, value) in entries {
        let key = normalize_key(&key);
        if normalized.insert(key.clone(), value).is_some() {
            return Err(CateringError::Format(format!(
                "recipe '{}' lists {} '{}' twice",
                recipe, what, key
            )));
        }
    }
    Ok(normalized)
}

/// Prefix a record error with the file it came from
fn invalid_record(path: &Path, error: CateringError) -> CateringError {
    match error {
        CateringError::Format(detail) => {
            CateringError::Format(format!("{}: {}", path.display(), detail))
        }
        other => other,
    }
}

impl RecipeCatalog for JsonRecipeCatalog {
    fn snapshot(&self) -> Result<RecipeBook> {
        self.load()
    }

    fn add_recipe(&self, recipe: Recipe) -> Result<()> {
        recipe.validate()?;
        let name = recipe.name.clone();
        self.guard.with_lock(|| {
            let mut book = self.load()?;
            if book.get(&recipe.name).is_some() {
                return Err(CateringError::AlreadyExists(format!("Recipe '{}'", recipe.name)));
            }
            book.insert(recipe);
            let entries: BTreeMap<&str, &Recipe> =
                book.iter().map(|r| (r.name.as_str(), r)).collect();
            write_atomically(&self.path, &entries)
        })?;
        info!(recipe = %name, "Recipe added to catalog");
        Ok(())
    }
}

/// Serialise to a temporary sibling file, then rename over the target
fn write_atomically<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
