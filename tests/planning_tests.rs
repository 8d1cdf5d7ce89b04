/// Integration tests for event planning over the JSON data files
use catering_estimator::{
    error::CateringError,
    models::Unit,
    planner::{parse_overrides, Attribution, EventRequest, Planner},
    store::{IngredientStore, JsonIngredientStore, JsonRecipeCatalog, PriceListWriter, RecipeCatalog},
};
use chrono::NaiveDate;
use std::path::Path;
use tempfile::TempDir;

const PRICE_LIST: &str = r#"[
  { "name": "chickpeas", "price": 1.5, "unit": "kg", "shop": "aldi", "last_update": "2024-06-08" },
  { "name": "lemons", "price": 0.3, "unit": "whole", "shop": "aldi", "last_update": "2024-06-08" },
  { "name": "parsley", "price": 0.5, "unit": "bunch", "shop": "yasar halim", "last_update": "2024-05-01" },
  { "name": "tahini", "price": 3.0, "unit": "whole", "shop": "yasar halim", "last_update": "2024-06-08" }
]"#;

const RECIPES: &str = r#"{
  "hummus": {
    "ingredients": { "chickpeas": 0.5, "tahini": 0.1, "lemons": 1 },
    "portions": { "buffet": 10, "canapes": 20 }
  },
  "Tabbouleh": {
    "ingredients": { "Parsley": 2, "lemons": 2 },
    "portions": { "buffet": 8 }
  },
  "falafel": {
    "ingredients": { "chickpeas": 0.4, "sumac": 0.05 },
    "portions": { "buffet": 12 }
  }
}"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn setup() -> (TempDir, JsonIngredientStore, JsonRecipeCatalog) {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "ingredients.json", PRICE_LIST);
    write(dir.path(), "recipes.json", RECIPES);

    let ingredients = JsonIngredientStore::open(dir.path().join("ingredients.json"));
    let recipes = JsonRecipeCatalog::open(dir.path().join("recipes.json"));
    (dir, ingredients, recipes)
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn plan(
    ingredients: &JsonIngredientStore,
    recipes: &JsonRecipeCatalog,
    guests: u32,
    dishes: &str,
    overrides: &str,
) -> catering_estimator::error::Result<catering_estimator::planner::EventPlan> {
    let request = EventRequest::new(guests, "buffet", &EventRequest::parse_recipe_list(dishes))?;
    let overrides = parse_overrides(overrides)?;
    Planner::default().plan(
        &request,
        &recipes.snapshot()?,
        &ingredients.snapshot()?,
        &overrides,
        today(),
    )
}

#[test]
fn test_single_recipe_event() {
    let (dir, ingredients, recipes) = setup();
    write(
        dir.path(),
        "recipes.json",
        r#"{ "hummus": { "ingredients": { "chickpeas": 0.5, "tahini": 0.1 }, "portions": { "buffet": 10 } } }"#,
    );

    let plan = plan(&ingredients, &recipes, 40, "hummus", "").unwrap();

    assert_eq!(plan.multipliers.get("hummus"), Some(4.0));
    assert_eq!(plan.lines.len(), 2);

    let chickpeas = &plan.lines[0];
    assert_eq!(chickpeas.shop, "aldi");
    assert_eq!(chickpeas.ingredient, "chickpeas");
    assert_eq!(chickpeas.quantity, 2.0);
    assert_eq!(chickpeas.unit, Unit::Kg);
    assert_eq!(chickpeas.price, 3.0);
    assert_eq!(chickpeas.attribution, Attribution::AllRecipes);

    let tahini = &plan.lines[1];
    assert_eq!(tahini.shop, "yasar halim");
    assert_eq!(tahini.quantity, 1.0);
    assert_eq!(tahini.price, 3.0);

    assert_eq!(plan.total, 6.0);
    assert!(plan.warnings.is_empty());
}

#[test]
fn test_override_halves_quantities() {
    let (dir, ingredients, recipes) = setup();
    write(
        dir.path(),
        "recipes.json",
        r#"{ "hummus": { "ingredients": { "chickpeas": 0.5, "tahini": 0.1 }, "portions": { "buffet": 10 } } }"#,
    );

    let plan = plan(&ingredients, &recipes, 40, "hummus", "Hummus: 2").unwrap();

    assert_eq!(plan.estimated.get("hummus"), Some(4.0));
    assert_eq!(plan.multipliers.get("hummus"), Some(2.0));
    assert_eq!(plan.lines[0].quantity, 1.0);
    assert_eq!(plan.lines[0].price, 1.5);
    assert_eq!(plan.lines[1].quantity, 1.0);
    assert_eq!(plan.total, 4.5);
}

#[test]
fn test_shared_ingredient_is_aggregated_and_attributed() {
    let (_dir, ingredients, recipes) = setup();

    // hummus: 20/10 -> 2 batches, tabbouleh: 20/8 = 2.5 batches
    let plan = plan(&ingredients, &recipes, 20, "hummus, tabbouleh", "").unwrap();
    assert_eq!(plan.multipliers.get("tabbouleh"), Some(2.5));

    let lemons = plan.lines.iter().find(|l| l.ingredient == "lemons").unwrap();
    assert_eq!(lemons.quantity, 7.0);
    assert_eq!(lemons.price, 2.1);
    assert_eq!(lemons.attribution, Attribution::AllRecipes);

    let parsley = plan.lines.iter().find(|l| l.ingredient == "parsley").unwrap();
    assert_eq!(parsley.quantity, 5.0);
    assert_eq!(
        parsley.attribution,
        Attribution::Recipes(vec!["tabbouleh".to_string()])
    );

    // aldi rows first, then yasar halim
    let shops: Vec<&str> = plan.lines.iter().map(|l| l.shop.as_str()).collect();
    assert_eq!(shops, vec!["aldi", "aldi", "yasar halim", "yasar halim"]);

    // parsley was last priced 40 days ago
    assert_eq!(plan.warnings.len(), 1);
    assert_eq!(plan.warnings[0].ingredient, "parsley");
    assert_eq!(plan.warnings[0].age_days, 40);
}

#[test]
fn test_missing_ingredient_fails_closed() {
    let (_dir, ingredients, recipes) = setup();

    let err = plan(&ingredients, &recipes, 24, "hummus, falafel", "").unwrap_err();
    match err {
        CateringError::IngredientNotFound { ingredient, recipe } => {
            assert_eq!(ingredient, "sumac");
            assert_eq!(recipe.as_deref(), Some("falafel"));
        }
        other => panic!("Expected IngredientNotFound, got {:?}", other),
    }
}

#[test]
fn test_unknown_event_type_and_recipe() {
    let (_dir, ingredients, recipes) = setup();

    let request = EventRequest::new(30, "wedding", &["hummus"]).unwrap();
    let err = Planner::default()
        .plan(
            &request,
            &recipes.snapshot().unwrap(),
            &ingredients.snapshot().unwrap(),
            &[],
            today(),
        )
        .unwrap_err();
    assert!(matches!(err, CateringError::EventTypeNotFound { .. }));

    let err = plan(&ingredients, &recipes, 30, "baklava", "").unwrap_err();
    assert!(matches!(err, CateringError::RecipeNotFound(_)));
}

#[test]
fn test_override_for_unrequested_recipe_is_rejected() {
    let (_dir, ingredients, recipes) = setup();

    let err = plan(&ingredients, &recipes, 30, "hummus", "tabbouleh: 3").unwrap_err();
    assert!(matches!(err, CateringError::UnknownRecipe(ref r) if r == "tabbouleh"));

    let err = plan(&ingredients, &recipes, 30, "hummus", "hummus 3").unwrap_err();
    assert!(matches!(err, CateringError::Format(_)));
}

#[test]
fn test_maintenance_writes_feed_next_plan() {
    let (dir, ingredients, recipes) = setup();
    write(
        dir.path(),
        "recipes.json",
        r#"{ "hummus": { "ingredients": { "chickpeas": 0.5, "tahini": 0.1 }, "portions": { "buffet": 10 } } }"#,
    );

    ingredients.update_price("chickpeas", 2.0).unwrap();
    ingredients.update_unit("tahini", Unit::Pack).unwrap();
    assert_eq!(ingredients.get_unit("tahini").unwrap(), Unit::Pack);

    let plan = plan(&ingredients, &recipes, 40, "hummus", "").unwrap();
    assert_eq!(plan.lines[0].price, 4.0);
    assert_eq!(plan.lines[1].unit, Unit::Pack);
    assert_eq!(plan.total, 7.0);

    // file stays a sorted array
    let saved = std::fs::read_to_string(ingredients.path()).unwrap();
    let names: Vec<String> = serde_json::from_str::<Vec<serde_json::Value>>(&saved)
        .unwrap()
        .into_iter()
        .map(|row| row["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["chickpeas", "lemons", "parsley", "tahini"]);
}

#[test]
fn test_zero_portion_size_fails_closed() {
    let (dir, ingredients, recipes) = setup();
    write(
        dir.path(),
        "recipes.json",
        r#"{ "hummus": { "ingredients": { "chickpeas": 0.5 }, "portions": { "buffet": 0 } } }"#,
    );

    let err = plan(&ingredients, &recipes, 40, "hummus", "").unwrap_err();
    assert!(matches!(err, CateringError::Format(ref detail) if detail.contains("hummus")));
}

#[test]
fn test_negative_price_fails_closed() {
    let (dir, ingredients, recipes) = setup();
    write(
        dir.path(),
        "ingredients.json",
        r#"[
  { "name": "chickpeas", "price": -1.5, "unit": "kg", "shop": "aldi", "last_update": "2024-06-08" },
  { "name": "tahini", "price": 3.0, "unit": "whole", "shop": "aldi", "last_update": "2024-06-08" }
]"#,
    );
    write(
        dir.path(),
        "recipes.json",
        r#"{ "hummus": { "ingredients": { "chickpeas": 0.5, "tahini": 0.1 }, "portions": { "buffet": 10 } } }"#,
    );

    let err = plan(&ingredients, &recipes, 40, "hummus", "").unwrap_err();
    assert!(matches!(err, CateringError::Format(ref detail) if detail.contains("chickpeas")));
}

#[test]
fn test_mixed_case_shops_are_one_errand() {
    let (dir, ingredients, recipes) = setup();
    write(
        dir.path(),
        "ingredients.json",
        r#"[
  { "name": "Chickpeas", "price": 1.5, "unit": "kg", "shop": "Aldi", "last_update": "2024-06-08" },
  { "name": "lemons", "price": 0.3, "unit": "whole", "shop": "Bakery", "last_update": "2024-06-08" },
  { "name": "tahini", "price": 3.0, "unit": "whole", "shop": "aldi", "last_update": "2024-06-08" }
]"#,
    );
    write(
        dir.path(),
        "recipes.json",
        r#"{ "hummus": { "ingredients": { "chickpeas": 0.5, "tahini": 0.1, "lemons": 1 }, "portions": { "buffet": 10 } } }"#,
    );

    let plan = plan(&ingredients, &recipes, 40, "hummus", "").unwrap();
    let shops: Vec<&str> = plan.lines.iter().map(|l| l.shop.as_str()).collect();
    assert_eq!(shops, vec!["aldi", "aldi", "bakery"]);

    let chickpeas = plan.lines.iter().find(|l| l.ingredient == "chickpeas").unwrap();
    assert_eq!(chickpeas.price, 3.0);
}
