use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum CateringError {
    /// Recipe missing from the catalog
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),
    /// Recipe has no portion size for the requested event type
    #[error("Event type '{event_type}' not found for recipe '{recipe}'")]
    EventTypeNotFound { recipe: String, event_type: String },
    /// Ingredient missing from the price list
    #[error("Ingredient not found in price list: {ingredient}{}", used_by(.recipe))]
    IngredientNotFound {
        ingredient: String,
        recipe: Option<String>,
    },
    /// Override targets a recipe that is not part of the request
    #[error("Unknown recipe in overrides: {0}")]
    UnknownRecipe(String),
    /// Malformed input or record value
    #[error("Format error: {0}")]
    Format(String),
    /// Same ingredient resolved to different unit or shop
    #[error("Data consistency error for '{ingredient}': {detail}")]
    DataConsistency { ingredient: String, detail: String },
    /// Duplicate key on insert
    #[error("{0} already exists")]
    AlreadyExists(String),
    /// Store write guard could not be taken
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// HTTP request error from a price feed
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    /// Price feed answered with a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

impl CateringError {
    /// Stable name used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound(_) => "recipe_not_found",
            Self::EventTypeNotFound { .. } => "event_type_not_found",
            Self::IngredientNotFound { .. } => "ingredient_not_found",
            Self::UnknownRecipe(_) => "unknown_recipe",
            Self::Format(_) => "format_error",
            Self::DataConsistency { .. } => "data_consistency_error",
            Self::AlreadyExists(_) => "already_exists",
            Self::Lock(_) => "lock_error",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::Http(_) => "http_request_error",
            Self::Upstream { .. } => "upstream_error",
        }
    }

    /// True for the lookup failures of the pipeline (recipe, event type, ingredient)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RecipeNotFound(_) | Self::EventTypeNotFound { .. } | Self::IngredientNotFound { .. }
        )
    }
}

fn used_by(recipe: &Option<String>) -> String {
    match recipe {
        Some(recipe) => format!(" (used by '{}')", recipe),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, CateringError>;
