use rust_decimal::Decimal;
use serde::Deserialize;

use crate::constants::{PRICE_DECIMAL_PLACES, PRICE_MAX_DIGITS};

use super::error::{ApiError, FieldErrors};

/// Tag descriptor in a recipe payload. Resolution against existing rows is
/// keyed on (owner, name), see `actions::tags::resolve_or_create_tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagInput {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /recipes`. Tag and ingredient lists default to empty when
/// omitted; there is deliberately no owner field, the authenticated session
/// decides ownership.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<TagInput>,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
}

/// Body of `PUT /recipes/{id}`: every scalar field is mandatory at the
/// transport layer. The service underneath only sees [`RecipePatch`].
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeUpdate {
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Option<Vec<TagInput>>,
    pub ingredients: Option<Vec<IngredientInput>>,
}

/// Body of `PATCH /recipes/{id}`. `None` means the field was absent from the
/// request and must be left untouched. For `tags` and `ingredients` this is
/// the load-bearing distinction: `Some(vec![])` clears the association,
/// `None` preserves it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<TagInput>>,
    pub ingredients: Option<Vec<IngredientInput>>,
}

impl From<RecipeUpdate> for RecipePatch {
    fn from(update: RecipeUpdate) -> Self {
        Self {
            title: Some(update.title),
            description: Some(update.description),
            time_minutes: Some(update.time_minutes),
            price: Some(update.price),
            link: Some(update.link),
            tags: update.tags,
            ingredients: update.ingredients,
        }
    }
}

/// Body of `PATCH /tags/{id}` and `PATCH /ingredients/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamePatch {
    pub name: String,
}

fn check_title(errors: &mut FieldErrors, title: &str) {
    if title.trim().is_empty() {
        errors.push("title", "must not be empty");
    }
}

fn check_time_minutes(errors: &mut FieldErrors, time_minutes: i32) {
    if time_minutes < 0 {
        errors.push("time_minutes", "must not be negative");
    }
}

fn check_price(errors: &mut FieldErrors, price: &Decimal) {
    let price = price.normalize();
    if price.scale() > PRICE_DECIMAL_PLACES {
        errors.push("price", "no more than 2 decimal places");
    }
    let integral_limit = Decimal::from(10i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
    if price.abs() >= integral_limit {
        errors.push("price", "no more than 5 digits in total");
    }
}

fn check_tag_names(errors: &mut FieldErrors, tags: &[TagInput]) {
    if tags.iter().any(|tag| tag.name.trim().is_empty()) {
        errors.push("tags", "tag name must not be empty");
    }
}

fn check_ingredient_names(errors: &mut FieldErrors, ingredients: &[IngredientInput]) {
    if ingredients
        .iter()
        .any(|ingredient| ingredient.name.trim().is_empty())
    {
        errors.push("ingredients", "ingredient name must not be empty");
    }
}

impl NewRecipe {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_title(&mut errors, &self.title);
        check_time_minutes(&mut errors, self.time_minutes);
        check_price(&mut errors, &self.price);
        check_tag_names(&mut errors, &self.tags);
        check_ingredient_names(&mut errors, &self.ingredients);
        errors.into_result()
    }
}

impl RecipePatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }
        if let Some(time_minutes) = self.time_minutes {
            check_time_minutes(&mut errors, time_minutes);
        }
        if let Some(price) = &self.price {
            check_price(&mut errors, price);
        }
        if let Some(tags) = &self.tags {
            check_tag_names(&mut errors, tags);
        }
        if let Some(ingredients) = &self.ingredients {
            check_ingredient_names(&mut errors, ingredients);
        }
        errors.into_result()
    }
}

impl NamePatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("name", "must not be empty"));
        }
        Ok(())
    }
}
