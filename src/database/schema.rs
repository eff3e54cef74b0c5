use rust_decimal::Decimal;
use serde::Serialize;

pub type Uuid = i32;

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Public projection of a user, returned by the account endpoints.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

/// Tag as serialized in responses, without the owner column.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct TagRow {
    pub id: Uuid,
    pub name: String,
}

impl From<Tag> for TagRow {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct IngredientRow {
    pub id: Uuid,
    pub name: String,
}

impl From<Ingredient> for IngredientRow {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
}

/// Join-table row used when collecting the tags of many recipes at once.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeTagLink {
    pub recipe_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeIngredientLink {
    pub recipe_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

/// List projection of a recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeRow {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<TagRow>,
    pub ingredients: Vec<IngredientRow>,
}

/// Detail projection. Same as [`RecipeRow`] plus the description.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub description: String,
    pub tags: Vec<TagRow>,
    pub ingredients: Vec<IngredientRow>,
}

impl Recipe {
    pub fn into_row(self, tags: Vec<TagRow>, ingredients: Vec<IngredientRow>) -> RecipeRow {
        RecipeRow {
            id: self.id,
            title: self.title,
            time_minutes: self.time_minutes,
            price: self.price,
            link: self.link,
            tags,
            ingredients,
        }
    }

    pub fn into_detail(self, tags: Vec<TagRow>, ingredients: Vec<IngredientRow>) -> RecipeDetail {
        RecipeDetail {
            id: self.id,
            title: self.title,
            time_minutes: self.time_minutes,
            price: self.price,
            link: self.link,
            description: self.description,
            tags,
            ingredients,
        }
    }
}
