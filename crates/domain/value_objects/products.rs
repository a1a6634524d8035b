use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::products::{InsertProductEntity, ProductEntity, UpdateProductEntity};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductModel {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductEntity> for ProductModel {
    fn from(entity: ProductEntity) -> Self {
        Self {
            id: entity.id,
            brand_id: entity.brand_id,
            title: entity.title,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertProductModel {
    #[serde(alias = "brand")]
    pub brand_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

impl InsertProductModel {
    pub fn to_entity(&self) -> InsertProductEntity {
        InsertProductEntity {
            brand_id: self.brand_id,
            title: self.title.trim().to_string(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductModel {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateProductModel {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.title.as_deref(), Some(title) if title.trim().is_empty()) {
            return Err("title must not be empty".to_string());
        }
        Ok(())
    }

    pub fn to_entity(&self) -> UpdateProductEntity {
        UpdateProductEntity {
            title: self.title.as_ref().map(|title| title.trim().to_string()),
            description: self.description.clone(),
            updated_at: Some(Utc::now()),
        }
    }
}
