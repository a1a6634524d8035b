use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::brands::{BrandEntity, InsertBrandEntity, UpdateBrandEntity};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BrandModel {
    pub id: Uuid,
    pub client_id: Uuid,
    #[serde(rename = "type")]
    pub brand_type: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BrandEntity> for BrandModel {
    fn from(entity: BrandEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            brand_type: entity.brand_type,
            title: entity.title,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertBrandModel {
    #[serde(rename = "type")]
    pub brand_type: String,
    pub title: String,
    pub description: Option<String>,
}

impl InsertBrandModel {
    pub fn validate(&self) -> Result<(), String> {
        if self.brand_type.trim().is_empty() {
            return Err("type is required".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        Ok(())
    }

    pub fn to_entity(&self, client_id: Uuid) -> InsertBrandEntity {
        InsertBrandEntity {
            client_id,
            brand_type: self.brand_type.trim().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBrandModel {
    #[serde(rename = "type")]
    pub brand_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateBrandModel {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.brand_type.as_deref(), Some(brand_type) if brand_type.trim().is_empty()) {
            return Err("type must not be empty".to_string());
        }
        if matches!(self.title.as_deref(), Some(title) if title.trim().is_empty()) {
            return Err("title must not be empty".to_string());
        }
        Ok(())
    }

    pub fn to_entity(&self) -> UpdateBrandEntity {
        UpdateBrandEntity {
            brand_type: self.brand_type.as_ref().map(|brand_type| brand_type.trim().to_string()),
            title: self.title.as_ref().map(|title| title.trim().to_string()),
            description: self.description.clone(),
            updated_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_rejects_blank_fields() {
        let blank_title = UpdateBrandModel {
            title: Some("".to_string()),
            ..Default::default()
        };
        let blank_type = UpdateBrandModel {
            brand_type: Some(" ".to_string()),
            ..Default::default()
        };

        assert!(blank_title.validate().is_err());
        assert!(blank_type.validate().is_err());
        assert!(UpdateBrandModel::default().validate().is_ok());
    }

    #[test]
    fn update_trims_title() {
        let model = UpdateBrandModel {
            title: Some("  Acme  ".to_string()),
            ..Default::default()
        };

        assert_eq!(model.to_entity().title.as_deref(), Some("Acme"));
    }
}
