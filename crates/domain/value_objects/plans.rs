use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanModel {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub plan_type: String,
    pub price_minor: i64,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub number_of_brands: i32,
    pub number_of_products: i32,
    pub number_of_videos: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanEntity> for PlanModel {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            plan_type: value.plan_type,
            price_minor: value.price_minor,
            description: value.description,
            features: value.features,
            number_of_brands: value.number_of_brands,
            number_of_products: value.number_of_products,
            number_of_videos: value.number_of_videos,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertPlanModel {
    pub title: String,
    #[serde(rename = "type")]
    pub plan_type: String,
    pub price_minor: i64,
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub number_of_brands: i32,
    #[serde(default)]
    pub number_of_products: i32,
    #[serde(default)]
    pub number_of_videos: i32,
    pub stripe_price_id: Option<String>,
}

impl InsertPlanModel {
    /// Returns the first invalid field, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.plan_type.trim().is_empty() {
            return Err("type is required".to_string());
        }
        validate_amounts(
            Some(self.price_minor),
            Some(self.number_of_brands),
            Some(self.number_of_products),
            Some(self.number_of_videos),
        )
    }

    pub fn to_entity(&self) -> InsertPlanEntity {
        InsertPlanEntity {
            title: self.title.trim().to_string(),
            plan_type: self.plan_type.trim().to_string(),
            price_minor: self.price_minor,
            description: self.description.clone(),
            features: serde_json::json!(self.features),
            number_of_brands: self.number_of_brands,
            number_of_products: self.number_of_products,
            number_of_videos: self.number_of_videos,
            stripe_price_id: self.stripe_price_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanModel {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub plan_type: Option<String>,
    pub price_minor: Option<i64>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub number_of_brands: Option<i32>,
    pub number_of_products: Option<i32>,
    pub number_of_videos: Option<i32>,
    pub stripe_price_id: Option<String>,
}

impl UpdatePlanModel {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.title.as_deref(), Some(title) if title.trim().is_empty()) {
            return Err("title must not be empty".to_string());
        }
        validate_amounts(
            self.price_minor,
            self.number_of_brands,
            self.number_of_products,
            self.number_of_videos,
        )
    }

    pub fn to_entity(&self) -> UpdatePlanEntity {
        UpdatePlanEntity {
            title: self.title.as_ref().map(|title| title.trim().to_string()),
            plan_type: self.plan_type.clone(),
            price_minor: self.price_minor,
            description: self.description.clone(),
            features: self.features.as_ref().map(|features| serde_json::json!(features)),
            number_of_brands: self.number_of_brands,
            number_of_products: self.number_of_products,
            number_of_videos: self.number_of_videos,
            stripe_price_id: self.stripe_price_id.clone(),
            updated_at: Some(Utc::now()),
        }
    }
}

fn validate_amounts(
    price_minor: Option<i64>,
    number_of_brands: Option<i32>,
    number_of_products: Option<i32>,
    number_of_videos: Option<i32>,
) -> Result<(), String> {
    if price_minor.is_some_and(|price| price < 0) {
        return Err("price_minor must be >= 0".to_string());
    }
    let quotas = [
        ("number_of_brands", number_of_brands),
        ("number_of_products", number_of_products),
        ("number_of_videos", number_of_videos),
    ];
    for (field, value) in quotas {
        if value.is_some_and(|quota| quota < 0) {
            return Err(format!("{} must be >= 0", field));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_model() -> InsertPlanModel {
        InsertPlanModel {
            title: " Basic Plan ".to_string(),
            plan_type: "monthly".to_string(),
            price_minor: 999,
            description: None,
            features: vec!["Feature 1".to_string()],
            number_of_brands: 5,
            number_of_products: 20,
            number_of_videos: 10,
            stripe_price_id: Some("price_123".to_string()),
        }
    }

    #[test]
    fn rejects_negative_quota() {
        let mut model = insert_model();
        model.number_of_products = -1;

        assert_eq!(
            model.validate(),
            Err("number_of_products must be >= 0".to_string())
        );
    }

    #[test]
    fn insert_entity_trims_title_and_keeps_features_as_json() {
        let model = insert_model();
        assert!(model.validate().is_ok());

        let entity = model.to_entity();
        assert_eq!(entity.title, "Basic Plan");
        assert_eq!(entity.features, serde_json::json!(["Feature 1"]));
    }

    #[test]
    fn update_rejects_blank_title_and_negative_price() {
        let blank = UpdatePlanModel {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        let negative = UpdatePlanModel {
            price_minor: Some(-5),
            ..Default::default()
        };

        assert!(blank.validate().is_err());
        assert!(negative.validate().is_err());
        assert!(UpdatePlanModel::default().validate().is_ok());
    }
}
