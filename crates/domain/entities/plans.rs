use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::plans;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntity {
    pub id: Uuid,
    pub title: String,
    pub plan_type: String,
    pub price_minor: i64,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub number_of_brands: i32,
    pub number_of_products: i32,
    pub number_of_videos: i32,
    pub stripe_price_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanEntity {
    pub fn is_free(&self) -> bool {
        self.price_minor == 0
    }
}

/// Raw row used for Diesel queries. Features stay as JSON and are parsed into a list of labels.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub title: String,
    pub plan_type: String,
    pub price_minor: i64,
    pub description: Option<String>,
    pub features: serde_json::Value,
    pub number_of_brands: i32,
    pub number_of_products: i32,
    pub number_of_videos: i32,
    pub stripe_price_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let features = serde_json::from_value(value.features).unwrap_or_default();

        Self {
            id: value.id,
            title: value.title,
            plan_type: value.plan_type,
            price_minor: value.price_minor,
            description: value.description,
            features,
            number_of_brands: value.number_of_brands,
            number_of_products: value.number_of_products,
            number_of_videos: value.number_of_videos,
            stripe_price_id: value.stripe_price_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct InsertPlanEntity {
    pub title: String,
    pub plan_type: String,
    pub price_minor: i64,
    pub description: Option<String>,
    pub features: serde_json::Value,
    pub number_of_brands: i32,
    pub number_of_products: i32,
    pub number_of_videos: i32,
    pub stripe_price_id: Option<String>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = plans)]
pub struct UpdatePlanEntity {
    pub title: Option<String>,
    pub plan_type: Option<String>,
    pub price_minor: Option<i64>,
    pub description: Option<String>,
    pub features: Option<serde_json::Value>,
    pub number_of_brands: Option<i32>,
    pub number_of_products: Option<i32>,
    pub number_of_videos: Option<i32>,
    pub stripe_price_id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
