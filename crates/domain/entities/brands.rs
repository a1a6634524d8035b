use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::brands;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = brands)]
pub struct BrandEntity {
    pub id: Uuid,
    pub client_id: Uuid,
    pub brand_type: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = brands)]
pub struct InsertBrandEntity {
    pub client_id: Uuid,
    pub brand_type: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = brands)]
pub struct UpdateBrandEntity {
    pub brand_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
