use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::videos;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = videos)]
pub struct VideoEntity {
    pub id: Uuid,
    pub client_id: Uuid,
    pub url: String,
    pub text: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub avatar_id: Option<String>,
    pub avatar_type: Option<String>,
    pub sound_tone: Option<String>,
    pub emotion: Option<String>,
    pub product_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = videos)]
pub struct InsertVideoEntity {
    pub client_id: Uuid,
    pub url: String,
    pub text: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub avatar_id: Option<String>,
    pub avatar_type: Option<String>,
    pub sound_tone: Option<String>,
    pub emotion: Option<String>,
    pub product_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = videos)]
pub struct UpdateVideoEntity {
    pub url: Option<String>,
    pub text: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub avatar_id: Option<String>,
    pub avatar_type: Option<String>,
    pub sound_tone: Option<String>,
    pub emotion: Option<String>,
    pub product_type: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
