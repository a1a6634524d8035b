use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::videos::{InsertVideoEntity, UpdateVideoEntity, VideoEntity},
    value_objects::enums::video_statuses::VideoStatus,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoModel {
    pub id: Uuid,
    pub client_id: Uuid,
    pub url: String,
    pub text: Option<String>,
    pub description: Option<String>,
    pub status: VideoStatus,
    pub avatar_id: Option<String>,
    pub avatar_type: Option<String>,
    pub sound_tone: Option<String>,
    pub emotion: Option<String>,
    pub product_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoEntity> for VideoModel {
    fn from(entity: VideoEntity) -> Self {
        Self {
            id: entity.id,
            client_id: entity.client_id,
            url: entity.url,
            text: entity.text,
            description: entity.description,
            status: VideoStatus::from_str(&entity.status),
            avatar_id: entity.avatar_id,
            avatar_type: entity.avatar_type,
            sound_tone: entity.sound_tone,
            emotion: entity.emotion,
            product_type: entity.product_type,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertVideoModel {
    pub url: String,
    pub text: Option<String>,
    pub description: Option<String>,
    pub avatar_id: Option<String>,
    pub avatar_type: Option<String>,
    pub sound_tone: Option<String>,
    pub emotion: Option<String>,
    pub product_type: Option<String>,
}

impl InsertVideoModel {
    /// New videos always start `pending`, whatever the request says.
    pub fn to_entity(&self, client_id: Uuid) -> InsertVideoEntity {
        InsertVideoEntity {
            client_id,
            url: self.url.trim().to_string(),
            text: self.text.clone(),
            description: self.description.clone(),
            status: VideoStatus::Pending.to_string(),
            avatar_id: self.avatar_id.clone(),
            avatar_type: self.avatar_type.clone(),
            sound_tone: self.sound_tone.clone(),
            emotion: self.emotion.clone(),
            product_type: self.product_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVideoModel {
    pub url: Option<String>,
    pub text: Option<String>,
    pub description: Option<String>,
    pub status: Option<VideoStatus>,
    pub avatar_id: Option<String>,
    pub avatar_type: Option<String>,
    pub sound_tone: Option<String>,
    pub emotion: Option<String>,
    pub product_type: Option<String>,
}

impl UpdateVideoModel {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.url.as_deref(), Some(url) if url.trim().is_empty()) {
            return Err("url must not be empty".to_string());
        }
        Ok(())
    }

    pub fn to_entity(&self) -> UpdateVideoEntity {
        UpdateVideoEntity {
            url: self.url.as_ref().map(|url| url.trim().to_string()),
            text: self.text.clone(),
            description: self.description.clone(),
            status: self.status.map(|status| status.to_string()),
            avatar_id: self.avatar_id.clone(),
            avatar_type: self.avatar_type.clone(),
            sound_tone: self.sound_tone.clone(),
            emotion: self.emotion.clone(),
            product_type: self.product_type.clone(),
            updated_at: Some(Utc::now()),
        }
    }
}
