use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::validation::{require, Violations};
use super::ServiceError;
use crate::database::models::{SocialMedia, SocialMediaFields, SocialMediaWithOwner};
use crate::database::repositories::social_media::SOCIAL_MEDIA_NOT_FOUND;
use crate::database::repositories::SocialMediaRepository;

#[derive(Debug, Clone, Deserialize)]
pub struct SocialMediaRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub social_media_url: String,
}

impl SocialMediaRequest {
    fn into_fields(self) -> Result<SocialMediaFields, ServiceError> {
        let mut violations = Violations::new();
        violations.check(require("name", &self.name));
        violations.check(require("social_media_url", &self.social_media_url));
        violations.into_result()?;

        Ok(SocialMediaFields {
            name: self.name,
            social_media_url: self.social_media_url,
        })
    }
}

#[derive(Clone)]
pub struct SocialMediaService {
    social_media: Arc<dyn SocialMediaRepository>,
}

impl SocialMediaService {
    pub fn new(social_media: Arc<dyn SocialMediaRepository>) -> Self {
        Self { social_media }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<SocialMediaWithOwner>, ServiceError> {
        Ok(self.social_media.list_by_owner(user_id).await?)
    }

    pub async fn get(&self, id: i64) -> Result<SocialMedia, ServiceError> {
        self.social_media
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(SOCIAL_MEDIA_NOT_FOUND))
    }

    pub async fn create(&self, user_id: i64, req: SocialMediaRequest) -> Result<SocialMedia, ServiceError> {
        let fields = req.into_fields()?;
        let created = self.social_media.create(user_id, fields).await?;
        info!("User {} added social media {}", user_id, created.id);
        Ok(created)
    }

    pub async fn edit(&self, id: i64, req: SocialMediaRequest) -> Result<SocialMedia, ServiceError> {
        let fields = req.into_fields()?;
        Ok(self.social_media.update(id, fields).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.social_media.delete(id).await?;
        info!("Deleted social media {}", id);
        Ok(())
    }
}
