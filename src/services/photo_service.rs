use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::validation::{require, Violations};
use super::ServiceError;
use crate::database::models::{Photo, PhotoFields, PhotoWithOwner};
use crate::database::repositories::photos::PHOTO_NOT_FOUND;
use crate::database::repositories::PhotoRepository;

/// Body of photo create and edit requests
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub photo_url: String,
}

impl PhotoRequest {
    fn into_fields(self) -> Result<PhotoFields, ServiceError> {
        let mut violations = Violations::new();
        violations.check(require("title", &self.title));
        violations.check(require("photo_url", &self.photo_url));
        violations.into_result()?;

        Ok(PhotoFields {
            title: self.title,
            caption: self.caption,
            photo_url: self.photo_url,
        })
    }
}

#[derive(Clone)]
pub struct PhotoService {
    photos: Arc<dyn PhotoRepository>,
}

impl PhotoService {
    pub fn new(photos: Arc<dyn PhotoRepository>) -> Self {
        Self { photos }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<PhotoWithOwner>, ServiceError> {
        Ok(self.photos.list_by_owner(user_id).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Photo, ServiceError> {
        self.photos
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(PHOTO_NOT_FOUND))
    }

    pub async fn create(&self, user_id: i64, req: PhotoRequest) -> Result<Photo, ServiceError> {
        let fields = req.into_fields()?;
        let photo = self.photos.create(user_id, fields).await?;
        info!("User {} created photo {}", user_id, photo.id);
        Ok(photo)
    }

    pub async fn edit(&self, id: i64, req: PhotoRequest) -> Result<Photo, ServiceError> {
        let fields = req.into_fields()?;
        Ok(self.photos.update(id, fields).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.photos.delete(id).await?;
        info!("Deleted photo {}", id);
        Ok(())
    }
}
