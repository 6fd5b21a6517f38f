/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::api::Transport;
use crate::v1_2::client::{Client, ensure_kind};
use crate::v1_2::entities::{PHOTO_SET, PHOTO_UPDATER};
use crate::v1_2::errors::ZenfolioError;
use crate::v1_2::object::TypedObject;
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// How the uploaded file's name appears on Zenfolio (zipped downloads, metadata...)
#[derive(Debug, Clone, Default)]
pub enum UploadName {
    /// File name without any directories
    #[default]
    Basename,
    /// Path relative to the given root
    RelativeTo(PathBuf),
    /// Path exactly as given
    Full,
}

#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub name: UploadName,
    /// Fills in `Title` and `FileName` of the updater when they are unset
    pub auto_fill: bool,
    /// `PhotoUpdater` applied to the new photo
    pub updater: Option<TypedObject>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            name: UploadName::Basename,
            auto_fill: true,
            updater: None,
        }
    }
}

fn upload_name(path: &Path, name: &UploadName) -> Result<String, ZenfolioError> {
    let invalid = || ZenfolioError::InvalidParameter(format!("bad upload path {}", path.display()));
    match name {
        UploadName::Basename => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(invalid),
        UploadName::RelativeTo(root) => path
            .strip_prefix(root)
            .map(|p| p.to_string_lossy().into_owned())
            .map_err(|_| invalid()),
        UploadName::Full => Ok(path.to_string_lossy().into_owned()),
    }
}

impl<T: Transport> Client<T> {
    /// Uploads a photo file into a gallery and applies the updater to the new photo.
    ///
    /// Requires an authenticated session. Returns the updated photo.
    pub async fn upload(
        &self,
        photoset: &TypedObject,
        path: impl AsRef<Path>,
        options: UploadOptions,
    ) -> Result<TypedObject, ZenfolioError> {
        let path = path.as_ref();
        ensure_kind(photoset, PHOTO_SET)?;
        if photoset.get("Type")?.as_str() != Some("Gallery") {
            return Err(ZenfolioError::NotAGallery(photoset.to_string()));
        }
        let token = self.token().ok_or(ZenfolioError::NotAuthenticated)?;
        let upload_url = photoset
            .get("UploadUrl")?
            .as_str()
            .ok_or_else(|| ZenfolioError::MissingField {
                tag: photoset.tag().to_string(),
                field: "UploadUrl".to_string(),
            })?;

        let file_name = upload_name(path, &options.name)?;
        let mut req_url = url::Url::parse(upload_url)?;
        req_url.query_pairs_mut().append_pair("filename", &file_name);
        let data = Bytes::from(tokio::fs::read(path).await?);

        let photo_id = self
            .transport()
            .upload(&req_url, data, &token)
            .await?
            .as_i64()
            .ok_or(ZenfolioError::ResponseMissing)?;

        let mut updater = match options.updater {
            Some(updater) => updater,
            None => TypedObject::new(PHOTO_UPDATER)?,
        };
        ensure_kind(&updater, PHOTO_UPDATER)?;
        if options.auto_fill {
            updater.set_if_unset("Title", upload_name(path, &UploadName::Basename)?)?;
            updater.set_if_unset("FileName", file_name)?;
        }
        self.update_photo(photo_id, &updater).await
    }
}
