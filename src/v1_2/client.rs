/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::api::{HttpTransport, Transport, unpack_envelope};
use crate::v1_2::builder::build;
use crate::v1_2::creds::Credentials;
use crate::v1_2::entities::{
    ACCESS_UPDATER, GROUP, GROUP_UPDATER, PHOTO, PHOTO_SET, PHOTO_SET_UPDATER, PHOTO_UPDATER,
    USER, photosets_mut,
};
use crate::v1_2::errors::ZenfolioError;
use crate::v1_2::macros::{obj_from_call, params, unit_from_call};
use crate::v1_2::object::{ObjectValue, TypedObject};
use crate::v1_2::parsers::to_bytes;
use crate::v1_2::pool::TaskPool;
use crate::v1_2::properties::{
    GroupShiftOrder, PhotoRotation, PhotoSetShiftOrder, PhotoSetType, SortOrder,
};
use crate::v1_2::serialize::pack_params;
use async_stream::try_stream;
use futures::Stream;
use sha2::{Digest, Sha256};
use std::sync::{Arc, RwLock};

/// Anything that identifies a gallery element, photo or group by its numeric id
pub trait ObjectId {
    fn object_id(&self) -> Result<i64, ZenfolioError>;
}

impl ObjectId for i64 {
    fn object_id(&self) -> Result<i64, ZenfolioError> {
        Ok(*self)
    }
}

impl ObjectId for TypedObject {
    fn object_id(&self) -> Result<i64, ZenfolioError> {
        self.id()
    }
}

impl<T: ObjectId + ?Sized> ObjectId for &T {
    fn object_id(&self) -> Result<i64, ZenfolioError> {
        (**self).object_id()
    }
}

/// Password salt and challenge returned by `GetChallenge`
#[derive(Debug, Clone)]
pub struct AuthChallenge {
    pub password_salt: Vec<u8>,
    pub challenge: Vec<u8>,
}

impl AuthChallenge {
    /// `SHA256(challenge + SHA256(salt + password))`
    pub fn proof(&self, password: &str) -> Vec<u8> {
        let salted = Sha256::new()
            .chain_update(&self.password_salt)
            .chain_update(password.as_bytes())
            .finalize();
        Sha256::new()
            .chain_update(&self.challenge)
            .chain_update(salted)
            .finalize()
            .to_vec()
    }
}

struct Session<T> {
    transport: T,
    creds: Credentials,
    token: RwLock<Option<String>>,
}

/// Client for the Zenfolio API.
///
/// Cloning is cheap and clones share the session token.
pub struct Client<T: Transport = HttpTransport> {
    inner: Arc<Session<T>>,
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("creds", &self.inner.creds)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Client {
    /// Creates a client talking to the public Zenfolio endpoint
    pub fn new(creds: Credentials) -> Self {
        Self::with_transport(HttpTransport::new(), creds)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T, creds: Credentials) -> Self {
        Self {
            inner: Arc::new(Session {
                transport,
                creds,
                token: RwLock::new(None),
            }),
        }
    }

    pub fn creds(&self) -> &Credentials {
        &self.inner.creds
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Session token from the last successful authentication
    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.inner.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Invokes a method and builds the object graph from its result.
    ///
    /// The session token is sent when there is one.
    pub async fn call(
        &self,
        method: &str,
        params: Vec<ObjectValue>,
        secure: bool,
    ) -> Result<ObjectValue, ZenfolioError> {
        let token = self.token();
        let body = self
            .inner
            .transport
            .invoke(method, pack_params(&params), token.as_deref(), secure)
            .await?;
        build(&unpack_envelope(body)?)
    }

    /// Runs `op` concurrently for every argument, results in argument order
    pub async fn map<A, R, F, Fut>(
        &self,
        op: F,
        args: impl IntoIterator<Item = A>,
    ) -> Vec<Result<R, ZenfolioError>>
    where
        A: Send + 'static,
        R: Send + 'static,
        F: Fn(Self, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ZenfolioError>> + Send + 'static,
    {
        let client = self.clone();
        TaskPool::unbounded()
            .map(move |arg| op(client.clone(), arg), args)
            .await
    }

    // Authentication

    pub async fn get_challenge(&self) -> Result<AuthChallenge, ZenfolioError> {
        let username = self.creds().require_username()?;
        let resp = self.call("GetChallenge", params![username], false).await?;
        let field = |name: &str| -> Result<Vec<u8>, ZenfolioError> {
            match &resp {
                ObjectValue::Map(map) => map
                    .get(name)
                    .ok_or(ZenfolioError::ResponseMissing)
                    .and_then(to_bytes),
                ObjectValue::Object(obj) => to_bytes(obj.get(name)?),
                _ => Err(ZenfolioError::ResponseMissing),
            }
        };
        Ok(AuthChallenge {
            password_salt: field("PasswordSalt")?,
            challenge: field("Challenge")?,
        })
    }

    /// Challenge-response authentication, the password never leaves the client
    pub async fn authenticate(&self) -> Result<(), ZenfolioError> {
        let password = self.creds().require_password()?;
        let challenge = self.get_challenge().await?;
        let proof = challenge.proof(password);
        let result = self
            .call(
                "Authenticate",
                params![
                    challenge.challenge.iter().map(|b| u32::from(*b)).collect::<Vec<_>>(),
                    proof.iter().map(|b| u32::from(*b)).collect::<Vec<_>>(),
                ],
                true,
            )
            .await;
        self.store_token(result)
    }

    /// Sends the password itself over SSL
    pub async fn authenticate_plain(&self) -> Result<(), ZenfolioError> {
        let username = self.creds().require_username()?;
        let password = self.creds().require_password()?;
        let result = self
            .call("AuthenticatePlain", params![username, password], true)
            .await;
        self.store_token(result)
    }

    fn store_token(&self, result: Result<ObjectValue, ZenfolioError>) -> Result<(), ZenfolioError> {
        match result {
            Ok(ObjectValue::String(token)) => {
                self.set_token(Some(token));
                Ok(())
            }
            Ok(_) => Err(ZenfolioError::ResponseMissing),
            Err(err) => {
                if let ZenfolioError::RemoteCall { code, message } = &err {
                    log::warn!(
                        "Authentication failed code: {:?} and message: {}",
                        code,
                        message
                    );
                }
                Err(err)
            }
        }
    }

    // Loaders

    pub async fn load_photo(&self, photo: impl ObjectId) -> Result<TypedObject, ZenfolioError> {
        obj_from_call!(self, "LoadPhoto", params![photo.object_id()?], PHOTO)
    }

    pub async fn load_photoset(
        &self,
        photoset: impl ObjectId,
    ) -> Result<TypedObject, ZenfolioError> {
        obj_from_call!(self, "LoadPhotoSet", params![photoset.object_id()?], PHOTO_SET)
    }

    pub async fn load_group(&self, group: impl ObjectId) -> Result<TypedObject, ZenfolioError> {
        obj_from_call!(self, "LoadGroup", params![group.object_id()?], GROUP)
    }

    /// Groups and photosets of the user, without photos
    pub async fn load_group_hierarchy(&self) -> Result<TypedObject, ZenfolioError> {
        let username = self.creds().require_username()?;
        obj_from_call!(self, "LoadGroupHierarchy", params![username], GROUP)
    }

    pub async fn load_private_profile(&self) -> Result<TypedObject, ZenfolioError> {
        obj_from_call!(self, "LoadPrivateProfile", params![], USER)
    }

    pub async fn load_public_profile(&self) -> Result<TypedObject, ZenfolioError> {
        let username = self.creds().require_username()?;
        obj_from_call!(self, "LoadPublicProfile", params![username], USER)
    }

    /// Loads the group hierarchy plus every photoset in it.
    ///
    /// The photosets are loaded concurrently and merged into the hierarchy in place.
    pub async fn load_full_group_hierarchy(&self) -> Result<TypedObject, ZenfolioError> {
        let mut hierarchy = self.load_group_hierarchy().await?;
        let mut photosets = photosets_mut(&mut hierarchy)?;
        let ids = photosets
            .iter()
            .map(|photoset| photoset.id())
            .collect::<Result<Vec<_>, _>>()?;

        let loaded = self
            .map(|client, id| async move { client.load_photoset(id).await }, ids)
            .await;
        for (photoset, fresh) in photosets.iter_mut().zip(loaded) {
            photoset.merge(&fresh?)?;
        }
        Ok(hierarchy)
    }

    // Collections

    pub async fn collection_add_photo(
        &self,
        collection: impl ObjectId,
        photo: impl ObjectId,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "CollectionAddPhoto",
            params![collection.object_id()?, photo.object_id()?]
        )
    }

    pub async fn collection_remove_photo(
        &self,
        collection: impl ObjectId,
        photo: impl ObjectId,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "CollectionRemovePhoto",
            params![collection.object_id()?, photo.object_id()?]
        )
    }

    // Creation and deletion

    pub async fn create_group(
        &self,
        parent: impl ObjectId,
        updater: Option<&TypedObject>,
    ) -> Result<TypedObject, ZenfolioError> {
        let updater = updater_or_new(updater, GROUP_UPDATER)?;
        obj_from_call!(
            self,
            "CreateGroup",
            params![parent.object_id()?, updater],
            GROUP
        )
    }

    pub async fn create_photoset(
        &self,
        parent: impl ObjectId,
        photoset_type: PhotoSetType,
        updater: Option<&TypedObject>,
    ) -> Result<TypedObject, ZenfolioError> {
        let updater = updater_or_new(updater, PHOTO_SET_UPDATER)?;
        let photoset_type: &'static str = photoset_type.into();
        obj_from_call!(
            self,
            "CreatePhotoSet",
            params![parent.object_id()?, photoset_type, updater],
            PHOTO_SET
        )
    }

    pub async fn delete_group(&self, group: impl ObjectId) -> Result<(), ZenfolioError> {
        unit_from_call!(self, "DeleteGroup", params![group.object_id()?])
    }

    pub async fn delete_photo(&self, photo: impl ObjectId) -> Result<(), ZenfolioError> {
        unit_from_call!(self, "DeletePhoto", params![photo.object_id()?])
    }

    pub async fn delete_photoset(&self, photoset: impl ObjectId) -> Result<(), ZenfolioError> {
        unit_from_call!(self, "DeletePhotoSet", params![photoset.object_id()?])
    }

    // Listings

    pub async fn get_categories(&self) -> Result<ObjectValue, ZenfolioError> {
        self.call("GetCategories", params![], false).await
    }

    pub async fn get_popular_photos(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<ObjectValue, ZenfolioError> {
        self.call("GetPopularPhotos", params![offset, limit], false)
            .await
    }

    pub async fn get_popular_sets(
        &self,
        photoset_type: PhotoSetType,
        offset: u32,
        limit: u32,
    ) -> Result<ObjectValue, ZenfolioError> {
        let photoset_type: &'static str = photoset_type.into();
        self.call("GetPopularSets", params![photoset_type, offset, limit], false)
            .await
    }

    pub async fn get_recent_photos(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<ObjectValue, ZenfolioError> {
        self.call("GetRecentPhotos", params![offset, limit], false)
            .await
    }

    pub async fn get_recent_sets(
        &self,
        photoset_type: PhotoSetType,
        offset: u32,
        limit: u32,
    ) -> Result<ObjectValue, ZenfolioError> {
        let photoset_type: &'static str = photoset_type.into();
        self.call("GetRecentSets", params![photoset_type, offset, limit], false)
            .await
    }

    /// Adds a realm key to a keyring, returns the updated keyring
    pub async fn keyring_add_key_plain(
        &self,
        keyring: Option<&str>,
        realm_id: i64,
        password: &str,
    ) -> Result<ObjectValue, ZenfolioError> {
        self.call(
            "KeyringAddKeyPlain",
            params![keyring, realm_id, password],
            true,
        )
        .await
    }

    // Moving and ordering

    pub async fn move_group(
        &self,
        group: impl ObjectId,
        dest_group: impl ObjectId,
        index: i64,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "MoveGroup",
            params![group.object_id()?, dest_group.object_id()?, index]
        )
    }

    pub async fn move_photo(
        &self,
        src_set: impl ObjectId,
        photo: impl ObjectId,
        dest_set: impl ObjectId,
        index: i64,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "MovePhoto",
            params![
                src_set.object_id()?,
                photo.object_id()?,
                dest_set.object_id()?,
                index
            ]
        )
    }

    pub async fn move_photoset(
        &self,
        photoset: impl ObjectId,
        dest_group: impl ObjectId,
        index: i64,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "MovePhotoSet",
            params![photoset.object_id()?, dest_group.object_id()?, index]
        )
    }

    pub async fn reorder_group(
        &self,
        group: impl ObjectId,
        order: GroupShiftOrder,
    ) -> Result<(), ZenfolioError> {
        let order: &'static str = order.into();
        unit_from_call!(self, "ReorderGroup", params![group.object_id()?, order])
    }

    pub async fn reorder_photoset(
        &self,
        photoset: impl ObjectId,
        order: PhotoSetShiftOrder,
    ) -> Result<(), ZenfolioError> {
        let order: &'static str = order.into();
        unit_from_call!(self, "ReorderPhotoSet", params![photoset.object_id()?, order])
    }

    // Photo maintenance

    pub async fn replace_photo(
        &self,
        original: impl ObjectId,
        replacement: impl ObjectId,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "ReplacePhoto",
            params![original.object_id()?, replacement.object_id()?]
        )
    }

    pub async fn rotate_photo(
        &self,
        photo: impl ObjectId,
        rotation: PhotoRotation,
    ) -> Result<ObjectValue, ZenfolioError> {
        let rotation: &'static str = rotation.into();
        self.call("RotatePhoto", params![photo.object_id()?, rotation], false)
            .await
    }

    // Searching

    pub async fn search_photo_by_category(
        &self,
        search_id: Option<&str>,
        sort: SortOrder,
        category_code: i64,
        offset: u32,
        limit: u32,
    ) -> Result<ObjectValue, ZenfolioError> {
        let sort = sort.for_category_search()?;
        self.call(
            "SearchPhotoByCategory",
            params![search_id, sort, category_code, offset, limit],
            false,
        )
        .await
    }

    pub async fn search_photo_by_text(
        &self,
        search_id: Option<&str>,
        sort: SortOrder,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<ObjectValue, ZenfolioError> {
        let sort: &'static str = sort.into();
        self.call(
            "SearchPhotoByText",
            params![search_id, sort, query, offset, limit],
            false,
        )
        .await
    }

    pub async fn search_set_by_category(
        &self,
        search_id: Option<&str>,
        photoset_type: PhotoSetType,
        sort: SortOrder,
        category_code: i64,
        offset: u32,
        limit: u32,
    ) -> Result<ObjectValue, ZenfolioError> {
        let sort = sort.for_category_search()?;
        let photoset_type: &'static str = photoset_type.into();
        self.call(
            "SearchSetByCategory",
            params![search_id, photoset_type, sort, category_code, offset, limit],
            false,
        )
        .await
    }

    pub async fn search_set_by_text(
        &self,
        search_id: Option<&str>,
        photoset_type: PhotoSetType,
        sort: SortOrder,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<ObjectValue, ZenfolioError> {
        let sort: &'static str = sort.into();
        let photoset_type: &'static str = photoset_type.into();
        self.call(
            "SearchSetByText",
            params![search_id, photoset_type, sort, query, offset, limit],
            false,
        )
        .await
    }

    /// Streams every photo matching the text query, fetching `page_size` results per call
    pub fn photo_search_stream<'a>(
        &'a self,
        query: &'a str,
        sort: SortOrder,
        page_size: u32,
    ) -> impl Stream<Item = Result<TypedObject, ZenfolioError>> + 'a {
        try_stream! {
            let mut offset: u32 = 0;
            let mut search_id: Option<String> = None;
            loop {
                let page = self
                    .search_photo_by_text(search_id.as_deref(), sort, query, offset, page_size.max(1))
                    .await?;
                let page = SearchPage::from_value(page, "Photos")?;
                if search_id.is_none() {
                    search_id = page.search_id;
                }

                // Paging follows the raw result count, including items that were skipped
                let fetched = u32::try_from(page.received).unwrap_or(u32::MAX);
                for photo in page.items {
                    yield photo;
                }

                offset = offset.saturating_add(fetched);
                if fetched == 0 || u64::from(offset) >= page.total {
                    break;
                }
            }
        }
    }

    // Title photos and featured index

    pub async fn set_group_title_photo(
        &self,
        group: impl ObjectId,
        photo: impl ObjectId,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "SetGroupTitlePhoto",
            params![group.object_id()?, photo.object_id()?]
        )
    }

    pub async fn set_photoset_featured_index(
        &self,
        photoset: impl ObjectId,
        index: i64,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "SetPhotoSetFeaturedIndex",
            params![photoset.object_id()?, index]
        )
    }

    pub async fn set_photoset_title_photo(
        &self,
        photoset: impl ObjectId,
        photo: impl ObjectId,
    ) -> Result<(), ZenfolioError> {
        unit_from_call!(
            self,
            "SetPhotoSetTitlePhoto",
            params![photoset.object_id()?, photo.object_id()?]
        )
    }

    // Updaters

    pub async fn update_group(
        &self,
        group: impl ObjectId,
        updater: &TypedObject,
    ) -> Result<TypedObject, ZenfolioError> {
        ensure_kind(updater, GROUP_UPDATER)?;
        obj_from_call!(
            self,
            "UpdateGroup",
            params![group.object_id()?, updater.clone()],
            GROUP
        )
    }

    pub async fn update_photo(
        &self,
        photo: impl ObjectId,
        updater: &TypedObject,
    ) -> Result<TypedObject, ZenfolioError> {
        ensure_kind(updater, PHOTO_UPDATER)?;
        obj_from_call!(
            self,
            "UpdatePhoto",
            params![photo.object_id()?, updater.clone()],
            PHOTO
        )
    }

    pub async fn update_photoset(
        &self,
        photoset: impl ObjectId,
        updater: &TypedObject,
    ) -> Result<TypedObject, ZenfolioError> {
        ensure_kind(updater, PHOTO_SET_UPDATER)?;
        obj_from_call!(
            self,
            "UpdatePhotoSet",
            params![photoset.object_id()?, updater.clone()],
            PHOTO_SET
        )
    }

    pub async fn update_group_access(
        &self,
        group: impl ObjectId,
        updater: &TypedObject,
    ) -> Result<(), ZenfolioError> {
        ensure_kind(updater, ACCESS_UPDATER)?;
        unit_from_call!(
            self,
            "UpdateGroupAccess",
            params![group.object_id()?, updater.clone()]
        )
    }

    pub async fn update_photo_access(
        &self,
        photo: impl ObjectId,
        updater: &TypedObject,
    ) -> Result<(), ZenfolioError> {
        ensure_kind(updater, ACCESS_UPDATER)?;
        unit_from_call!(
            self,
            "UpdatePhotoAccess",
            params![photo.object_id()?, updater.clone()]
        )
    }

    pub async fn update_photoset_access(
        &self,
        photoset: impl ObjectId,
        updater: &TypedObject,
    ) -> Result<(), ZenfolioError> {
        ensure_kind(updater, ACCESS_UPDATER)?;
        unit_from_call!(
            self,
            "UpdatePhotoSetAccess",
            params![photoset.object_id()?, updater.clone()]
        )
    }
}

pub(crate) fn ensure_kind(obj: &TypedObject, expected: &str) -> Result<(), ZenfolioError> {
    if obj.is_kind_of(expected) {
        Ok(())
    } else {
        Err(ZenfolioError::type_mismatch(expected, obj.tag()))
    }
}

fn updater_or_new(
    updater: Option<&TypedObject>,
    expected: &str,
) -> Result<TypedObject, ZenfolioError> {
    match updater {
        Some(updater) => {
            ensure_kind(updater, expected)?;
            Ok(updater.clone())
        }
        None => TypedObject::new(expected),
    }
}

// One page of a search result
struct SearchPage {
    items: Vec<TypedObject>,
    // Length of the result list before untyped items were dropped
    received: usize,
    total: u64,
    search_id: Option<String>,
}

impl SearchPage {
    fn from_value(value: ObjectValue, items_field: &str) -> Result<Self, ZenfolioError> {
        let ObjectValue::Map(mut map) = value else {
            return Err(ZenfolioError::ResponseMissing);
        };
        let raw = match map.remove(items_field) {
            Some(ObjectValue::List(items)) => items,
            _ => Vec::new(),
        };
        let received = raw.len();
        let items = raw
            .into_iter()
            .filter_map(|item| match item {
                ObjectValue::Object(obj) => Some(obj),
                other => {
                    log::warn!("Skipping untyped {} in {}", other.kind(), items_field);
                    None
                }
            })
            .collect();
        let total = map
            .get("TotalCount")
            .and_then(ObjectValue::as_i64)
            .and_then(|t| u64::try_from(t).ok())
            .unwrap_or(0);
        let search_id = map
            .get("SearchId")
            .and_then(ObjectValue::as_str)
            .map(str::to_string);
        Ok(Self {
            items,
            received,
            total,
            search_id,
        })
    }
}
