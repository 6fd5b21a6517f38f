/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::entities::ACCESS_UPDATER;
use crate::v1_2::errors::ZenfolioError;
use crate::v1_2::object::TypedObject;
use strum_macros::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum PhotoSetType {
    Gallery,
    Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum GroupShiftOrder {
    CreatedAsc,
    CreatedDesc,
    ModifiedAsc,
    ModifiedDesc,
    TitleAsc,
    TitleDesc,
    GroupsTop,
    GroupsBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum PhotoSetShiftOrder {
    CreatedAsc,
    CreatedDesc,
    TakenAsc,
    TakenDesc,
    TitleAsc,
    TitleDesc,
    SizeAsc,
    SizeDesc,
    FileNameAsc,
    FileNameDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum PhotoRotation {
    None,
    Rotate90,
    Rotate180,
    Rotate270,
    Flip,
    Rotate90Flip,
    Rotate180Flip,
    Rotate270Flip,
}

/// Search result ordering. `Rank` only applies to text searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum SortOrder {
    Date,
    Popularity,
    Rank,
}

impl SortOrder {
    pub(crate) fn for_category_search(self) -> Result<&'static str, ZenfolioError> {
        match self {
            SortOrder::Rank => Err(ZenfolioError::InvalidParameter(
                "Rank sort order does not apply to category searches".to_string(),
            )),
            other => Ok(other.into()),
        }
    }
}

/// See <http://www.zenfolio.com/zf/help/api/ref/objects/accessmask>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum AccessMask {
    None,
    HideDateCreated,
    HideDateModified,
    HideDateTaken,
    HideMetaData,
    HideUserStats,
    HideVisits,
    NoCollections,
    NoPrivateSearch,
    NoPublicSearch,
    NoRecentList,
    ProtectExif,
    ProtectExtraLarge,
    ProtectLarge,
    ProtectMedium,
    ProtectOriginals,
    ProtectGuestbook,
    NoPublicGuestbookPosts,
    NoPrivateGuestbookPosts,
    NoAnonymousGuestbookPosts,
    ProtectComments,
    NoPublicComments,
    NoPrivateComments,
    NoAnonymousComments,
    ProtectAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum AccessType {
    Private,
    Public,
    UserList,
    Password,
}

/// Builds an `AccessUpdater` for the access type and mask flags
pub fn access_updater(
    access_type: AccessType,
    masks: &[AccessMask],
) -> Result<TypedObject, ZenfolioError> {
    let mut updater = TypedObject::new(ACCESS_UPDATER)?;
    let access_type: &'static str = access_type.into();
    updater.set("AccessType", access_type)?;
    if !masks.is_empty() {
        let masks: Vec<&'static str> = masks.iter().map(|m| (*m).into()).collect();
        updater.set("AccessMask", masks.join(", "))?;
    }
    Ok(updater)
}
