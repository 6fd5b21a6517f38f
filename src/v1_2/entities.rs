/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::datetime::format_timestamp;
use crate::v1_2::errors::ZenfolioError;
use crate::v1_2::object::{ObjectValue, TypedObject};
use crate::v1_2::registry::SchemaRegistry;
use num_enum::{IntoPrimitive, TryFromPrimitive};

pub const DATE_TIME: &str = "DateTime";
pub const UPDATER: &str = "Updater";
pub const ACCESS_UPDATER: &str = "AccessUpdater";
pub const COMMON_UPDATER: &str = "CommonUpdater";
pub const GROUP_UPDATER: &str = "GroupUpdater";
pub const PHOTO_SET_UPDATER: &str = "PhotoSetUpdater";
pub const PHOTO_UPDATER: &str = "PhotoUpdater";
pub const SNAPSHOT: &str = "Snapshot";
pub const USER: &str = "User";
pub const GALLERY_ELEMENT: &str = "GalleryElement";
pub const GROUP_ELEMENT: &str = "GroupElement";
pub const GROUP: &str = "Group";
pub const PHOTO_SET: &str = "PhotoSet";
pub const PHOTO: &str = "Photo";

// Parents always come before their children
const ZENFOLIO_TYPES: &[(&str, Option<&str>, &[&str])] = &[
    (DATE_TIME, None, &["Value"]),
    (UPDATER, None, &[]),
    (
        ACCESS_UPDATER,
        Some(UPDATER),
        &["AccessMask", "AccessType", "Viewers", "Password", "IsDerived"],
    ),
    (COMMON_UPDATER, Some(UPDATER), &["Title", "Caption"]),
    (GROUP_UPDATER, Some(COMMON_UPDATER), &["CustomReference"]),
    (
        PHOTO_SET_UPDATER,
        Some(COMMON_UPDATER),
        &["Keywords", "Categories", "CustomReference"],
    ),
    (
        PHOTO_UPDATER,
        Some(COMMON_UPDATER),
        &["Keywords", "Categories", "Copyright", "FileName"],
    ),
    (SNAPSHOT, None, &[]),
    (
        USER,
        Some(SNAPSHOT),
        &[
            "LoginName",
            "DisplayName",
            "FirstName",
            "LastName",
            "PrimaryEmail",
            "BioPhoto",
            "Bio",
            "Views",
            "GalleryCount",
            "CollectionCount",
            "PhotoCount",
            "PhotoBytes",
            "UserSince",
            "LastUpdated",
            "PublicAddress",
            "PersonalAddress",
            "RecentPhotoSets",
            "FeaturedPhotoSets",
            "RootGroup",
            "ReferralCode",
            "ExpiresOn",
            "Balance",
            "DomainName",
            "StorageQuota",
            "PhotoBytesQuota",
        ],
    ),
    (
        GALLERY_ELEMENT,
        Some(SNAPSHOT),
        &["Title", "Id", "AccessDescriptor", "Owner", "Caption", "PageUrl"],
    ),
    (
        GROUP_ELEMENT,
        Some(GALLERY_ELEMENT),
        &[
            "GroupIndex",
            "CreatedOn",
            "ModifiedOn",
            "PhotoCount",
            "ParentGroups",
            "TitlePhoto",
        ],
    ),
    (
        GROUP,
        Some(GROUP_ELEMENT),
        &["CollectionCount", "SubGroupCount", "GalleryCount", "Elements"],
    ),
    (
        PHOTO_SET,
        Some(GROUP_ELEMENT),
        &[
            "PhotoBytes",
            "Views",
            "Type",
            "FeaturedIndex",
            "IsRandomTitlePhoto",
            "Photos",
            "Keywords",
            "Categories",
            "UploadUrl",
        ],
    ),
    (
        PHOTO,
        Some(GALLERY_ELEMENT),
        &[
            "Width",
            "Height",
            "Sequence",
            "FileName",
            "UploadedOn",
            "TakenOn",
            "Gallery",
            "OriginalUrl",
            "Size",
            "MimeType",
            "PricingKey",
            "Views",
            "UrlCore",
            "Copyright",
            "Rotation",
            "FileHash",
        ],
    ),
];

/// Registers every Zenfolio entity kind into the registry
pub fn register_zenfolio_types(registry: &SchemaRegistry) -> Result<(), ZenfolioError> {
    for (tag, parent, fields) in ZENFOLIO_TYPES {
        registry.register(tag, *parent, fields)?;
    }
    Ok(())
}

/// Element of a group's `Elements` list
#[derive(Debug, Clone, Copy)]
pub enum GroupElementRef<'a> {
    Group(&'a TypedObject),
    PhotoSet(&'a TypedObject),
}

#[derive(Debug)]
pub enum GroupElementMut<'a> {
    Group(&'a mut TypedObject),
    PhotoSet(&'a mut TypedObject),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Group,
    PhotoSet,
    Other,
}

impl ElementKind {
    fn of(obj: &TypedObject) -> Self {
        match obj.tag() {
            GROUP => ElementKind::Group,
            PHOTO_SET => ElementKind::PhotoSet,
            other => {
                log::warn!("Skipping unexpected group element of type {}", other);
                ElementKind::Other
            }
        }
    }
}

/// Groups and photosets contained in a group. Unset `Elements` gives an empty list.
pub fn group_elements(group: &TypedObject) -> Result<Vec<GroupElementRef<'_>>, ZenfolioError> {
    let ObjectValue::List(items) = group.get("Elements")? else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(ObjectValue::as_object)
        .filter_map(|obj| match ElementKind::of(obj) {
            ElementKind::Group => Some(GroupElementRef::Group(obj)),
            ElementKind::PhotoSet => Some(GroupElementRef::PhotoSet(obj)),
            ElementKind::Other => None,
        })
        .collect())
}

pub fn group_elements_mut(
    group: &mut TypedObject,
) -> Result<Vec<GroupElementMut<'_>>, ZenfolioError> {
    let ObjectValue::List(items) = group.get_mut("Elements")? else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter_mut()
        .filter_map(ObjectValue::as_object_mut)
        .filter_map(|obj| match ElementKind::of(obj) {
            ElementKind::Group => Some(GroupElementMut::Group(obj)),
            ElementKind::PhotoSet => Some(GroupElementMut::PhotoSet(obj)),
            ElementKind::Other => None,
        })
        .collect())
}

/// Every photoset in the hierarchy below the group, depth first
pub fn photosets_mut(group: &mut TypedObject) -> Result<Vec<&mut TypedObject>, ZenfolioError> {
    fn collect<'a>(
        group: &'a mut TypedObject,
        out: &mut Vec<&'a mut TypedObject>,
    ) -> Result<(), ZenfolioError> {
        for element in group_elements_mut(group)? {
            match element {
                GroupElementMut::Group(child) => collect(child, out)?,
                GroupElementMut::PhotoSet(photoset) => out.push(photoset),
            }
        }
        Ok(())
    }

    let mut out = Vec::new();
    collect(group, &mut out)?;
    Ok(out)
}

fn find_titled<'a>(
    owner: &'a TypedObject,
    field: &str,
    tag: &str,
    title: &str,
) -> Result<Option<&'a TypedObject>, ZenfolioError> {
    let matches: Vec<&TypedObject> = owner
        .get(field)?
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(ObjectValue::as_object)
        .filter(|obj| obj.tag() == tag && obj.title() == Some(title))
        .collect();
    if matches.len() > 1 {
        log::warn!("More than one {} with title \"{}\"", tag, title);
    }
    Ok(matches.first().copied())
}

/// First sub group of the group with the title
pub fn find_group<'a>(
    group: &'a TypedObject,
    title: &str,
) -> Result<Option<&'a TypedObject>, ZenfolioError> {
    find_titled(group, "Elements", GROUP, title)
}

/// First photoset of the group with the title
pub fn find_photoset<'a>(
    group: &'a TypedObject,
    title: &str,
) -> Result<Option<&'a TypedObject>, ZenfolioError> {
    find_titled(group, "Elements", PHOTO_SET, title)
}

/// First photo of the photoset with the title
pub fn find_photo<'a>(
    photoset: &'a TypedObject,
    title: &str,
) -> Result<Option<&'a TypedObject>, ZenfolioError> {
    find_titled(photoset, "Photos", PHOTO, title)
}

/// Size codes of the resized photo renditions served by Zenfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum PhotoSize {
    ThumbRegular = 0,
    ThumbSquare = 1,
    Small = 2,
    Medium = 3,
    Large = 4,
    XLarge = 5,
    ThumbLarge = 10,
    ProfileLarge = 50,
    ProfileSmall = 51,
    ProfileRegular = 52,
}

/// Download url of a photo rendition. `None` gives the original.
pub fn photo_url(photo: &TypedObject, size: Option<PhotoSize>) -> Result<String, ZenfolioError> {
    let missing = |field: &str| ZenfolioError::MissingField {
        tag: photo.tag().to_string(),
        field: field.to_string(),
    };
    match size {
        None => photo
            .get("OriginalUrl")?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| missing("OriginalUrl")),
        Some(size) => {
            let url_core = photo
                .get("UrlCore")?
                .as_str()
                .ok_or_else(|| missing("UrlCore"))?;
            Ok(format!("www.zenfolio.com{}-{}.jpg", url_core, u8::from(size)))
        }
    }
}

fn display_keys(obj: &TypedObject) -> &'static [&'static str] {
    if obj.is_kind_of(USER) {
        &["LoginName"]
    } else if obj.is_kind_of(PHOTO) {
        &["Title", "FileName", "Id"]
    } else if obj.is_kind_of(GROUP_ELEMENT) {
        &["Title", "Id"]
    } else {
        &["Title"]
    }
}

impl std::fmt::Display for TypedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(ts) = self.timestamp() {
            return write!(f, "{}", format_timestamp(ts));
        }
        if !self.is_kind_of(SNAPSHOT) {
            return write!(f, "<{}>", self.tag());
        }
        let keys: Vec<String> = display_keys(self)
            .iter()
            .map(|key| match self.get(key) {
                Ok(value) => format!("{}: '{}'", key, value),
                Err(_) => format!("{}: 'null'", key),
            })
            .collect();
        write!(f, "<{} snapshot: {}>", self.tag(), keys.join(", "))
    }
}
