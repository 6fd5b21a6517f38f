/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

#[cfg(test)]
mod test {
    use serde_json::json;
    use zenfolio::v1_2::{ObjectValue, SchemaRegistry, ZenfolioError, register_zenfolio_types};

    fn gallery_registry() -> SchemaRegistry {
        let registry = SchemaRegistry::new();
        registry.register("Base", None, &["Id"]).unwrap();
        registry
            .register("Middle", Some("Base"), &["Title", "Views"])
            .unwrap();
        registry.register("Leaf", Some("Middle"), &["Width"]).unwrap();
        registry
    }

    #[test]
    fn effective_fields_are_parent_first() {
        let registry = gallery_registry();
        assert_eq!(registry.effective_fields("Base").unwrap(), vec!["Id"]);
        assert_eq!(
            registry.effective_fields("Leaf").unwrap(),
            vec!["Id", "Title", "Views", "Width"]
        );
        let schema = registry.schema("Leaf").unwrap();
        assert_eq!(schema.declared_fields(), ["Width".to_string()]);
        assert_eq!(schema.parent(), Some("Middle"));
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let registry = gallery_registry();
        let err = registry.register("Leaf", None, &["Other"]).unwrap_err();
        assert!(matches!(err, ZenfolioError::DuplicateTag(tag) if tag == "Leaf"));
    }

    #[test]
    fn unknown_tags() {
        let registry = gallery_registry();
        assert!(matches!(
            registry.effective_fields("Nope"),
            Err(ZenfolioError::UnknownTag(_))
        ));
        assert!(matches!(
            registry.register("Orphan", Some("Missing"), &[]),
            Err(ZenfolioError::UnknownTag(tag)) if tag == "Missing"
        ));
        assert!(!registry.is_registered("Orphan"));
    }

    #[test]
    fn redefined_field_is_rejected() {
        let registry = gallery_registry();
        assert!(matches!(
            registry.register("Clash", Some("Middle"), &["Views"]),
            Err(ZenfolioError::FieldRedefinition { .. })
        ));
        assert!(matches!(
            registry.register("Twice", None, &["A", "A"]),
            Err(ZenfolioError::FieldRedefinition { .. })
        ));
    }

    #[test]
    fn kind_of_follows_parents() {
        let registry = gallery_registry();
        assert!(registry.is_kind_of("Leaf", "Base"));
        assert!(registry.is_kind_of("Leaf", "Leaf"));
        assert!(!registry.is_kind_of("Base", "Leaf"));
        assert!(!registry.is_kind_of("Nope", "Base"));
    }

    #[test]
    fn sealed_registry_rejects_registration() {
        let registry = gallery_registry();
        registry.seal();
        assert!(registry.is_sealed());
        assert!(matches!(
            registry.register("Late", None, &[]),
            Err(ZenfolioError::RegistrySealed(_))
        ));
        // Reads still work
        assert!(registry.is_registered("Leaf"));
    }

    #[test]
    fn zenfolio_types() {
        let registry = SchemaRegistry::new();
        register_zenfolio_types(&registry).unwrap();

        let photo = registry.effective_fields("Photo").unwrap();
        assert_eq!(
            &photo[..6],
            ["Title", "Id", "AccessDescriptor", "Owner", "Caption", "PageUrl"]
        );
        assert!(photo.contains(&"FileHash".to_string()));

        let photoset = registry.effective_fields("PhotoSet").unwrap();
        assert!(photoset.contains(&"TitlePhoto".to_string()));
        assert!(photoset.contains(&"UploadUrl".to_string()));

        let updater = registry.effective_fields("PhotoUpdater").unwrap();
        assert_eq!(
            updater,
            vec!["Title", "Caption", "Keywords", "Categories", "Copyright", "FileName"]
        );
        assert!(registry.is_kind_of("Group", "GalleryElement"));

        // Every effective field list is free of duplicates
        for tag in registry.tags() {
            let fields = registry.effective_fields(&tag).unwrap();
            let mut unique = fields.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), fields.len(), "duplicates in {}", tag);
        }
    }

    #[test]
    fn build_with_own_registry() {
        let registry = gallery_registry();
        let built = registry
            .build(&json!({"$type": "Leaf", "Id": 3, "Width": 640}))
            .unwrap();
        let ObjectValue::Object(leaf) = built else {
            panic!("expected an object");
        };
        assert_eq!(leaf.tag(), "Leaf");
        assert_eq!(leaf.get("Width").unwrap().as_i64(), Some(640));
        assert!(leaf.get("Title").unwrap().is_null());

        // Not registered here, so it stays a plain mapping
        let plain = registry.build(&json!({"$type": "Photo", "Id": 1})).unwrap();
        assert!(plain.as_map().is_some());
    }

    fn album_registry() -> SchemaRegistry {
        let registry = SchemaRegistry::new();
        registry.register("Item", None, &["Id"]).unwrap();
        registry.register("Pic", Some("Item"), &["Views"]).unwrap();
        registry.register("Album", None, &["Title", "Cover"]).unwrap();
        registry
    }

    #[test]
    fn merge_uses_the_building_registry() {
        let registry = album_registry();
        let built = registry
            .build(&json!({"$type": "Album", "Title": "Trip", "Cover": {"$type": "Pic", "Id": 1}}))
            .unwrap();
        let ObjectValue::Object(mut album) = built else {
            panic!("expected an object");
        };
        assert!(album.registry().same_as(&registry));

        album
            .merge(&json!({"Cover": {"$type": "Pic", "Id": 2, "Views": 8}}))
            .unwrap();
        let cover = album.get("Cover").unwrap().as_object().unwrap();
        assert_eq!(cover.id().unwrap(), 2);
        assert_eq!(cover.views(), Some(8));
        assert!(cover.is_kind_of("Item"));

        // A replaced value is built against the same registry
        let mut empty = registry.object("Album", []).unwrap();
        empty
            .merge(&json!({"Cover": {"$type": "Pic", "Id": 3}}))
            .unwrap();
        let cover = empty.get("Cover").unwrap().as_object().unwrap();
        assert_eq!(cover.tag(), "Pic");
        assert!(cover.registry().same_as(&registry));

        // And merging again goes into that object
        empty.merge(&json!({"Cover": {"Views": 4}})).unwrap();
        let cover = empty.get("Cover").unwrap().as_object().unwrap();
        assert_eq!(cover.id().unwrap(), 3);
        assert_eq!(cover.views(), Some(4));
    }

    #[test]
    fn objects_from_json_with_own_registry() {
        let registry = album_registry();
        let album = registry
            .object_from_json("Album", &json!({"Title": "Trip", "Cover": {"$type": "Pic", "Id": 5}}))
            .unwrap();
        assert_eq!(album.title(), Some("Trip"));
        assert!(album.get("Cover").unwrap().as_object().is_some());
        assert!(matches!(
            registry.object_from_json("Photo", &json!({})),
            Err(ZenfolioError::UnknownTag(_))
        ));
        assert!(!album.registry().same_as(SchemaRegistry::global()));
    }

    #[test]
    fn photo_scenario_with_small_schema() {
        let registry = SchemaRegistry::new();
        registry.register("GalleryElement", None, &["Id"]).unwrap();
        registry.register("PhotoSet", None, &["Title", "Views"]).unwrap();
        registry
            .register("Photo", Some("GalleryElement"), &["Title", "Views"])
            .unwrap();

        let (built, violations) = registry
            .build_with_report(&json!({
                "$type": "Photo", "Id": 5, "Title": "x", "Views": 3, "Bogus": 1
            }))
            .unwrap();
        let ObjectValue::Object(photo) = built else {
            panic!("expected an object");
        };
        let fields: Vec<(&str, String)> = photo
            .fields()
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("Id", "5".to_string()),
                ("Title", "x".to_string()),
                ("Views", "3".to_string())
            ]
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].fields, vec!["Bogus".to_string()]);
    }
}
