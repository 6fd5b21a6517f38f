/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

// These talk to www.zenfolio.com. Run with `--ignored` and credentials in the environment or .env
#[cfg(test)]
mod test {
    use crate::helpers;
    use dotenvy::dotenv;
    use futures::StreamExt;
    use zenfolio::v1_2::{Client, PhotoSetType, SortOrder, photosets_mut};

    fn setup() -> Client {
        dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();
        Client::new(helpers::get_live_creds().unwrap())
    }

    #[tokio::test]
    #[ignore]
    async fn public_profile() {
        let client = setup();
        let user = client.load_public_profile().await.unwrap();
        println!("User info: {}", user);
    }

    #[tokio::test]
    #[ignore]
    async fn group_hierarchy() {
        let client = setup();
        let mut root = client.load_group_hierarchy().await.unwrap();
        for photoset in photosets_mut(&mut root).unwrap() {
            println!("{}", photoset);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore]
    async fn full_group_hierarchy() {
        let client = setup();
        let mut root = client.load_full_group_hierarchy().await.unwrap();
        for photoset in photosets_mut(&mut root).unwrap() {
            let photos = photoset
                .get("Photos")
                .unwrap()
                .as_list()
                .map_or(0, <[_]>::len);
            println!("{} photos: {}", photoset, photos);
        }
    }

    #[tokio::test]
    #[ignore]
    async fn authenticate_and_load_private_profile() {
        let client = setup();
        client.authenticate().await.unwrap();
        let user = client.load_private_profile().await.unwrap();
        println!("Private profile: {:?}", user);
    }

    #[tokio::test]
    #[ignore]
    async fn recent_sets_and_search() {
        let client = setup();
        let sets = client
            .get_recent_sets(PhotoSetType::Gallery, 0, 5)
            .await
            .unwrap();
        println!("Recent sets: {}", sets);

        let photos: Vec<_> = client
            .photo_search_stream("sunset", SortOrder::Popularity, 20)
            .take(30)
            .collect()
            .await;
        println!("Found {} photos", photos.len());
    }
}
