/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate zenfolio;

use anyhow::Result;
use dotenvy::dotenv;
use std::time::Instant;
use zenfolio::v1_2::{
    Client, Credentials, GroupElementMut, Job, TaskPool, TypedObject, group_elements_mut, job,
};

// Sets the title photo of every photoset and group to its most viewed photo. Existing title
// photos are overwritten.

fn title_photo_id(element: &TypedObject) -> Option<i64> {
    element
        .get("TitlePhoto")
        .ok()
        .and_then(|v| v.as_object())
        .and_then(|photo| photo.id().ok())
}

fn most_viewed<'a>(
    candidates: impl Iterator<Item = (i64, &'a TypedObject)>,
) -> Option<(i64, &'a TypedObject)> {
    candidates.max_by_key(|(views, _)| *views)
}

fn update_photoset(
    client: &Client,
    photoset: &mut TypedObject,
    jobs: &mut Vec<Job>,
) -> Result<()> {
    let best = most_viewed(
        photoset
            .get("Photos")?
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(|p| p.as_object())
            .map(|photo| (photo.views().unwrap_or(0), photo)),
    )
    .map(|(_, photo)| photo.clone());

    let Some(photo) = best else {
        return Ok(());
    };
    let photo_id = photo.id()?;
    if title_photo_id(photoset) != Some(photo_id) {
        let photoset_id = photoset.id()?;
        photoset.set("TitlePhoto", photo)?;
        let client = client.clone();
        jobs.push(job(async move {
            client.set_photoset_title_photo(photoset_id, photo_id).await
        }));
    }
    Ok(())
}

// Returns the view count of the group's most viewed element
fn update_group(
    client: &Client,
    group: &mut TypedObject,
    jobs: &mut Vec<Job>,
) -> Result<Option<i64>> {
    let mut candidates: Vec<(i64, TypedObject)> = Vec::new();
    for element in group_elements_mut(group)? {
        let (views, element) = match element {
            GroupElementMut::Group(child) => match update_group(client, child, jobs)? {
                Some(views) => (views, child),
                None => continue,
            },
            GroupElementMut::PhotoSet(photoset) => {
                update_photoset(client, photoset, jobs)?;
                (photoset.views().unwrap_or(0), photoset)
            }
        };
        if let Some(title_photo) = element.get("TitlePhoto")?.as_object() {
            candidates.push((views, title_photo.clone()));
        }
    }

    let Some((views, photo)) = most_viewed(candidates.iter().map(|(v, p)| (*v, p))) else {
        return Ok(None);
    };
    let photo_id = photo.id()?;
    if title_photo_id(group) != Some(photo_id) {
        println!("Group {}, popular is {} with {} views", group, photo, views);
        let group_id = group.id()?;
        group.set("TitlePhoto", photo.clone())?;
        let client = client.clone();
        jobs.push(job(async move {
            client.set_group_title_photo(group_id, photo_id).await
        }));
    }
    Ok(Some(views))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    let username = std::env::var("ZENFOLIO_USERNAME")?;
    let password = std::env::var("ZENFOLIO_PASSWORD")?;
    let client = Client::new(Credentials::new(&username, &password));

    println!("Loading album hierarchy...");
    let started = Instant::now();
    // Loaded before authenticating so only public photos are considered
    let mut hierarchy = client.load_full_group_hierarchy().await?;
    println!("Loaded in {} seconds.", started.elapsed().as_secs());
    client.authenticate().await?;

    println!("Updating...");
    let started = Instant::now();
    let mut jobs = Vec::new();
    update_group(&client, &mut hierarchy, &mut jobs)?;
    let summary = TaskPool::with_workers(10).run(jobs).await;
    println!(
        "Done in {} seconds. Updated: {} Failed: {}",
        started.elapsed().as_secs(),
        summary.completed,
        summary.failures.len()
    );
    Ok(())
}
