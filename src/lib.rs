/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Zenfolio
//!
//! This Zenfolio library was created for working with the Zenfolio API 1.2 JSON-RPC interface.
//!
//! For further details on the API refer to the [Zenfolio API Docs](http://www.zenfolio.com/zf/help/api)
//!
//! ## Features
//!
//! - Authentication (challenge-response or plain over SSL)
//! - Loading users, groups, photosets and photos
//!     - Full group hierarchy including every photoset, loaded in parallel
//! - Creating, moving, reordering, updating and deleting groups, photosets and photos
//! - Searching photos and photosets by text or category
//! - Uploading photos into galleries
//! - Dynamic object model
//!     - Responses are built into [`v1_2::TypedObject`] graphs driven by a [`v1_2::SchemaRegistry`]
//!     - Objects can be merged in place with fresh data and serialized back for calls
//! - [`v1_2::TaskPool`] for running calls concurrently
//!
//! *Credentials can be saved to and loaded from a file. The session token is never saved.*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! zenfolio = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use zenfolio::v1_2::{Client, Credentials, GroupElementRef, ZenfolioError, group_elements};
//!
//!async fn print_hierarchy(username: &str) -> Result<(), ZenfolioError> {
//!    // Public data only needs the username
//!    let client = Client::new(Credentials::anonymous(username));
//!
//!    // Groups, photosets and the photos of every photoset
//!    let hierarchy = client.load_full_group_hierarchy().await?;
//!
//!    for element in group_elements(&hierarchy)? {
//!        match element {
//!            GroupElementRef::Group(group) => println!("{}", group),
//!            GroupElementRef::PhotoSet(photoset) => {
//!                println!("{} views: {:?}", photoset, photoset.views())
//!            }
//!        }
//!    }
//!    Ok(())
//!}
//! ```
//!
pub mod v1_2;
