/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod api;
pub mod builder;
pub mod client;
pub mod creds;
pub mod datetime;
pub mod entities;
pub mod errors;
mod macros;
pub mod merge;
pub mod object;
mod parsers;
pub mod pool;
pub mod properties;
pub mod registry;
pub mod serialize;
pub mod upload;

pub use api::*;
pub use builder::*;
pub use client::*;
pub use creds::*;
pub use datetime::*;
pub use entities::*;
pub use errors::*;
pub use merge::*;
pub use object::*;
pub use pool::*;
pub use properties::*;
pub use registry::*;
pub use serialize::*;
pub use upload::*;
