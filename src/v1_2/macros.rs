/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

// Collects call parameters into a Vec<ObjectValue>
macro_rules! params {
    ( $( $p:expr ),* $(,)? ) => {
        vec![ $( $crate::v1_2::ObjectValue::from($p) ),* ]
    };
}

// Calls a loader style method and unwraps the expected object kind
macro_rules! obj_from_call {
    ( $c:expr, $method:expr, $params:expr, $tag:expr ) => {{
        $c.call($method, $params, false).await?.into_object($tag)
    }};
}

// Calls a method whose result is not needed
macro_rules! unit_from_call {
    ( $c:expr, $method:expr, $params:expr ) => {{
        $c.call($method, $params, false).await.map(|_| ())
    }};
}

pub(crate) use {obj_from_call, params, unit_from_call};
