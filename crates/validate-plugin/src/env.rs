// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Where the plugin reads its configuration from.

use std::{borrow::Borrow, collections::HashMap, hash::Hash};

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid env value {env_value} for {env_key}: {message}")]
    InvalidEnum {
        env_key: &'static str,
        env_value: String,
        message: String,
    },
}

/// The process environment.
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of values, for tests and embedding.
impl<K, V> Environment for HashMap<K, V>
where
    K: Borrow<str> + Eq + Hash + Send + Sync,
    V: AsRef<str> + Send + Sync,
{
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|value| value.as_ref().to_string())
    }
}
