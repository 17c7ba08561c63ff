// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub website: String,
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i64,
    pub website: String,
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),
}

/// The users known to the example, kept in memory.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    pub fn seeded() -> Self {
        Self::new(vec![User {
            id: 1,
            name: "Test".to_string(),
            email: "test@test.com".to_string(),
            age: 30,
            website: "https://website.com".to_string(),
            secret: "s3cr3t".to_string(),
        }])
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn find(&self, id: i64) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned()
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.iter().any(|user| user.email == new_user.email) {
            return Err(StoreError::DuplicateEmail(new_user.email));
        }

        let user = User {
            id: users.iter().map(|user| user.id).max().unwrap_or(0) + 1,
            name: new_user.name,
            email: new_user.email,
            age: new_user.age,
            website: new_user.website,
            secret: new_user.secret,
        };
        users.push(user.clone());

        Ok(user)
    }

    pub async fn update(&self, update: UserUpdate) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if let Some(email) = &update.email
            && users
                .iter()
                .any(|user| user.id != update.id && &user.email == email)
        {
            return Err(StoreError::DuplicateEmail(email.clone()));
        }

        let user = users
            .iter_mut()
            .find(|user| user.id == update.id)
            .ok_or(StoreError::UserNotFound(update.id))?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }

        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alex".to_string(),
            email: email.to_string(),
            age: 21,
            website: "https://alex.dev".to_string(),
            secret: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_next_id() {
        let store = UserStore::seeded();

        let user = store.create(new_user("alex@example.com")).await.unwrap();

        assert_eq!(user.id, 2);
        assert_eq!(store.list().await.len(), 2);
        assert_eq!(store.find_by_email("alex@example.com").await, Some(user));
    }

    #[tokio::test]
    async fn emails_are_unique() {
        let store = UserStore::seeded();

        assert_eq!(
            store.create(new_user("test@test.com")).await,
            Err(StoreError::DuplicateEmail("test@test.com".to_string()))
        );
    }

    #[tokio::test]
    async fn update_missing_user() {
        let store = UserStore::seeded();

        let result = store
            .update(UserUpdate {
                id: 42,
                name: Some("Nobody".to_string()),
                email: None,
            })
            .await;

        assert_eq!(result, Err(StoreError::UserNotFound(42)));
    }
}
