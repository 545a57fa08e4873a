use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use blogwright_core::{
    Email, NewUser, Password, ProfileUpdate, Role, User, UserId, UserStore, UserStoreError,
    Username, domain::user::DEFAULT_IMAGE_FILE,
};

use super::password_hash::{compute_password_hash, verify_password_hash};

#[derive(Default)]
struct Users {
    by_id: HashMap<UserId, User>,
    last_id: i64,
}

impl Users {
    fn find_by_email(&self, email: &Email) -> Option<&User> {
        self.by_id.values().find(|user| &user.email == email)
    }

    fn find_by_username(&self, username: &Username) -> Option<&User> {
        self.by_id.values().find(|user| &user.username == username)
    }
}

#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<Users>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
        let password_hash = compute_password_hash(user.password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        if users.find_by_username(&user.username).is_some() {
            return Err(UserStoreError::UsernameTaken);
        }
        if users.find_by_email(&user.email).is_some() {
            return Err(UserStoreError::EmailTaken);
        }

        users.last_id += 1;
        let stored = User {
            id: UserId(users.last_id),
            username: user.username,
            email: user.email,
            image_file: DEFAULT_IMAGE_FILE.to_owned(),
            password_hash,
            role: user.role,
        };
        users.by_id.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let user = self.get_user_by_email(email).await?;

        verify_password_hash(user.password_hash.clone(), password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .by_id
            .get(&id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn get_user_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .find_by_email(email)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .find_by_username(username)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;
        if users
            .find_by_username(&update.username)
            .is_some_and(|other| other.id != id)
        {
            return Err(UserStoreError::UsernameTaken);
        }
        if users
            .find_by_email(&update.email)
            .is_some_and(|other| other.id != id)
        {
            return Err(UserStoreError::EmailTaken);
        }

        let user = users.by_id.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        user.username = update.username;
        user.email = update.email;
        if let Some(image_file) = update.image_file {
            user.image_file = image_file;
        }
        Ok(user.clone())
    }

    async fn set_new_password(
        &self,
        id: UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        let user = users.by_id.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        user.password_hash = password_hash;
        Ok(())
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let user = users.by_id.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        user.role = role;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: Username::try_from(username.to_owned()).unwrap(),
            email: Email::try_from(email.to_owned()).unwrap(),
            password: Password::try_from(Secret::new("password123".to_owned())).unwrap(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_add_user_assigns_ids_and_defaults() {
        let store = HashMapUserStore::new();
        let first = store.add_user(new_user("alice", "alice@example.com")).await.unwrap();
        let second = store.add_user(new_user("bob", "bob@example.com")).await.unwrap();

        assert_eq!(first.id, UserId(1));
        assert_eq!(second.id, UserId(2));
        assert_eq!(first.image_file, DEFAULT_IMAGE_FILE);
        assert_eq!(first.role, Role::User);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_are_rejected() {
        let store = HashMapUserStore::new();
        store.add_user(new_user("alice", "alice@example.com")).await.unwrap();

        let result = store.add_user(new_user("alice", "other@example.com")).await;
        assert_eq!(result.unwrap_err(), UserStoreError::UsernameTaken);

        let result = store.add_user(new_user("other", "ALICE@example.com")).await;
        assert_eq!(result.unwrap_err(), UserStoreError::EmailTaken);
    }

    #[tokio::test]
    async fn test_authenticate_user() {
        let store = HashMapUserStore::new();
        store.add_user(new_user("alice", "alice@example.com")).await.unwrap();
        let email = Email::try_from("alice@example.com".to_owned()).unwrap();

        let good = Password::try_from(Secret::new("password123".to_owned())).unwrap();
        let user = store.authenticate_user(&email, &good).await.unwrap();
        assert_eq!(user.username.as_str(), "alice");

        let bad = Password::try_from(Secret::new("wrong-password".to_owned())).unwrap();
        let result = store.authenticate_user(&email, &bad).await;
        assert_eq!(result.unwrap_err(), UserStoreError::IncorrectPassword);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_username() {
        let store = HashMapUserStore::new();
        let alice = store.add_user(new_user("alice", "alice@example.com")).await.unwrap();
        store.add_user(new_user("bob", "bob@example.com")).await.unwrap();

        let update = ProfileUpdate {
            username: Username::try_from("bob".to_owned()).unwrap(),
            email: alice.email.clone(),
            image_file: None,
        };
        let result = store.update_profile(alice.id, update).await;
        assert_eq!(result.unwrap_err(), UserStoreError::UsernameTaken);
    }

    #[tokio::test]
    async fn test_update_profile_keeps_own_values() {
        let store = HashMapUserStore::new();
        let alice = store.add_user(new_user("alice", "alice@example.com")).await.unwrap();

        let update = ProfileUpdate {
            username: alice.username.clone(),
            email: alice.email.clone(),
            image_file: Some("abc.png".to_owned()),
        };
        let updated = store.update_profile(alice.id, update).await.unwrap();
        assert_eq!(updated.image_file, "abc.png");
    }
}
