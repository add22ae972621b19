//! In-process store backing both repo traits. Used for `STORAGE_BACKEND=memory`
//! and by the test suite.

use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;

use crate::{
    db::StoreError,
    todos::{dto::TodoDraft, repo::TodoRepo, repo_types::Todo},
    users::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
};

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    todos: BTreeMap<i64, Todo>,
    next_user_id: i64,
    next_todo_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Other("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn create(&self, new: &NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock()?;
        if inner
            .users
            .values()
            .any(|u| u.username == new.username || u.email == new.email)
        {
            return Err(StoreError::Conflict("username or email already exists".into()));
        }
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: new.username.clone(),
            email: new.email.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            phone_number: new.phone_number.clone(),
            hashed_password: new.hashed_password.clone(),
            role: new.role.as_str().to_string(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password_hash(
        &self,
        id: i64,
        hashed_password: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        Ok(match inner.users.get_mut(&id) {
            Some(u) => {
                u.hashed_password = hashed_password.to_string();
                true
            }
            None => false,
        })
    }

    async fn update_phone_number(&self, id: i64, phone_number: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        Ok(match inner.users.get_mut(&id) {
            Some(u) => {
                u.phone_number = Some(phone_number.to_string());
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl TodoRepo for MemoryStore {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Todo>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .todos
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.lock()?.todos.values().cloned().collect())
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<Todo>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .todos
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn insert(&self, owner_id: i64, draft: &TodoDraft) -> Result<Todo, StoreError> {
        let mut inner = self.lock()?;
        inner.next_todo_id += 1;
        let todo = Todo {
            id: inner.next_todo_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            complete: draft.complete,
            owner_id,
        };
        inner.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update_owned(
        &self,
        id: i64,
        owner_id: i64,
        draft: &TodoDraft,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        Ok(match inner.todos.get_mut(&id) {
            Some(t) if t.owner_id == owner_id => {
                t.title = draft.title.clone();
                t.description = draft.description.clone();
                t.priority = draft.priority;
                t.complete = draft.complete;
                true
            }
            _ => false,
        })
    }

    async fn toggle_complete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        Ok(match inner.todos.get_mut(&id) {
            Some(t) if t.owner_id == owner_id => {
                t.complete = !t.complete;
                true
            }
            _ => false,
        })
    }

    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let owned = inner.todos.get(&id).is_some_and(|t| t.owner_id == owner_id);
        if owned {
            inner.todos.remove(&id);
        }
        Ok(owned)
    }

    async fn delete_any(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.lock()?.todos.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::Role;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            hashed_password: "hash".into(),
            role: Role::Standard,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_username_or_email() {
        let store = MemoryStore::new();
        store.create(&new_user("alice", "a@x.io")).await.unwrap();
        let dup_name = store.create(&new_user("alice", "other@x.io")).await;
        let dup_mail = store.create(&new_user("bob", "a@x.io")).await;
        assert!(matches!(dup_name, Err(StoreError::Conflict(_))));
        assert!(matches!(dup_mail, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn ids_are_assigned_in_insertion_order() {
        let store = MemoryStore::new();
        let draft = TodoDraft {
            title: "first".into(),
            description: None,
            priority: 1,
            complete: false,
        };
        let a = store.insert(7, &draft).await.unwrap();
        let b = store.insert(7, &draft).await.unwrap();
        assert!(a.id < b.id);
        let ids: Vec<_> = store.list_by_owner(7).await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
