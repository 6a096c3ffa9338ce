//! In-memory user directory

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, PublicUser, UpdateUserDto, User,
    UserRepositoryInterface,
};

struct DirectoryState {
    /// Insertion order is listing order.
    users: Vec<User>,
    /// Only ever increments, so ids of deleted users are never handed out again.
    next_id: u64,
}

impl DirectoryState {
    fn email_taken(&self, email: &str, except_id: Option<u64>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except_id)
    }

    fn insert(&mut self, dto: CreateUserDto) -> DomainResult<User> {
        let role = dto.validate()?;
        if self.email_taken(&dto.email, None) {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let user = User::new(self.next_id, dto.email, dto.username, dto.secret, role);
        self.next_id += 1;
        self.users.push(user.clone());
        Ok(user)
    }
}

/// Process-local directory. Contents do not survive a restart.
///
/// A single write guard spans every check-then-write sequence, which keeps
/// email uniqueness intact on a multi-threaded runtime.
pub struct InMemoryUserDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DirectoryState {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Build a directory pre-populated with `seeds`, assigning ids in order.
    pub fn with_users(seeds: impl IntoIterator<Item = CreateUserDto>) -> DomainResult<Self> {
        let mut state = DirectoryState {
            users: Vec::new(),
            next_id: 1,
        };
        for seed in seeds {
            state.insert(seed)?;
        }
        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserDirectory {
    async fn list_users(&self) -> DomainResult<Vec<PublicUser>> {
        let state = self.state.read().await;
        Ok(state.users.iter().map(User::to_public).collect())
    }

    async fn get_user(&self, id: u64) -> DomainResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let mut state = self.state.write().await;
        let user = state.insert(dto)?;
        info!(user_id = user.id, email = %user.email, role = %user.role, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: u64, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        dto.validate()?;

        let mut state = self.state.write().await;
        let Some(index) = state.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(email) = dto.email.as_deref() {
            if state.email_taken(email, Some(id)) {
                return Err(DomainError::Conflict("Email already exists".into()));
            }
        }

        let user = &mut state.users[index];
        if let Some(email) = dto.email {
            user.email = email;
        }
        if let Some(username) = dto.username {
            user.username = username;
        }
        if let Some(secret) = dto.secret {
            user.set_secret(secret);
        }
        if let Some(role) = dto.role {
            user.role = role;
        }

        info!(user_id = id, "User updated");
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: u64) -> DomainResult<bool> {
        let mut state = self.state.write().await;
        let Some(index) = state.users.iter().position(|u| u.id == id) else {
            return Ok(false);
        };
        state.users.remove(index);
        info!(user_id = id, "User deleted");
        Ok(true)
    }

    async fn count(&self) -> DomainResult<usize> {
        Ok(self.state.read().await.users.len())
    }
}
