//! Customer and viewer records consumed by the order workflow.

use serde::{Deserialize, Serialize};

/// Customer row as returned by the customer directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer { pub id: i64, pub name: String, pub email: String }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role { Admin, Member }

impl Role {
    /// Only the exact string `admin` grants the admin role.
    pub fn parse(value: &str) -> Self {
        if value.trim() == "admin" { Self::Admin } else { Self::Member }
    }
}

/// Authenticated caller identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewer { pub role: Role, pub email: String }

impl Viewer {
    pub fn admin(email: impl Into<String>) -> Self { Self { role: Role::Admin, email: email.into() } }
    pub fn member(email: impl Into<String>) -> Self { Self { role: Role::Member, email: email.into() } }
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }

    /// Whether this viewer may see an order placed by `client_email`.
    pub fn can_see(&self, client_email: &str) -> bool { self.is_admin() || self.email == client_email }
}
