use serde::Serialize;

use crate::domain::UserRole;

/// Data for the role-specific home page
#[derive(Debug, Serialize)]
pub struct HomeView {
    /// `admin/home` for admins, `home` otherwise
    pub view: &'static str,
    pub name: String,
    pub role: UserRole,
    pub message: String,
}
