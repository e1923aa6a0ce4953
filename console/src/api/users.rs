use super::{
    client::{segment, ApiClient},
    error::ApiError,
    types::{RoleUpdate, UpdateUser, User, UserRole},
};

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/users/").await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ApiError> {
        self.get_json(&format!("/users/{}", segment(id))).await
    }

    pub async fn update_user(&self, id: &str, request: &UpdateUser) -> Result<User, ApiError> {
        self.put_json(&format!("/users/{}", segment(id)), request)
            .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/users/{}", segment(id))).await
    }

    pub async fn update_user_role(&self, id: &str, role: UserRole) -> Result<User, ApiError> {
        self.put_json(&format!("/users/{}/role", segment(id)), &RoleUpdate { role })
            .await
    }
}
