use super::types::{
    AdminChangePasswordDto, ChangeOwnPasswordDto, CompanyStructure, CreateUserDto, CreatedUser,
    FindUsersDto, MessageResponse, ProfileUpdated, UpdateUserProfileDto, UpdateUserWorkInfoDto,
    User, UserProfile, UsersResponse,
};
use crate::error::{CrmError, Result};
use crate::http::{ApiClient, ApiRequest};

const USERS_BASE: &str = "users";

/// Employee records and company structure endpoints.
///
/// Every call goes through [`ApiClient::execute`], so an expired access
/// credential is refreshed transparently.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST users`
    pub async fn create_user(&self, data: &CreateUserDto) -> Result<CreatedUser> {
        let request = ApiRequest::post(USERS_BASE).json(data)?;
        self.client.execute_json(request).await
    }

    /// `GET users` with optional filters and page.
    pub async fn get_users(&self, filter: &FindUsersDto) -> Result<UsersResponse> {
        let request = filter
            .query_pairs()
            .into_iter()
            .fold(ApiRequest::get(USERS_BASE), |req, (key, value)| {
                req.query(key, value)
            });
        self.client.execute_json(request).await
    }

    /// `GET users/search?q=...`
    pub async fn search_users(&self, query: &str) -> Result<UsersResponse> {
        let request = ApiRequest::get(format!("{USERS_BASE}/search")).query("q", query);
        self.client.execute_json(request).await
    }

    /// `GET users/me/page`: the signed-in user's extended profile.
    pub async fn current_user_profile(&self) -> Result<UserProfile> {
        self.client
            .execute_json(ApiRequest::get(format!("{USERS_BASE}/me/page")))
            .await
    }

    /// `GET users/{id}/page`
    pub async fn user_page(&self, id: &str) -> Result<User> {
        let path = user_path(id, Some("page"))?;
        self.client.execute_json(ApiRequest::get(path)).await
    }

    /// `PUT users/{id}/profile`
    pub async fn update_user_profile(
        &self,
        id: &str,
        data: &UpdateUserProfileDto,
    ) -> Result<ProfileUpdated> {
        let request = ApiRequest::put(user_path(id, Some("profile"))?).json(data)?;
        self.client.execute_json(request).await
    }

    /// `PUT users/{id}/work-info`
    pub async fn update_user_work_info(
        &self,
        id: &str,
        data: &UpdateUserWorkInfoDto,
    ) -> Result<MessageResponse> {
        let request = ApiRequest::put(user_path(id, Some("work-info"))?).json(data)?;
        self.client.execute_json(request).await
    }

    /// `PUT users/me/password`
    pub async fn change_own_password(&self, data: &ChangeOwnPasswordDto) -> Result<MessageResponse> {
        let request = ApiRequest::put(format!("{USERS_BASE}/me/password")).json(data)?;
        self.client.execute_json(request).await
    }

    /// `PUT users/{id}/password`. Team leads only; others get the backend's 403.
    pub async fn change_user_password(
        &self,
        id: &str,
        data: &AdminChangePasswordDto,
    ) -> Result<MessageResponse> {
        let request = ApiRequest::put(user_path(id, Some("password"))?).json(data)?;
        self.client.execute_json(request).await
    }

    /// `DELETE users/{id}`
    pub async fn delete_user(&self, id: &str) -> Result<MessageResponse> {
        let request = ApiRequest::delete(user_path(id, None)?);
        self.client.execute_json(request).await
    }

    /// `GET company/structure`
    pub async fn company_structure(&self) -> Result<CompanyStructure> {
        self.client
            .execute_json(ApiRequest::get("company/structure"))
            .await
    }
}

fn user_path(id: &str, suffix: Option<&str>) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CrmError::InvalidArgument("user id must not be empty".into()));
    }
    Ok(match suffix {
        Some(suffix) => ApiRequest::path_from_segments(&[USERS_BASE, id, suffix]),
        None => ApiRequest::path_from_segments(&[USERS_BASE, id]),
    })
}
