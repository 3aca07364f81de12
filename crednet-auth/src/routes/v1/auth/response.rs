use serde::Serialize;

#[derive(Serialize)]
pub struct GetTokenInfo {
    pub data: GetTokenInfoData,
}

#[derive(Serialize)]
pub struct GetTokenInfoData {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub scopes: Vec<String>,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
}
