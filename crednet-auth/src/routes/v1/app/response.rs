use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct GetAppList {
    pub data: Vec<GetAppData>,
}

/// One non-revoked grant, joined with the client display metadata.
#[derive(Deserialize, Serialize)]
pub struct GetAppData {
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "clientName")]
    pub client_name: String,
    #[serde(rename = "clientImage", skip_serializing_if = "Option::is_none")]
    pub client_image: Option<String>,
    pub scopes: Vec<String>,
    #[serde(rename = "authorizedAt")]
    pub authorized_at: String,
}
