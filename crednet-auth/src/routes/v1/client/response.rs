use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct PostClient {
    pub data: PostClientData,
}

/// The only place the client secret ever appears. It is not retrievable again through any
/// read API.
#[derive(Deserialize, Serialize)]
pub struct PostClientData {
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

#[derive(Serialize)]
pub struct GetClientCount {
    pub data: GetCountData,
}

#[derive(Serialize)]
pub struct GetCountData {
    pub count: u64,
}

#[derive(Serialize)]
pub struct GetClientList {
    pub data: Vec<GetClientData>,
}

#[derive(Serialize)]
pub struct GetClient {
    pub data: GetClientData,
}

#[derive(Deserialize, Serialize)]
pub struct GetClientData {
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "modifiedAt")]
    pub modified_at: String,
    #[serde(rename = "redirectUris")]
    pub redirect_uris: Vec<String>,
    pub scopes: Vec<String>,
    pub name: String,
    pub image: Option<String>,
    pub active: bool,
}
