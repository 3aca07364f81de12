use serde::Deserialize;

#[derive(Deserialize)]
pub struct ClientIdPath {
    pub client_id: String,
}

#[derive(Deserialize)]
pub struct PostClientBody {
    pub data: PostClientData,
}

#[derive(Deserialize)]
pub struct PostClientData {
    #[serde(rename = "redirectUris")]
    pub redirect_uris: Vec<String>,
    pub scopes: Option<Vec<String>>,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Clone, Deserialize)]
pub struct GetClientListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
    pub format: Option<ListFormat>,
}

#[derive(Clone, Deserialize, PartialEq)]
pub enum ListFormat {
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "data")]
    Data,
}
