use serde::Deserialize;

#[derive(Deserialize)]
pub struct ClientIdPath {
    pub client_id: String,
}
