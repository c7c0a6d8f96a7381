use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// User account document. The password field always holds an argon2
/// hash; the plaintext never reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub username: String,
    pub password_hash: String,
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}
