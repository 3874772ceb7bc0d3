use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSettingsPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    /// Required when `new_password` is set; verified against the stored hash.
    pub current_password: Option<String>,
    #[validate(length(min = 8))]
    pub new_password: Option<String>,
}
