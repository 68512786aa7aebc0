use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub organizations: Vec<Organization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl Account {
    pub fn default_organization(&self) -> Option<&Organization> {
        self.organizations.iter().find(|org| org.is_default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub role: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub credits: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_default_organization() {
        let body = r#"{
            "id": "user-1",
            "email": "someone@example.com",
            "organizations": [
                {"id": "org-a", "name": "A", "role": "MEMBER", "is_default": false},
                {"id": "org-b", "name": "B", "role": "OWNER", "is_default": true}
            ]
        }"#;
        let account: Account = serde_json::from_str(body).unwrap();
        assert_eq!(account.profile_picture, None);
        assert_eq!(account.default_organization().unwrap().id, "org-b");
    }
}
