use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub institution: String,
    pub position: String,
    pub phone: String,
    #[serde(default)]
    pub image_url: String,  // empty when no image was uploaded
}

/// Record submitted on create, before the backend assigns an id
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub institution: String,
    pub position: String,
    pub phone: String,
    pub image_url: String,
}

impl NewUser {
    pub fn with_id(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            institution: self.institution,
            position: self.position,
            phone: self.phone,
            image_url: self.image_url,
        }
    }
}

/// A supplied patch field must be a string; `null` is rejected rather than
/// read as "absent"
fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

/// Partial update; absent fields are left untouched and unknown keys ignored
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, ToSchema)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "present_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present_string", skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "present_string", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "present_string", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "present_string", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl User {
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(institution) = patch.institution {
            self.institution = institution;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: 7,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            institution: "Analytical Society".into(),
            position: "Engineer".into(),
            phone: "555".into(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut user = sample();
        user.apply(UserPatch {
            position: Some("Lead".into()),
            ..Default::default()
        });

        let mut expected = sample();
        expected.position = "Lead".into();
        assert_eq!(user, expected);
    }

    #[test]
    fn test_patch_ignores_unknown_and_id_keys() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"id": 99, "phone": "123", "favourite_colour": "green"}"#).unwrap();
        let mut user = sample();
        user.apply(patch);

        assert_eq!(user.id, 7);
        assert_eq!(user.phone, "123");
    }

    #[test]
    fn test_patch_rejects_null_and_non_string_values() {
        assert!(serde_json::from_str::<UserPatch>(r#"{"name": null}"#).is_err());
        assert!(serde_json::from_str::<UserPatch>(r#"{"phone": 123}"#).is_err());

        let empty: UserPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, UserPatch::default());
    }

    #[test]
    fn test_missing_image_url_defaults_to_empty() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"name":"a","email":"b","institution":"c","position":"d","phone":"e"}"#,
        )
        .unwrap();
        assert_eq!(user.image_url, "");
    }
}
