use crate::models::User;

/// Records the mock store starts with on every boot
pub fn default_users() -> Vec<User> {
    log::info!("📋 Mock users: seeding 1 default user");

    vec![User {
        id: 1,
        name: "John Doe".into(),
        email: "john@example.com".into(),
        institution: "Example University".into(),
        position: "Researcher".into(),
        phone: "1234567890".into(),
        image_url: String::new(),
    }]
}
