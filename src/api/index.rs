use actix_web::{http::header::ContentType, web, HttpResponse, ResponseError};
use maud::{html, Markup, DOCTYPE};
use crate::{config::AppConfig, models::User, services::backend::UserBackend};

fn user_row(user: &User) -> Markup {
    html! {
        tr {
            td { (user.id) }
            td {
                @if user.image_url.is_empty() {
                    "-"
                } @else {
                    img src=(user.image_url) alt=(user.name) width="48";
                }
            }
            td { (user.name) }
            td { (user.email) }
            td { (user.institution) }
            td { (user.position) }
            td { (user.phone) }
        }
    }
}

pub fn render_user_list(users: &[User], bucket_base_url: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "User Directory" }
            }
            body {
                h1 { "Users" }
                table {
                    thead {
                        tr {
                            th { "ID" } th { "Photo" } th { "Name" } th { "Email" }
                            th { "Institution" } th { "Position" } th { "Phone" }
                        }
                    }
                    tbody {
                        @for user in users {
                            (user_row(user))
                        }
                    }
                }
                h2 { "Add user" }
                form action="/users" method="post" enctype="multipart/form-data" {
                    input name="name" placeholder="Name" required;
                    input name="email" type="email" placeholder="Email" required;
                    input name="institution" placeholder="Institution" required;
                    input name="position" placeholder="Position" required;
                    input name="phone" placeholder="Phone" required;
                    input name="image" type="file" accept="image/*";
                    button type="submit" { "Add" }
                }
                p { small { "Images bucket: " (bucket_base_url) } }
            }
        }
    }
}

/// GET / - Renders the user list
pub async fn index(backend: web::Data<dyn UserBackend>, config: web::Data<AppConfig>) -> HttpResponse {
    log::info!("🏠 GET /");

    match backend.list_users().await {
        Ok(users) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(render_user_list(&users, &config.bucket_base_url()).into_string()),
        Err(e) => {
            log::error!("❌ Error loading users for index: {}", e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str, image_url: &str) -> User {
        User {
            id,
            name: name.into(),
            email: "x@example.com".into(),
            institution: "A & B".into(),
            position: "p".into(),
            phone: "1".into(),
            image_url: image_url.into(),
        }
    }

    #[test]
    fn test_render_escapes_user_fields() {
        let users = vec![user(3, "<script>alert(1)</script>", "")];

        let html = render_user_list(&users, "https://b.s3.r.amazonaws.com/").into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("A &amp; B"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_shows_bucket_base() {
        let html = render_user_list(&[], "https://dummy-bucket.s3.us-east-1.amazonaws.com/").into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("https://dummy-bucket.s3.us-east-1.amazonaws.com/"));
    }

    #[test]
    fn test_render_image_column() {
        let users = vec![user(1, "Ann", "https://b.s3-r.amazonaws.com/users/a.png")];

        let html = render_user_list(&users, "").into_string();
        assert!(html.contains(r#"<img src="https://b.s3-r.amazonaws.com/users/a.png""#));
    }

    #[test]
    fn test_render_escapes_image_attribute() {
        let users = vec![user(1, "Ann", r#"x" onerror="alert(1)"#)];

        let html = render_user_list(&users, "").into_string();
        assert!(!html.contains(r#"onerror="alert"#));
        assert!(html.contains("&quot;"));
    }
}
