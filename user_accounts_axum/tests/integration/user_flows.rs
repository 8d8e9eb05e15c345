use crate::common::{
    MockBrowser, TEST_PASSWORD, TestServer, create_user, listed_users, mock_browser::location_of,
    unique_email,
};
use reqwest::StatusCode;
use serial_test::serial;
use user_accounts::count_users;

#[tokio::test]
#[serial]
async fn test_sign_up_page() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    for path in ["/signup", "/users/new"] {
        let body = browser.page(path).await?;
        assert!(body.contains("<title>Sample App | Sign up</title>"));
        assert!(body.contains("<h1>Sign up</h1>"));
    }

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_invalid_sign_up_creates_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let before = count_users().await?;

    let response = browser
        .post_form(
            "/users",
            &[
                ("name", ""),
                ("email", "user@invalid"),
                ("password", "foo"),
                ("password_confirmation", "bar"),
            ],
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await?;
    assert!(body.contains("<title>Sample App | Sign up</title>"));
    assert!(body.contains(r#"<div id="error_explanation">"#));
    assert!(body.contains("Name can"));
    assert!(body.contains("Email is invalid"));
    assert!(body.contains(r#"value="user@invalid""#));
    assert!(!body.contains("flash success"));
    assert_eq!(count_users().await?, before);

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_valid_sign_up_signs_in_and_welcomes_once() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let before = count_users().await?;
    let email = unique_email("Newcomer");

    let response = browser
        .post_form(
            "/users",
            &[
                ("name", "Example User"),
                ("email", &email),
                ("password", TEST_PASSWORD),
                ("password_confirmation", TEST_PASSWORD),
            ],
        )
        .await?;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(count_users().await?, before + 1);
    let location = location_of(&response).ok_or("missing location")?;
    assert!(location.starts_with("/users/"));

    let body = browser.follow_redirect(response).await?.text().await?;
    assert!(body.contains("<title>Sample App | Example User</title>"));
    assert!(body.contains(r#"<div class="flash success">Welcome to the Sample App!</div>"#));
    assert!(body.contains(r#"<a href="/signout">Sign out</a>"#));
    assert!(body.contains(r#"class="gravatar""#));

    // Flash messages are shown exactly once
    let again = browser.page(&location).await?;
    assert!(!again.contains("Welcome to the Sample App!"));

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_duplicate_email_is_rejected_case_insensitively() -> Result<(), Box<dyn std::error::Error>>
{
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let existing = create_user("Taken Email", false).await;
    let before = count_users().await?;

    let response = browser
        .post_form(
            "/users",
            &[
                ("name", "Copycat"),
                ("email", &existing.email.to_uppercase()),
                ("password", TEST_PASSWORD),
                ("password_confirmation", TEST_PASSWORD),
            ],
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await?;
    assert!(body.contains("Email has already been taken"));
    assert_eq!(count_users().await?, before);

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_profile_page_shows_name_and_gravatar() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let user = create_user("Profile Owner", false).await;

    let body = browser.page(&format!("/users/{}", user.id)).await?;
    assert!(body.contains("<title>Sample App | Profile Owner</title>"));
    assert!(body.contains(r#"<img alt="Profile Owner" class="gravatar""#));
    assert!(body.contains(&user_accounts::gravatar_url(&user.email, 80)));
    assert!(body.contains("Member since"));

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_edit_and_update_own_profile() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let user = create_user("Editor", false).await;
    let edit_path = format!("/users/{}/edit", user.id);
    let user_path = format!("/users/{}", user.id);

    browser.sign_in(&user.email, TEST_PASSWORD).await?;

    let body = browser.page(&edit_path).await?;
    assert!(body.contains("<title>Sample App | Edit user</title>"));
    assert!(body.contains(r#"<a href="http://gravatar.com/emails" target="_blank">change</a>"#));
    assert!(body.contains(&format!(r#"value="{}""#, user.email)));
    let token = crate::common::mock_browser::authenticity_token(&body).ok_or("no token")?;

    // Invalid input re-renders the form
    let response = browser
        .post_form(
            &user_path,
            &[
                ("_method", "put"),
                ("authenticity_token", &token),
                ("name", "Editor"),
                ("email", "bad@address"),
                ("password", ""),
                ("password_confirmation", ""),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await?;
    assert!(body.contains("<title>Sample App | Edit user</title>"));
    assert!(body.contains(r#"<div id="error_explanation">"#));

    // Keeping the own email is not a uniqueness violation
    let response = browser
        .post_form(
            &user_path,
            &[
                ("_method", "put"),
                ("authenticity_token", &token),
                ("name", "Renamed Editor"),
                ("email", &user.email),
                ("password", "newsecret"),
                ("password_confirmation", "newsecret"),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response), Some(user_path.clone()));

    let body = browser.follow_redirect(response).await?.text().await?;
    assert!(body.contains(r#"<div class="flash success">Profile updated.</div>"#));
    assert!(body.contains("<title>Sample App | Renamed Editor</title>"));

    // The new password is the one that works now
    browser.get("/signout").await?;
    let response = browser.sign_in(&user.email, TEST_PASSWORD).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = browser.sign_in(&user.email, "newsecret").await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_update_with_put_method() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let user = create_user("Put User", false).await;
    let user_path = format!("/users/{}", user.id);

    browser.sign_in(&user.email, TEST_PASSWORD).await?;
    let token = browser.csrf_token_from(&format!("{user_path}/edit")).await?;

    let response = browser
        .put_form(
            &user_path,
            &[
                ("authenticity_token", token.as_str()),
                ("name", "Put User Renamed"),
                ("email", &user.email),
                ("password", TEST_PASSWORD),
                ("password_confirmation", TEST_PASSWORD),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response), Some(user_path));

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_update_without_token_is_forbidden() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let user = create_user("Forged Update", false).await;

    browser.sign_in(&user.email, TEST_PASSWORD).await?;

    let response = browser
        .post_form(
            &format!("/users/{}", user.id),
            &[
                ("_method", "put"),
                ("name", "Hijacked"),
                ("email", &user.email),
                ("password", TEST_PASSWORD),
                ("password_confirmation", TEST_PASSWORD),
            ],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = browser.page(&format!("/users/{}", user.id)).await?;
    assert!(!body.contains("Hijacked"));

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_index_paginates_users() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let viewer = create_user("Page Viewer", false).await;
    for i in 0..31 {
        create_user(&format!("Person {i}"), false).await;
    }

    browser.sign_in(&viewer.email, TEST_PASSWORD).await?;

    let body = browser.page("/users").await?;
    assert!(body.contains("<title>Sample App | All users</title>"));
    assert!(body.contains(r#"<div class="pagination">"#));
    assert!(body.contains(r#"<span class="previous_page disabled">"#));
    assert!(body.contains(r#"<em class="current">1</em>"#));
    assert!(body.contains(r#"href="/users?page=2""#));
    assert_eq!(listed_users(&body), 30);
    assert!(!body.contains(">delete<") && !body.contains(r#"value="delete""#));

    // Out-of-range pages are clamped to the last page
    let total = count_users().await? as u64;
    let last_page = total.div_ceil(30);
    let body = browser.page("/users?page=100000").await?;
    assert!(body.contains(&format!(r#"<em class="current">{last_page}</em>"#)));
    assert!(body.contains(r#"<span class="next_page disabled">"#));

    let body = browser.page("/users?page=garbage").await?;
    assert!(body.contains(r#"<em class="current">1</em>"#));

    server.shutdown();
    Ok(())
}
