use crate::common::{
    MockBrowser, TEST_PASSWORD, TestServer, create_user, mock_browser::location_of,
};
use reqwest::StatusCode;
use serial_test::serial;
use user_accounts::{count_users, get_user};

#[tokio::test]
#[serial]
async fn test_visitors_are_sent_to_sign_in() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let user = create_user("Guarded", false).await;
    let user_path = format!("/users/{}", user.id);

    let response = browser.get("/users").await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response).as_deref(), Some("/signin"));

    let response = browser.get(&format!("{user_path}/edit")).await?;
    assert_eq!(location_of(&response).as_deref(), Some("/signin"));

    let response = browser
        .put_form(&user_path, &[("name", "Visitor"), ("email", &user.email)])
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response).as_deref(), Some("/signin"));

    let response = browser
        .post_form(&user_path, &[("_method", "delete")])
        .await?;
    assert_eq!(location_of(&response).as_deref(), Some("/signin"));

    let response = browser.delete_with_token(&user_path, None).await?;
    assert_eq!(location_of(&response).as_deref(), Some("/signin"));

    assert_eq!(get_user(user.id).await?.name, "Guarded");

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_wrong_user_is_sent_to_root() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let owner = create_user("Owner", false).await;
    let intruder = create_user("Intruder", false).await;
    let owner_path = format!("/users/{}", owner.id);

    browser.sign_in(&intruder.email, TEST_PASSWORD).await?;
    let token = browser
        .csrf_token_from(&format!("/users/{}/edit", intruder.id))
        .await?;

    let response = browser.get(&format!("{owner_path}/edit")).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response).as_deref(), Some("/"));

    let response = browser
        .post_form(
            &owner_path,
            &[
                ("_method", "put"),
                ("authenticity_token", &token),
                ("name", "Taken Over"),
                ("email", &owner.email),
                ("password", TEST_PASSWORD),
                ("password_confirmation", TEST_PASSWORD),
            ],
        )
        .await?;
    assert_eq!(location_of(&response).as_deref(), Some("/"));
    assert_eq!(get_user(owner.id).await?.name, "Owner");

    // Unknown ids get the same answer, so existence is not revealed
    let response = browser.get("/users/999999999/edit").await?;
    assert_eq!(location_of(&response).as_deref(), Some("/"));

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_non_admin_cannot_destroy() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let actor = create_user("Plain Member", false).await;
    let target = create_user("Target Member", false).await;

    browser.sign_in(&actor.email, TEST_PASSWORD).await?;
    let token = browser
        .csrf_token_from(&format!("/users/{}/edit", actor.id))
        .await?;
    let before = count_users().await?;

    let response = browser
        .post_form(
            &format!("/users/{}", target.id),
            &[("_method", "delete"), ("authenticity_token", &token)],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response).as_deref(), Some("/"));
    assert_eq!(count_users().await?, before);

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_admin_destroys_other_users() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let admin = create_user("Admin Person", true).await;
    let first = create_user("Doomed First", false).await;
    let second = create_user("Doomed Second", false).await;

    browser.sign_in(&admin.email, TEST_PASSWORD).await?;

    let listing = browser.page("/users").await?;
    assert!(listing.contains(r#"value="delete""#));
    let token = browser
        .csrf_token_from(&format!("/users/{}/edit", admin.id))
        .await?;
    let before = count_users().await?;

    // Browser form with the method override
    let response = browser
        .post_form(
            &format!("/users/{}", first.id),
            &[("_method", "delete"), ("authenticity_token", &token)],
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response).as_deref(), Some("/users"));
    assert_eq!(count_users().await?, before - 1);

    let body = browser.follow_redirect(response).await?.text().await?;
    assert!(body.contains(r#"<div class="flash success">User destroyed.</div>"#));

    // Plain DELETE authenticated by header
    let response = browser
        .delete_with_token(&format!("/users/{}", second.id), Some(&token))
        .await?;
    assert_eq!(location_of(&response).as_deref(), Some("/users"));
    assert_eq!(count_users().await?, before - 2);

    // Already gone
    let response = browser
        .delete_with_token(&format!("/users/{}", second.id), Some(&token))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_admin_cannot_destroy_self() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let admin = create_user("Careful Admin", true).await;

    browser.sign_in(&admin.email, TEST_PASSWORD).await?;
    let token = browser
        .csrf_token_from(&format!("/users/{}/edit", admin.id))
        .await?;
    let before = count_users().await?;

    let response = browser
        .delete_with_token(&format!("/users/{}", admin.id), Some(&token))
        .await?;
    assert_eq!(location_of(&response).as_deref(), Some("/users"));
    assert_eq!(count_users().await?, before);

    let body = browser.follow_redirect(response).await?.text().await?;
    assert!(body.contains(r#"<div class="flash error">Administrators cannot delete themselves.</div>"#));

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_admin_may_edit_other_profiles() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let admin = create_user("Editing Admin", true).await;
    let member = create_user("Edited Member", false).await;

    browser.sign_in(&admin.email, TEST_PASSWORD).await?;
    let body = browser.page(&format!("/users/{}/edit", member.id)).await?;
    assert!(body.contains(&format!(r#"value="{}""#, member.email)));

    server.shutdown();
    Ok(())
}
