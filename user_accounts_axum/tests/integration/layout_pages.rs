use crate::common::{MockBrowser, TEST_PASSWORD, TestServer, create_user};
use reqwest::StatusCode;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_static_pages_have_titles_and_headings() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    for (path, title, heading) in [
        ("/", "Home", "Welcome to the Sample App"),
        ("/help", "Help", "<h1>Help</h1>"),
        ("/about", "About", "<h1>About Us</h1>"),
        ("/contact", "Contact", "<h1>Contact</h1>"),
    ] {
        let body = browser.page(path).await?;
        assert!(
            body.contains(&format!("<title>Sample App | {title}</title>")),
            "title missing on {path}"
        );
        assert!(body.contains(heading), "heading missing on {path}");
    }

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_signed_out_layout_links() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    let body = browser.page("/").await?;
    assert!(body.contains(r#"<a href="/signin">Sign in</a>"#));
    assert!(body.contains(r#"<a href="/help">Help</a>"#));
    assert!(!body.contains("Sign out"));
    assert!(!body.contains(r#"<a href="/users">Users</a>"#));
    assert!(body.contains(r#"href="/signup""#));

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_signed_in_layout_links() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);
    let user = create_user("Layout User", false).await;

    let response = browser.sign_in(&user.email, TEST_PASSWORD).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = browser.page("/").await?;
    assert!(body.contains(r#"<a href="/signout">Sign out</a>"#));
    assert!(body.contains(r#"<a href="/users">Users</a>"#));
    assert!(body.contains(&format!(r#"<a href="/users/{}">Profile</a>"#, user.id)));
    assert!(body.contains(&format!(r#"<a href="/users/{}/edit">Settings</a>"#, user.id)));
    assert!(!body.contains(r#"<a href="/signin">Sign in</a>"#));

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_unknown_pages_are_404() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    for path in ["/no-such-page", "/users/999999999", "/users/abc"] {
        let response = browser.get(path).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        let body = response.text().await?;
        assert!(body.contains("Sample App | Not found"));
    }

    server.shutdown();
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_stylesheet_is_served() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::start().await?;
    let browser = MockBrowser::new(&server.base_url);

    let response = browser.get("/assets/app.css").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/css")
    );

    server.shutdown();
    Ok(())
}
