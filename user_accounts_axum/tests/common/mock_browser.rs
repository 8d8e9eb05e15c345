use reqwest::{Client, Response, StatusCode};

/// Cookie-keeping client that does not follow redirects on its own
pub struct MockBrowser {
    client: Client,
    base_url: String,
}

impl MockBrowser {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .expect("reqwest client");

        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client.get(self.url(path)).send().await
    }

    pub async fn post_form(
        &self,
        path: &str,
        form_data: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        self.client.post(self.url(path)).form(form_data).send().await
    }

    pub async fn put_form(
        &self,
        path: &str,
        form_data: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        self.client.put(self.url(path)).form(form_data).send().await
    }

    /// DELETE without a body, authenticated through the `X-CSRF-Token` header
    pub async fn delete_with_token(
        &self,
        path: &str,
        csrf_token: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        let mut request = self.client.delete(self.url(path));
        if let Some(token) = csrf_token {
            request = request.header("X-CSRF-Token", token);
        }
        request.send().await
    }

    /// Follow a redirect response with a GET
    pub async fn follow_redirect(
        &self,
        response: Response,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let location = location_of(&response).ok_or("No location header found in redirect")?;
        Ok(self.get(&location).await?)
    }

    /// GET a page and return its body, asserting a 200
    pub async fn page(&self, path: &str) -> Result<String, Box<dyn std::error::Error>> {
        let response = self.get(path).await?;
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(format!("GET {path} returned {status}: {body}").into());
        }
        Ok(body)
    }

    /// Sign in through the form; returns the sign-in response (a redirect on success)
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Response, reqwest::Error> {
        self.post_form("/sessions", &[("email", email), ("password", password)])
            .await
    }

    /// The hidden authenticity token embedded in a rendered page
    pub async fn csrf_token_from(&self, path: &str) -> Result<String, Box<dyn std::error::Error>> {
        let body = self.page(path).await?;
        authenticity_token(&body).ok_or_else(|| format!("No authenticity_token on {path}").into())
    }
}

pub fn location_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn authenticity_token(body: &str) -> Option<String> {
    let marker = r#"name="authenticity_token" value=""#;
    let start = body.find(marker)? + marker.len();
    let end = body[start..].find('"')? + start;
    Some(body[start..end].to_string())
}
