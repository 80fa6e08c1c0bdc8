/// Places a CSRF token can be read from, checked in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CsrfSources {
    /// Raw `Cookie` header value, `name=value` pairs separated by `"; "`.
    pub cookie_header: Option<String>,
    /// Content of `<meta name="csrf-token">`.
    pub meta_token: Option<String>,
    /// Value of the hidden `csrfmiddlewaretoken` form field.
    pub form_field: Option<String>,
}

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

impl CsrfSources {
    pub fn from_cookie(cookie_header: impl Into<String>) -> Self {
        Self {
            cookie_header: Some(cookie_header.into()),
            ..Self::default()
        }
    }

    /// Resolve the token: cookie, then meta tag, then form field. An absent
    /// token resolves to the empty string so requests still go out.
    pub fn token(&self) -> String {
        if let Some(token) = self.cookie_header.as_deref().and_then(cookie_value) {
            return token.to_string();
        }
        if let Some(meta) = &self.meta_token {
            return meta.clone();
        }
        if let Some(field) = &self.form_field {
            return field.clone();
        }
        String::new()
    }
}

fn cookie_value(header: &str) -> Option<&str> {
    let prefix = format!("{CSRF_COOKIE}=");
    header
        .split("; ")
        .find(|pair| pair.starts_with(&prefix))
        .map(|pair| {
            let value = &pair[prefix.len()..];
            // Only the first segment after '=' counts, matching how browsers
            // hand the cookie string to scripts.
            value.split('=').next().unwrap_or(value)
        })
}
