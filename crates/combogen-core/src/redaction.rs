/// Mask the password and credential-like query parameters of a database URL.
///
/// `postgres://app:secret@db:5432/combos?sslmode=require&password=x` becomes
/// `postgres://app:***@db:5432/combos?sslmode=require&password=***`.
pub fn redact_database_url(url: &str) -> String {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };

    let mut redacted = redact_authority(base);
    if let Some(query) = query {
        redacted.push('?');
        redacted.push_str(&redact_query(query));
    }
    redacted
}

fn redact_authority(base: &str) -> String {
    let Some(scheme_end) = base.find("://") else {
        return base.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &base[authority_start..];
    let authority_len = rest.find('/').unwrap_or(rest.len());
    let authority = &rest[..authority_len];

    let Some(at_idx) = authority.rfind('@') else {
        return base.to_string();
    };
    let Some(colon_idx) = authority[..at_idx].find(':') else {
        return base.to_string();
    };

    let password_start = authority_start + colon_idx + 1;
    let password_end = authority_start + at_idx;
    format!("{}***{}", &base[..password_start], &base[password_end..])
}

fn redact_query(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn is_sensitive_key(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "password" | "pass" | "token" | "api_key" | "apikey"
    )
}
