//! Admin login page
//!
//! Self-contained document: styles are inlined so the page renders even when
//! the site's own stylesheets are unavailable.

const ERROR_MESSAGE: &str =
    r#"<div class="error-message">Incorrect password. Please try again.</div>"#;

/// Render the login form, optionally with the "incorrect password" banner
pub fn render_login_page(show_error: bool) -> String {
    let error = if show_error { ERROR_MESSAGE } else { "" };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Admin Login</title>
    <style>
        body {{
            font-family: Georgia, serif;
            background: linear-gradient(135deg, #1a1a2e, #16213e);
            color: #f5f5f5;
            margin: 0;
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
        }}
        .login-container {{
            background: rgba(255, 255, 255, 0.1);
            border-radius: 15px;
            padding: 40px;
            text-align: center;
            box-shadow: 0 8px 32px rgba(0, 0, 0, 0.3);
            max-width: 400px;
            width: 90%;
        }}
        h1 {{
            color: #f4d03f;
            font-size: 1.8em;
            margin-bottom: 20px;
        }}
        .form-group {{
            margin-bottom: 20px;
            text-align: left;
        }}
        label {{
            display: block;
            margin-bottom: 8px;
            color: #85c1e9;
        }}
        input[type="password"] {{
            width: 100%;
            padding: 12px;
            border: 2px solid #85c1e9;
            border-radius: 8px;
            background: rgba(255, 255, 255, 0.1);
            color: #f5f5f5;
            font-size: 16px;
            box-sizing: border-box;
        }}
        .login-btn {{
            width: 100%;
            padding: 12px 30px;
            border: none;
            border-radius: 8px;
            background: #f4d03f;
            color: #1a1a2e;
            font-size: 16px;
            font-weight: bold;
            cursor: pointer;
        }}
        .error-message {{
            background: rgba(231, 76, 60, 0.2);
            border: 1px solid #e74c3c;
            padding: 10px;
            border-radius: 5px;
            margin-bottom: 20px;
        }}
        .back-link {{
            display: inline-block;
            margin-top: 20px;
            color: #85c1e9;
            text-decoration: none;
        }}
    </style>
</head>
<body>
    <div class="login-container">
        <h1>Administration</h1>
        <p>Sign in to manage the blog.</p>
        {error}
        <form method="POST" action="/admin/login">
            <div class="form-group">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required autofocus>
            </div>
            <button type="submit" class="login-btn">Sign in</button>
        </form>
        <a href="/" class="back-link">&larr; Back to the blog</a>
    </div>
</body>
</html>"#
    )
}

/// Whether a login page query string asks for the error banner.
///
/// Any parameter named `error` counts, whatever its value. Names are
/// form-decoded, so `%65rror` is `error`.
pub fn query_requests_error(query: Option<&str>) -> bool {
    query
        .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
        .is_some_and(|pairs| pairs.iter().any(|(name, _)| name == "error"))
}
