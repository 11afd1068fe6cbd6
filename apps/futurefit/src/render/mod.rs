//! Server-rendered HTML. Pure functions of session state; no I/O.

pub mod pages;
pub mod results;

use uuid::Uuid;

use crate::session::{Phase, Session};

pub use pages::{intake_page, progress_page};
pub use results::render_results;

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps page content in the shared document shell.
/// `refresh_secs` adds a meta refresh, used while an analysis is running.
pub fn layout(body: &str, refresh_secs: Option<u32>) -> String {
    let refresh = refresh_secs
        .map(|s| format!(r#"<meta http-equiv="refresh" content="{s}">"#))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  {refresh}
  <title>FutureFit</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="min-h-screen bg-gradient-to-br from-blue-50 via-white to-purple-50">
  <div class="container mx-auto px-4 py-8">
    <header class="text-center mb-12">
      <h1 class="text-4xl font-bold text-blue-600 mb-4">FutureFit</h1>
      <p class="text-xl text-gray-600 max-w-2xl mx-auto">Discover when AI might impact your career and get personalized recommendations to stay ahead</p>
      <p class="mt-4 text-sm text-gray-500">Powered by Google Gemini</p>
    </header>
    <main class="max-w-4xl mx-auto">
{body}
    </main>
  </div>
</body>
</html>"#
    )
}

/// Full page for whatever phase the session is in.
pub fn page_for(session_id: Uuid, session: &Session) -> String {
    match (session.phase(), &session.results) {
        (Phase::Results, Some(results)) => layout(&render_results(results, session_id), None),
        (Phase::Uploading | Phase::Analyzing, _) => {
            layout(&progress_page(session.upload.progress), Some(1))
        }
        _ => layout(
            &intake_page(session_id, session.upload.error.as_deref()),
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape("Senior Analyst, 10 yrs"), "Senior Analyst, 10 yrs");
    }

    #[test]
    fn test_layout_refresh_only_when_requested() {
        assert!(layout("x", Some(1)).contains(r#"http-equiv="refresh" content="1""#));
        assert!(!layout("x", None).contains("http-equiv"));
    }
}
