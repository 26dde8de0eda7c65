//! Placeholder artifact used whenever generation does not yield valid code.

use appgen_core::artifact::{Artifact, CodeFile};
use appgen_core::naming::escape_html;

/// Build the deterministic placeholder artifact for `prompt`.
///
/// One `index.html` that echoes the (HTML-escaped) prompt and asks the user
/// to regenerate. Plain markup only, so the echoed text is never evaluated.
pub fn fallback_artifact(prompt: &str) -> Artifact {
    let prompt = escape_html(prompt);
    let content = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Generated App</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body>
  <div class="min-h-screen bg-gradient-to-br from-blue-50 to-indigo-100 flex items-center justify-center p-4">
    <div class="bg-white rounded-lg shadow-xl p-8 max-w-2xl w-full">
      <h1 class="text-3xl font-bold text-gray-900 mb-4">Your App: {prompt}</h1>
      <p class="text-gray-600 mb-6">
        This is a starter template for your app. The AI will generate a more sophisticated version.
      </p>
      <div class="bg-blue-50 border border-blue-200 rounded-lg p-4">
        <p class="text-blue-800 text-sm">
          <strong>Note:</strong> This is a placeholder. Try regenerating your app for a better result.
        </p>
      </div>
    </div>
  </div>
</body>
</html>
"#
    );

    Artifact {
        files: vec![CodeFile::new("index.html", content, "html")],
        dependencies: Some(Default::default()),
        framework: Some("vanilla".to_string()),
    }
}
