use uuid::Uuid;

use super::escape;
use crate::intake::RESUME_FIELD;

/// The intake widget: a single-file PDF picker. The file input is stretched
/// invisibly over the whole dashed zone, so a drop anywhere on it lands in the
/// input. `error` is shown inline above the form.
pub fn intake_page(session_id: Uuid, error: Option<&str>) -> String {
    let error_html = error
        .map(|msg| {
            format!(
                r#"<div role="alert" class="mb-6 p-4 rounded-lg bg-red-50 border border-red-200 text-red-700">{}</div>"#,
                escape(msg)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<section class="bg-white rounded-2xl shadow-xl p-8" data-phase="idle">
  <div class="text-center mb-8">
    <h2 class="text-2xl font-semibold text-gray-800 mb-2">Upload Your Resume</h2>
    <p class="text-gray-600">Our AI will read your PDF resume and provide future-focused insights</p>
  </div>
  {error_html}
  <form method="post" action="/sessions/{session_id}/upload" enctype="multipart/form-data" class="space-y-6">
    <label data-dropzone class="relative block border-2 border-dashed border-gray-300 rounded-xl p-12 text-center cursor-pointer hover:border-blue-400">
      <span class="block text-lg font-medium text-gray-700 mb-2">Drop your PDF resume here or click to browse</span>
      <span class="block text-sm text-gray-500" data-file-name>PDF files only</span>
      <input type="file" name="{RESUME_FIELD}" accept="application/pdf,.pdf" required class="absolute inset-0 w-full h-full opacity-0 cursor-pointer" onchange="this.previousElementSibling.textContent = this.files.length ? this.files[0].name : 'PDF files only'">
    </label>
    <div class="text-center">
      <button type="submit" class="px-6 py-3 bg-blue-600 text-white font-medium rounded-lg hover:bg-blue-700">Analyze Resume</button>
    </div>
  </form>
  <p class="mt-8 text-center text-sm text-gray-500">Your resume is processed in memory and not stored</p>
</section>"#
    )
}

/// Loading indicator with the simulated progress bar. Exposes no controls.
pub fn progress_page(progress: u8) -> String {
    let progress = progress.min(100);
    format!(
        r#"<section class="bg-white rounded-2xl shadow-xl p-8" data-phase="analyzing">
  <div class="flex flex-col items-center space-y-6 p-8">
    <div class="w-24 h-24 border-4 border-blue-200 rounded-full animate-spin border-t-blue-600"></div>
    <div class="text-center max-w-md w-full">
      <h3 class="text-xl font-semibold text-gray-800 mb-2">Analyzing Your Future</h3>
      <p class="text-gray-600 mb-4">Our AI is reading your PDF resume and predicting career trends...</p>
      <div class="w-full bg-gray-200 rounded-full h-2" role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow="{progress}">
        <div class="bg-gradient-to-r from-blue-500 to-purple-600 h-2 rounded-full" style="width: {progress}%"></div>
      </div>
      <p class="text-sm text-gray-500 mt-2">{progress}% Complete</p>
      <p class="text-xs text-gray-400 mt-1">Progress is estimated while the analysis runs</p>
    </div>
  </div>
</section>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intake_page_posts_single_pdf_field() {
        let id = Uuid::new_v4();
        let html = intake_page(id, None);
        assert!(html.contains(&format!(r#"action="/sessions/{id}/upload""#)));
        assert!(html.contains(r#"name="resume""#));
        assert!(html.contains(r#"accept="application/pdf,.pdf""#));
        assert!(!html.contains("multiple"));
        assert!(!html.contains(r#"role="alert""#));
    }

    #[test]
    fn test_file_input_covers_the_whole_drop_zone() {
        let html = intake_page(Uuid::new_v4(), None);
        let zone_start = html.find("<label data-dropzone").unwrap();
        let zone_end = html[zone_start..].find("</label>").unwrap() + zone_start;
        let zone = &html[zone_start..zone_end];
        assert!(zone.contains(r#"class="relative block"#));
        assert!(zone.contains(r#"type="file""#));
        assert!(zone.contains("absolute inset-0 w-full h-full opacity-0"));
        assert_eq!(html.matches(r#"type="file""#).count(), 1);
    }

    #[test]
    fn test_intake_page_shows_escaped_error() {
        let html = intake_page(Uuid::new_v4(), Some("Bad <file>"));
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("Bad &lt;file&gt;"));
    }

    #[test]
    fn test_progress_page_has_no_form() {
        let html = progress_page(40);
        assert!(html.contains("40% Complete"));
        assert!(html.contains("width: 40%"));
        assert!(!html.contains("<form"));
        assert!(!html.contains("<input"));
    }
}
