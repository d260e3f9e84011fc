//! HTML pages for the note form and the extraction result.

use notes_core::tables::{escape_html, ResultView};

const STYLE: &str = r#"<style>
  body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; }
  textarea { width: 100%; }
  table.table { border-collapse: collapse; margin-bottom: 1.5rem; }
  table.table th, table.table td { padding: 0.3rem 0.6rem; }
</style>"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// The empty note form posting `patient_prompt` to `/submit`.
pub fn index_page() -> String {
    layout(
        "Clinical Notes Extractor",
        r#"<h1>Clinical Notes Extractor</h1>
<form action="/submit" method="post">
  <label for="patient_prompt">Clinical notes</label>
  <textarea id="patient_prompt" name="patient_prompt" rows="12" required></textarea>
  <button type="submit">Extract</button>
</form>"#,
    )
}

/// The result page: status, pharmacy table, services data, unknown-words table.
pub fn result_page(view: &ResultView) -> String {
    let body = format!(
        r#"<h1>Extraction Result</h1>
<h2>Status</h2>
<p id="status">{status}</p>
<h2>Pharmacy</h2>
<div id="pharmacy">
{pharmacy}
</div>
<h2>Services</h2>
<div id="services">
{services}
</div>
<h2>Unknown Words</h2>
<div id="unknown-words">
{unknown_words}
</div>
<p><a href="/">Extract another note</a></p>"#,
        status = escape_html(&view.status),
        pharmacy = view.pharmacy.to_html("table"),
        services = view.services.to_html("table"),
        unknown_words = view.unknown_words.to_html("table"),
    );

    layout("Extraction Result", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_core::ExtractionResult;

    #[test]
    fn index_page_posts_patient_prompt() {
        let html = index_page();
        assert!(html.contains(r#"action="/submit""#));
        assert!(html.contains(r#"name="patient_prompt""#));
    }

    #[test]
    fn result_page_escapes_status() {
        let view = ResultView::from(&ExtractionResult {
            status: "<b>stable</b>".into(),
            medications: vec![],
            tests: vec![],
            services: vec![],
            unknown_terms: vec![],
        });
        let html = result_page(&view);
        assert!(html.contains("&lt;b&gt;stable&lt;/b&gt;"));
        assert!(html.contains("<th>Unknown Words</th>"));
    }
}
