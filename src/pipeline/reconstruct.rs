//! Response reconstruction: page list → Markdown + visualization HTML.
//!
//! The service returns one result per page, each carrying markdown text
//! with placeholder image paths, a placeholder → image-reference map, and
//! optional rendered visualization images. This stage stitches the pages
//! back together: placeholders are substituted with resolved sources,
//! multi-page output gets `**Page N**` markers, and the visualization
//! images become an HTML fragment.
//!
//! Malformed pages never fail here — absent or null fields degrade to
//! empty strings and maps, since analysis payloads vary in completeness.

use crate::pipeline::postprocess::escape_math_inequalities;
use crate::response::ResultBody;

/// Fixed preview text for a successful call that recognised nothing.
pub const NO_CONTENT_TEXT: &str = "No content was recognized.";

/// Visualization placeholder for the empty-result case.
pub const NO_VIS_HTML: &str = "<p>No visualization available.</p>";

/// Visualization placeholder when pages exist but none carried an image.
pub const NO_VIS_STYLED_HTML: &str =
    "<p style='text-align:center;color:#888;'>No visualization available.</p>";

/// Substituted for the preview when the combined markdown comes out empty.
pub const EMPTY_RESULT_TEXT: &str = "(Empty result)";

/// Resolve an image reference into something a browser can display.
///
/// URLs and existing data URLs pass through unchanged; anything else is
/// treated as bare base64 and wrapped as a JPEG data URL (the service's
/// common case). Empty input stays empty.
pub fn resolve_image_ref(raw: &str) -> String {
    if raw.is_empty() || raw.starts_with("http") || raw.starts_with("data:") {
        raw.to_string()
    } else {
        format!("data:image/jpeg;base64,{raw}")
    }
}

/// Rebuild `(preview markdown, visualization HTML, raw markdown)` from the
/// page list.
///
/// Pages are processed in order by their raw index (page markers count
/// `null` entries too); `null` and contentless pages are skipped. The
/// combined markdown goes through the math-escaping post-processor before
/// it is returned as both preview and raw — except that an entirely empty
/// preview is replaced with [`EMPTY_RESULT_TEXT`] while raw keeps the
/// empty string.
pub fn reconstruct(result: &ResultBody) -> (String, String, String) {
    let pages = &result.layout_parsing_results;
    if pages.is_empty() {
        return (
            NO_CONTENT_TEXT.to_string(),
            NO_VIS_HTML.to_string(),
            String::new(),
        );
    }

    let multi_page = pages.len() > 1;
    let mut md_parts: Vec<String> = Vec::new();
    let mut images: Vec<String> = Vec::new();

    for (page_idx, page) in pages.iter().enumerate() {
        let Some(page) = page.as_ref().filter(|p| !p.is_empty()) else {
            continue;
        };

        let mut text = page.markdown.text.clone();
        for (placeholder, image_data) in &page.markdown.images {
            if let Some(data) = image_data.as_str() {
                let src = resolve_image_ref(data);
                text = text
                    .replace(
                        &format!("src=\"{placeholder}\""),
                        &format!("src=\"{src}\""),
                    )
                    .replace(&format!("]({placeholder})"), &format!("]({src})"));
            }
        }

        if multi_page && page_idx > 0 {
            md_parts.push(format!("\n\n---\n\n**Page {}**\n\n", page_idx + 1));
        }
        md_parts.push(text);

        for image_data in page.output_images.values() {
            if let Some(data) = image_data.as_str() {
                if !data.is_empty() {
                    images.push(resolve_image_ref(data));
                }
            }
        }
    }

    let combined = escape_math_inequalities(&md_parts.join("\n\n"));

    let vis_html = if images.is_empty() {
        NO_VIS_STYLED_HTML.to_string()
    } else {
        let mut vis_parts: Vec<String> = Vec::new();
        for (idx, src) in images.iter().enumerate() {
            if multi_page {
                vis_parts.push(format!(
                    "<p style=\"text-align:center;color:#64748b;margin:8px 0;\">Page {}</p>",
                    idx + 1
                ));
            }
            vis_parts.push(format!(
                "<img src=\"{}\" alt=\"Page {}\" loading=\"lazy\" style=\"max-width:100%;margin-bottom:16px;\">",
                src,
                idx + 1
            ));
        }
        vis_parts.join("\n")
    };

    let preview = if combined.is_empty() {
        EMPTY_RESULT_TEXT.to_string()
    } else {
        combined.clone()
    };

    (preview, vis_html, combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> ResultBody {
        serde_json::from_value(value).expect("result body")
    }

    #[test]
    fn empty_result_list_yields_fixed_triple() {
        let (preview, vis, raw) = reconstruct(&body(json!({"layoutParsingResults": []})));
        assert_eq!(preview, "No content was recognized.");
        assert_eq!(vis, "<p>No visualization available.</p>");
        assert_eq!(raw, "");
    }

    #[test]
    fn absent_result_list_yields_fixed_triple() {
        let (preview, vis, raw) = reconstruct(&body(json!({})));
        assert_eq!(preview, "No content was recognized.");
        assert_eq!(vis, "<p>No visualization available.</p>");
        assert_eq!(raw, "");
    }

    #[test]
    fn resolve_bare_base64_wraps_as_jpeg_data_url() {
        assert_eq!(resolve_image_ref("Zm9v"), "data:image/jpeg;base64,Zm9v");
    }

    #[test]
    fn resolve_url_and_data_url_unchanged() {
        assert_eq!(
            resolve_image_ref("https://example.com/a.png"),
            "https://example.com/a.png"
        );
        assert_eq!(
            resolve_image_ref("data:image/png;base64,Zm9v"),
            "data:image/png;base64,Zm9v"
        );
        assert_eq!(resolve_image_ref(""), "");
    }

    #[test]
    fn placeholder_substitution_covers_both_syntaxes() {
        let result = body(json!({
            "layoutParsingResults": [{
                "markdown": {
                    "text": "<img src=\"imgs/img_in_table_box_0.jpg\"> and ![fig](imgs/fig1.jpg)",
                    "images": {
                        "imgs/img_in_table_box_0.jpg": "Zm9v",
                        "imgs/fig1.jpg": "https://example.com/fig1.jpg"
                    }
                }
            }]
        }));
        let (preview, _, raw) = reconstruct(&result);
        assert!(preview.contains("src=\"data:image/jpeg;base64,Zm9v\""));
        assert!(preview.contains("](https://example.com/fig1.jpg)"));
        assert!(!raw.contains("imgs/img_in_table_box_0.jpg"));
    }

    #[test]
    fn second_page_gets_a_page_marker() {
        let result = body(json!({
            "layoutParsingResults": [
                {"markdown": {"text": "A"}},
                {"markdown": {"text": "B"}}
            ]
        }));
        let (preview, _, raw) = reconstruct(&result);
        let marker_pos = preview.find("**Page 2**").expect("marker present");
        let b_pos = preview.rfind('B').expect("page text present");
        assert!(marker_pos < b_pos, "marker must precede page text");
        assert!(preview.starts_with('A'));
        assert_eq!(preview, raw);
    }

    #[test]
    fn single_page_has_no_marker() {
        let result = body(json!({
            "layoutParsingResults": [{"markdown": {"text": "only page"}}]
        }));
        let (preview, _, _) = reconstruct(&result);
        assert!(!preview.contains("**Page"));
    }

    #[test]
    fn null_pages_are_skipped_but_keep_their_index() {
        let result = body(json!({
            "layoutParsingResults": [
                null,
                {"markdown": {"text": "B"}}
            ]
        }));
        let (preview, _, _) = reconstruct(&result);
        // The surviving page keeps its raw position, page 2.
        assert!(preview.contains("**Page 2**"));
        assert!(!preview.contains("**Page 1**"));
    }

    #[test]
    fn visualization_images_collected_in_key_order() {
        let result = body(json!({
            "layoutParsingResults": [{
                "markdown": {"text": "x"},
                "outputImages": {
                    "b_res_img": "Qg==",
                    "a_res_img": "QQ=="
                }
            }]
        }));
        let (_, vis, _) = reconstruct(&result);
        let a = vis.find("QQ==").expect("a_res_img present");
        let b = vis.find("Qg==").expect("b_res_img present");
        assert!(a < b, "ascending key order");
        assert!(vis.contains("loading=\"lazy\""));
        // Single page: no captions.
        assert!(!vis.contains("<p style=\"text-align:center;color:#64748b"));
    }

    #[test]
    fn multi_page_visualization_gets_captions() {
        let result = body(json!({
            "layoutParsingResults": [
                {"markdown": {"text": "a"}, "outputImages": {"res": "QQ=="}},
                {"markdown": {"text": "b"}, "outputImages": {"res": "Qg=="}}
            ]
        }));
        let (_, vis, _) = reconstruct(&result);
        assert!(vis.contains(">Page 1</p>"));
        assert!(vis.contains(">Page 2</p>"));
    }

    #[test]
    fn pages_without_images_yield_styled_placeholder() {
        let result = body(json!({
            "layoutParsingResults": [{"markdown": {"text": "text only"}}]
        }));
        let (_, vis, _) = reconstruct(&result);
        assert_eq!(
            vis,
            "<p style='text-align:center;color:#888;'>No visualization available.</p>"
        );
    }

    #[test]
    fn non_string_image_values_are_skipped() {
        let result = body(json!({
            "layoutParsingResults": [{
                "markdown": {
                    "text": "keep ](ph.jpg)",
                    "images": {"ph.jpg": 42}
                },
                "outputImages": {"res": {"nested": true}}
            }]
        }));
        let (preview, vis, _) = reconstruct(&result);
        assert!(preview.contains("](ph.jpg)"), "placeholder left untouched");
        assert_eq!(
            vis,
            "<p style='text-align:center;color:#888;'>No visualization available.</p>"
        );
    }

    #[test]
    fn empty_combined_markdown_substitutes_preview_only() {
        let result = body(json!({"layoutParsingResults": [null, null]}));
        let (preview, _, raw) = reconstruct(&result);
        assert_eq!(preview, "(Empty result)");
        assert_eq!(raw, "");
    }

    #[test]
    fn math_escaping_is_applied_to_combined_output() {
        let result = body(json!({
            "layoutParsingResults": [{"markdown": {"text": "$a<=b$"}}]
        }));
        let (preview, _, raw) = reconstruct(&result);
        assert!(preview.contains("\\le"));
        assert!(!preview.contains("<="));
        assert_eq!(preview, raw);
    }
}
