//! Text extraction from a cloud-document element tree.
//!
//! Operates on an already-fetched JSON document model: body → content
//! elements → {paragraph | table} → text runs / cells. The HTTP fetch itself
//! is an external collaborator; callers hand in the parsed tree.

use serde_json::Value;

/// Extract the full text of a document tree.
///
/// Paragraph and table blocks are joined with newlines, in document order.
pub fn extract_document_text(document: &Value) -> String {
    let content = document
        .pointer("/body/content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut parts = Vec::new();
    for element in content {
        if let Some(paragraph) = element.get("paragraph") {
            let text = extract_paragraph_text(paragraph);
            if !text.is_empty() {
                parts.push(text);
            }
        } else if let Some(table) = element.get("table") {
            let text = extract_table_text(table);
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }
    parts.join("\n")
}

/// Join the text runs of one paragraph element.
pub fn extract_paragraph_text(paragraph: &Value) -> String {
    let elements = paragraph
        .get("elements")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut text = String::new();
    for element in elements {
        if let Some(content) = element.pointer("/textRun/content").and_then(Value::as_str) {
            text.push_str(content);
        }
    }
    text.trim().to_string()
}

/// Flatten a table element: tab between cells in a row, newline between rows.
pub fn extract_table_text(table: &Value) -> String {
    let rows = table
        .get("tableRows")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut row_texts = Vec::new();
    for row in rows {
        let cells = row
            .get("tableCells")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut cell_texts = Vec::new();
        for cell in cells {
            let content = cell
                .get("content")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let mut pieces = Vec::new();
            for element in content {
                if let Some(paragraph) = element.get("paragraph") {
                    let text = extract_paragraph_text(paragraph);
                    if !text.is_empty() {
                        pieces.push(text);
                    }
                }
            }
            cell_texts.push(pieces.join(" "));
        }
        row_texts.push(cell_texts.join("\t"));
    }
    row_texts.join("\n")
}

/// Prefix the extracted text with the document title, when present.
pub fn extract_titled_text(document: &Value) -> String {
    let title = document
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Untitled");
    format!("Title: {}\n\n{}", title, extract_document_text(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paragraph(text: &str) -> Value {
        json!({ "paragraph": { "elements": [ { "textRun": { "content": text } } ] } })
    }

    #[test]
    fn paragraphs_join_with_newlines() {
        let doc = json!({ "body": { "content": [ paragraph("first"), paragraph("second") ] } });
        assert_eq!(extract_document_text(&doc), "first\nsecond");
    }

    #[test]
    fn split_runs_concatenate_within_a_paragraph() {
        let para = json!({ "elements": [
            { "textRun": { "content": "Hel" } },
            { "textRun": { "content": "lo\n" } },
        ]});
        assert_eq!(extract_paragraph_text(&para), "Hello");
    }

    #[test]
    fn tables_use_tabs_within_rows() {
        let doc = json!({ "body": { "content": [ { "table": { "tableRows": [
            { "tableCells": [
                { "content": [ paragraph("a") ] },
                { "content": [ paragraph("b") ] },
            ]},
            { "tableCells": [
                { "content": [ paragraph("c") ] },
                { "content": [ paragraph("d") ] },
            ]},
        ]}}]}});
        assert_eq!(extract_document_text(&doc), "a\tb\nc\td");
    }

    #[test]
    fn titled_extraction_defaults_to_untitled() {
        let doc = json!({ "body": { "content": [ paragraph("text") ] } });
        assert_eq!(extract_titled_text(&doc), "Title: Untitled\n\ntext");
    }

    #[test]
    fn empty_or_malformed_trees_yield_empty_text() {
        assert_eq!(extract_document_text(&json!({})), "");
        assert_eq!(extract_document_text(&json!({ "body": {} })), "");
    }
}
