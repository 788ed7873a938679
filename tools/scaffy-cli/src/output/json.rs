//! JSON Output Formatting

use scaffy_codegen::Field;
use serde::Serialize;

/// Format data as pretty JSON
pub fn format_json_pretty<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Format data as compact JSON (one line)
pub fn format_json_compact<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Format parsed fields as JSON
pub fn format_fields_json(fields: &[Field], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        format_json_pretty(fields)
    } else {
        format_json_compact(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffy_codegen::parse_fields;

    #[test]
    fn test_json_formatting() {
        let fields = parse_fields(&["title", "status:enum:draft,live", "authorId?:references:user"])
            .unwrap();

        let pretty = format_fields_json(&fields, true).unwrap();
        assert!(pretty.contains('\n'));

        let compact = format_fields_json(&fields, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.starts_with(
            r#"[{"name":"title","type":"primitive","primitive":"string","nullable":false,"unique":false}"#
        ));
        assert!(compact.contains(r#""type":"enum","values":["draft","live"]"#));
        assert!(compact.contains(r#""type":"reference","target":"user","nullable":true"#));
    }
}
