//! Tool schema validity tests.
//!
//! Every registered tool must advertise an object schema whose properties
//! include the tool's parameters, with required fields matching the
//! parameters that have no default.

use serde_json::{Map, Value};

/// Validates that a JSON schema has the required structure.
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    match obj.get("type") {
        Some(Value::String(t)) if t == "object" => {}
        other => return Err(format!("Expected type 'object', got {:?}", other)),
    }

    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| "Properties must be an object".to_string())?;

    if let Some(required) = obj.get("required") {
        let required = required
            .as_array()
            .ok_or_else(|| "Required must be an array".to_string())?;
        for field in required {
            let name = field
                .as_str()
                .ok_or_else(|| format!("Required entry {:?} is not a string", field))?;
            if !properties.contains_key(name) {
                return Err(format!("Required field '{}' has no property", name));
            }
        }
    }

    Ok(())
}

/// Validates that a tool has a name, a description and a usable schema.
fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }
    if !tool
        .name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c == '_')
    {
        return Err(format!("Tool name '{}' must be snake_case", tool.name));
    }

    match tool.description.as_deref() {
        Some(d) if !d.is_empty() => {}
        _ => return Err(format!("Tool '{}' must have a description", tool.name)),
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    validate_json_schema(&Value::Object(Map::clone(&tool.input_schema)))
        .map_err(|e| format!("Tool '{}': {}", tool.name, e))
}

fn required_fields(tool: &rmcp::model::Tool) -> Vec<String> {
    tool.input_schema
        .get("required")
        .and_then(Value::as_array)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::sync::Arc;
    use vfx_mcp_editor::ToolRegistry;

    fn tool(name: &str) -> rmcp::model::Tool {
        ToolRegistry::standard()
            .get(name)
            .unwrap_or_else(|| panic!("tool {} should be registered", name))
            .tool
            .clone()
    }

    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": { "input_path": { "type": "string" } },
            "required": ["input_path"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let wrong_type = serde_json::json!({ "type": "string" });
        assert!(validate_json_schema(&wrong_type).is_err());

        let dangling = serde_json::json!({
            "type": "object",
            "properties": {},
            "required": ["input_path"]
        });
        assert!(validate_json_schema(&dangling).is_err());
    }

    #[test]
    fn test_tool_validation() {
        let valid_tool = rmcp::model::Tool {
            name: Cow::Borrowed("test_tool"),
            description: Some(Cow::Borrowed("A test tool")),
            input_schema: Arc::new(
                serde_json::json!({ "type": "object", "properties": {} })
                    .as_object()
                    .unwrap()
                    .clone(),
            ),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&valid_tool).is_ok());

        let mut unnamed = valid_tool.clone();
        unnamed.name = Cow::Borrowed("");
        assert!(validate_tool(&unnamed).is_err());

        let mut undescribed = valid_tool.clone();
        undescribed.description = None;
        assert!(validate_tool(&undescribed).is_err());

        let mut camel = valid_tool;
        camel.name = Cow::Borrowed("trimVideo");
        assert!(validate_tool(&camel).is_err());
    }

    #[test]
    fn test_every_registered_tool_is_valid() {
        for tool in ToolRegistry::standard().tools() {
            assert!(validate_tool(&tool).is_ok(), "{:?}", validate_tool(&tool).err());
        }
    }

    #[test]
    fn test_required_fields_have_no_defaults() {
        assert_eq!(
            required_fields(&tool("trim_video")),
            vec!["input_path", "output_path", "start_time"]
        );
        assert_eq!(
            required_fields(&tool("create_video_mosaic")),
            vec!["input_paths", "output_path"]
        );

        let speed = required_fields(&tool("change_speed"));
        assert!(speed.contains(&"speed".to_string()));

        let stabilize = required_fields(&tool("apply_video_stabilization"));
        assert!(!stabilize.contains(&"strength".to_string()));
        assert!(!stabilize.contains(&"zoom".to_string()));
    }

    #[test]
    fn test_enum_values_are_advertised() {
        let schema = |name: &str| serde_json::to_string(&*tool(name).input_schema).unwrap();

        let filter = schema("apply_filter");
        for value in ["blur", "sepia", "grayscale", "hflip"] {
            assert!(filter.contains(&format!("\"{}\"", value)), "missing {}", value);
        }

        let transitions = schema("create_video_transitions");
        assert!(transitions.contains("\"wipe_left\""));
        assert!(transitions.contains("\"radial\""));

        let split = schema("create_split_screen");
        assert!(split.contains("\"triple_vertical\""));
        assert!(split.contains("\"diagonal\""));

        let merge = schema("merge_audio_tracks");
        assert!(merge.contains("\"sequence\""));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use vfx_mcp_editor::ToolRegistry;

    proptest! {
        /// Any registered tool looked up by name has a valid definition
        /// whose name round-trips.
        #[test]
        fn registered_tool_is_valid(index in 0usize..crate::server_startup::EXPECTED_TOOLS.len()) {
            let name = crate::server_startup::EXPECTED_TOOLS[index];
            let registry = ToolRegistry::standard();
            let entry = registry.get(name);
            prop_assert!(entry.is_some(), "{} should be registered", name);
            let entry = entry.unwrap();
            prop_assert_eq!(entry.tool.name.as_ref(), name);
            prop_assert!(validate_tool(&entry.tool).is_ok());
        }

        /// Names that are not registered are never resolved.
        #[test]
        fn unknown_names_are_not_resolved(name in "[a-z_]{1,40}") {
            let registry = ToolRegistry::standard();
            let known = crate::server_startup::EXPECTED_TOOLS.contains(&name.as_str());
            prop_assert_eq!(registry.get(&name).is_some(), known);
        }
    }
}
