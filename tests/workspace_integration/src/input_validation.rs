//! Input parameter validation tests.
//!
//! Invalid parameters must produce an MCP invalid-params error naming the
//! offending field, and the engine must never be started for them.

#[cfg(test)]
mod tests {
    use crate::stub_engine::stub_server;
    use rmcp::model::ErrorCode;
    use serde_json::{Value, json};
    use vfx_mcp_editor::params::*;

    fn args(value: Value) -> Option<serde_json::Map<String, Value>> {
        value.as_object().cloned()
    }

    /// Invoke a tool that must be rejected; returns the error message.
    async fn rejected(tool: &str, arguments: Value) -> String {
        let (server, engine) = stub_server();
        let err = server
            .invoke(tool, args(arguments))
            .await
            .expect_err("call should be rejected");
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS, "{}: {}", tool, err.message);
        assert_eq!(engine.run_count(), 0, "{} must not reach the engine", tool);
        err.message.to_string()
    }

    #[test]
    fn test_trim_rejects_negative_start() {
        let params = TrimVideoParams {
            input_path: "in.mp4".to_string(),
            output_path: "out.mp4".to_string(),
            start_time: -1.0,
            duration: Some(0.0),
        };
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "start_time"));
        assert!(errors.iter().any(|e| e.field == "duration"));
    }

    #[test]
    fn test_resize_requires_exactly_one_mode() {
        let base = ResizeVideoParams {
            input_path: "in.mp4".to_string(),
            output_path: "out.mp4".to_string(),
            width: None,
            height: None,
            scale: None,
        };
        assert!(base.validate().is_err());

        let both = ResizeVideoParams { width: Some(640), scale: Some(0.5), ..base.clone() };
        assert!(both.validate().is_err());

        let exact = ResizeVideoParams { width: Some(640), height: Some(480), ..base };
        assert_eq!(exact.validate().unwrap().filter(), "scale=640:480");
    }

    #[test]
    fn test_merge_rejects_mismatched_lists() {
        let params = MergeAudioParams {
            audio_paths: vec!["a.wav".to_string(), "b.wav".to_string()],
            output_path: "mix.wav".to_string(),
            volumes: Some(vec![1.0]),
            delays: Some(vec![0.0, -2.0]),
            mix_mode: MixMode::Mix,
        };
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "volumes"));
        assert!(errors.iter().any(|e| e.field == "delays"));
    }

    #[tokio::test]
    async fn test_unknown_enum_value_is_invalid_params() {
        let message = rejected(
            "apply_filter",
            json!({ "input_path": "a.mp4", "output_path": "b.mp4", "filter": "cartoon" }),
        )
        .await;
        assert!(message.contains("Invalid parameters"));
    }

    #[tokio::test]
    async fn test_missing_arguments_are_invalid_params() {
        let (server, _) = stub_server();
        let err = server.invoke("get_video_info", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("Missing parameters"));
    }

    #[tokio::test]
    async fn test_field_errors_are_aggregated() {
        let message = rejected(
            "add_text_overlay",
            json!({
                "input_path": "", "output_path": "b.mp4", "text": "",
                "font_size": 2, "position": "somewhere"
            }),
        )
        .await;
        for field in ["input_path", "text", "font_size", "position"] {
            assert!(message.contains(&format!("{}:", field)), "missing {} in {}", field, message);
        }
        assert!(message.contains("; "));
    }

    #[tokio::test]
    async fn test_layout_input_counts() {
        let message = rejected(
            "create_video_mosaic",
            json!({
                "input_paths": ["a.mp4", "b.mp4"], "output_path": "m.mp4", "layout": "3x1"
            }),
        )
        .await;
        assert!(message.contains("requires 3 videos"));

        rejected(
            "create_video_mosaic",
            json!({ "input_paths": ["a.mp4"], "output_path": "m.mp4", "layout": "two-by-two" }),
        )
        .await;

        let message = rejected(
            "create_split_screen",
            json!({
                "video_paths": ["a.mp4", "b.mp4"], "output_path": "s.mp4", "layout": "quad"
            }),
        )
        .await;
        assert!(message.contains("exactly 4 videos"));
    }

    #[tokio::test]
    async fn test_mosaic_grid_is_bounded() {
        for layout in ["65536x65536", "2000x1", "17x1"] {
            let message = rejected(
                "create_video_mosaic",
                json!({ "input_paths": ["a.mp4"], "output_path": "m.mp4", "layout": layout }),
            )
            .await;
            assert!(message.contains("layout:"), "{}", message);
            assert!(message.contains("maximum grid"), "{}", message);
        }
    }

    #[tokio::test]
    async fn test_loop_crossfade_must_fit() {
        let message = rejected(
            "create_loop_video",
            json!({
                "input_path": "a.mp4", "output_path": "l.mp4",
                "loop_duration": 2.0, "crossfade_duration": 1.0
            }),
        )
        .await;
        assert!(message.contains("crossfade_duration"));
    }

    #[tokio::test]
    async fn test_colors_and_ranges() {
        rejected(
            "create_split_screen",
            json!({
                "video_paths": ["a.mp4", "b.mp4"], "output_path": "s.mp4",
                "border_color": "not-a-colour"
            }),
        )
        .await;

        rejected(
            "create_picture_in_picture",
            json!({
                "main_video_path": "a.mp4", "overlay_video_path": "b.mp4",
                "output_path": "p.mp4", "scale": 1.5
            }),
        )
        .await;

        rejected(
            "apply_video_stabilization",
            json!({ "input_path": "a.mp4", "output_path": "b.mp4", "strength": 11 }),
        )
        .await;

        rejected(
            "create_video_transitions",
            json!({
                "video_paths": ["a.mp4", "b.mp4"], "output_path": "t.mp4",
                "transition_duration": 0.0
            }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_transition_longer_than_clip() {
        // the stub reports 5 second clips
        let message = rejected(
            "create_video_transitions",
            json!({
                "video_paths": ["a.mp4", "b.mp4"], "output_path": "t.mp4",
                "transition_duration": 5.0
            }),
        )
        .await;
        assert!(message.contains("longer than"));
    }
}

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use vfx_mcp_editor::params::*;

    proptest! {
        /// Non-positive speeds are always rejected.
        #[test]
        fn non_positive_speed_rejected(speed in -100.0f64..=0.0) {
            let params = ChangeSpeedParams {
                input_path: "in.mp4".to_string(),
                output_path: "out.mp4".to_string(),
                speed,
            };
            let errors = params.validate().unwrap_err();
            prop_assert!(errors.iter().any(|e| e.field == "speed"));
        }

        /// Positive finite speeds are always accepted.
        #[test]
        fn positive_speed_accepted(speed in 0.01f64..100.0) {
            let params = ChangeSpeedParams {
                input_path: "in.mp4".to_string(),
                output_path: "out.mp4".to_string(),
                speed,
            };
            prop_assert!(params.validate().is_ok());
        }

        /// A grid accepts exactly the inputs it has cells for, or more.
        #[test]
        fn mosaic_needs_enough_inputs(cols in 1u32..=4, rows in 1u32..=4, count in 1usize..=16) {
            let params = CreateMosaicParams {
                input_paths: (0..count).map(|i| format!("v{}.mp4", i)).collect(),
                output_path: "grid.mp4".to_string(),
                layout: format!("{}x{}", cols, rows),
                audio_source: -1,
            };
            let cells = (cols * rows) as usize;
            prop_assert_eq!(params.validate().is_ok(), count >= cells);
        }

        /// Green screen tuning values are clamped rather than rejected.
        #[test]
        fn chroma_values_clamped(similarity in -5.0f64..5.0, blend in -5.0f64..5.0) {
            let params: GreenScreenParams = serde_json::from_value(serde_json::json!({
                "input_path": "fg.mp4",
                "output_path": "out.mp4",
                "similarity": similarity,
                "blend": blend,
            })).unwrap();
            let spec = params.validate().unwrap();
            prop_assert!((0.0..=1.0).contains(&spec.similarity));
            prop_assert!((0.0..=1.0).contains(&spec.blend));
        }
    }
}
