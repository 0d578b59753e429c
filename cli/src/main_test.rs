mod tests {
    use crate::config::*;
    use crate::*;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).expect("should parse")
    }

    #[test]
    fn test_cli_args_accepts_paths_outside_cwd() {
        let parsed = args(&["cursorctx", "../pkg/main.go", "--offset", "10"]);
        assert_eq!(parsed.file, PathBuf::from("../pkg/main.go"));
        assert_eq!(parsed.offset, Some(10));
    }

    #[test]
    fn test_cli_args_offset_conflicts_with_line() {
        let err = CliArgs::try_parse_from(["cursorctx", "a.go", "--offset", "3", "--line", "1", "--column", "2"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_cli_args_line_requires_column() {
        assert!(CliArgs::try_parse_from(["cursorctx", "a.go", "--line", "1"]).is_err());
    }

    #[test]
    fn test_cli_args_stdin() {
        assert!(args(&["cursorctx", "-"]).reads_stdin());
        assert!(!args(&["cursorctx", "a.go"]).reads_stdin());
    }

    #[test]
    fn test_resolve_cursor() {
        let src = "package main\nfunc f() { fmt.Pr }";
        assert_eq!(resolve_cursor(src, &args(&["cursorctx", "a.go"])).unwrap(), src.len());
        assert_eq!(resolve_cursor(src, &args(&["cursorctx", "a.go", "--offset", "4"])).unwrap(), 4);
        assert_eq!(
            resolve_cursor(src, &args(&["cursorctx", "a.go", "--offset", "999"])).unwrap(),
            src.len()
        );
        assert_eq!(
            resolve_cursor(src, &args(&["cursorctx", "a.go", "--line", "2", "--column", "18"])).unwrap(),
            30
        );
        let err = resolve_cursor(src, &args(&["cursorctx", "a.go", "--line", "9", "--column", "1"])).unwrap_err();
        assert!(err.to_string().contains("Invalid cursor position 9:1"));
    }

    #[test]
    fn test_render_text_and_json() {
        let src = "x := 1\nfoo.Bar.Ba";
        let context = classify(src, src.len());
        let report = Report {
            cursor: offset_to_position(src, src.len()),
            context: &context,
        };
        assert_eq!(
            render(&report, OutputFormat::Text).unwrap(),
            "context=select\nexpr=foo.Bar\npartial=Ba\ncursor=2:11"
        );
        let json: serde_json::Value = serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["context"], "select");
        assert_eq!(json["expr"], "foo.Bar");
        assert_eq!(json["partial"], "Ba");
        assert_eq!(json["cursor"]["line"], 2);
        assert_eq!(json["cursor"]["column"], 11);
        assert_eq!(json["cursor"]["offset"], 17);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::resolve(Overrides::default(), ConfigFile::default()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert_eq!(settings.format, OutputFormat::Text);
    }

    #[test]
    fn test_settings_precedence() {
        let file = ConfigFile::parse(
            r#"
[analysis]
max_input_bytes = 1024

[output]
format = "json"

[log]
filter = "cursorctx_core=trace"
"#,
        )
        .expect("valid config");

        let from_file = Settings::resolve(Overrides::default(), file.clone()).unwrap();
        assert_eq!(from_file.max_input_bytes, 1024);
        assert_eq!(from_file.format, OutputFormat::Json);
        assert_eq!(from_file.log_filter.as_deref(), Some("cursorctx_core=trace"));

        let overrides = Overrides {
            max_input_bytes: Some(10),
            format: Some(OutputFormat::Text),
            log_filter: None,
        };
        let merged = Settings::resolve(overrides, file).unwrap();
        assert_eq!(merged.max_input_bytes, 10);
        assert_eq!(merged.format, OutputFormat::Text);
        assert_eq!(merged.log_filter.as_deref(), Some("cursorctx_core=trace"));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let file = ConfigFile::parse("[analysis]\nmax_input_bytes = 0\n").unwrap();
        let err = Settings::resolve(Overrides::default(), file).unwrap_err();
        assert!(err.to_string().contains("max_input_bytes must be greater than 0"));

        let overrides = Overrides {
            max_input_bytes: Some(0),
            ..Overrides::default()
        };
        assert!(Settings::resolve(overrides, ConfigFile::default()).is_err());
    }

    #[test]
    fn test_config_rejects_unknown_sections_and_formats() {
        assert!(ConfigFile::parse("[server]\nport = 1\n").is_err());
        assert!(ConfigFile::parse("[output]\nformat = \"yaml\"\n").is_err());
        assert!(ConfigFile::parse("").is_ok());
    }
}
