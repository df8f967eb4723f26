//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use roomstamp::DungeonError;
    use roomstamp::io::error::invalid_parameter;
    use std::error::Error;

    // Tests file system errors keep their io source
    // Verified by dropping the #[source] attribute
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = DungeonError::FileSystem {
            path: "/tmp/dungeon.json".into(),
            operation: "read settings",
            source: io_error,
        };

        assert!(error.source().is_some());
        let message = error.to_string();
        assert!(message.contains("read settings"));
        assert!(message.contains("/tmp/dungeon.json"));
    }

    // Tests the parameter helper fills every field
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("scale", &0, &"must be at least 1");
        let message = error.to_string();
        assert!(message.contains("scale"));
        assert!(message.contains('0'));
        assert!(message.contains("must be at least 1"));
    }

    // Tests terrain errors name the rejected indices
    #[test]
    fn test_invalid_terrain_message() {
        let error = DungeonError::InvalidTerrain {
            terrain_set: 3,
            terrain: 1,
            available: 2,
        };
        let message = error.to_string();
        assert!(message.contains("set 3"));
        assert!(message.contains("2 available"));
    }

    // Tests settings errors chain the JSON error
    #[test]
    fn test_settings_error_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").err();
        let source = json_error.expect("settings error keeps its source");
        let error = DungeonError::Settings {
            path: "broken.json".into(),
            source,
        };
        assert!(error.source().is_some());
        assert!(error.to_string().contains("broken.json"));
    }

    // Tests unit variants render stable messages
    #[test]
    fn test_simple_variants() {
        assert!(DungeonError::MissingTileSource.to_string().contains("tile source"));
        assert!(DungeonError::GenerationInProgress.to_string().contains("in progress"));
        assert!(DungeonError::UnknownLayout(7).to_string().contains('7'));
    }
}
