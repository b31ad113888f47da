fn main() {
    println!("Run `cargo test -p wire-compat` to check the renderer wire format.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use traybridge_protocol::{
        Action, Event, Menu, decode_action, decode_event, encode_action, encode_event, encode_menu,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Fixture as raw text, as a renderer would emit or expect it.
    fn fixture_text(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    fn load_fixture(name: &str) -> serde_json::Value {
        serde_json::from_str(&fixture_text(name))
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"))
    }

    /// Collapses a pretty-printed fixture onto one wire line.
    fn wire_line(name: &str) -> String {
        load_fixture(name).to_string()
    }

    /// Deserializes a fixture, re-serializes it, and compares the JSON
    /// values (key order independent).
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  ours: {reserialized}"
        );
    }

    // --- Controller to renderer ---

    #[test]
    fn fixture_update_item() {
        roundtrip_test::<Action>("update_item.json");
    }

    #[test]
    fn fixture_update_menu() {
        roundtrip_test::<Action>("update_menu.json");
    }

    #[test]
    fn fixture_update_menu_and_item() {
        roundtrip_test::<Action>("update_menu_and_item.json");
    }

    #[test]
    fn fixture_legacy_menu() {
        roundtrip_test::<Menu>("legacy_menu.json");
    }

    #[test]
    fn encoded_actions_match_fixtures() {
        for name in [
            "update_item.json",
            "update_menu.json",
            "update_menu_and_item.json",
        ] {
            let action = decode_action(&wire_line(name)).unwrap();
            let line = encode_action(&action).unwrap();
            assert!(line.ends_with('\n'));
            assert_eq!(line.matches('\n').count(), 1, "{name} spans one line");
            let encoded: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert_eq!(encoded, load_fixture(name), "{name}");
        }
    }

    #[test]
    fn encoded_menu_has_no_tag() {
        let menu: Menu = serde_json::from_value(load_fixture("legacy_menu.json")).unwrap();
        let encoded: serde_json::Value =
            serde_json::from_str(&encode_menu(&menu).unwrap()).unwrap();
        assert!(encoded.get("type").is_none());
        assert_eq!(encoded, load_fixture("legacy_menu.json"));
    }

    // --- Renderer to controller ---

    #[test]
    fn fixture_ready() {
        roundtrip_test::<Event>("ready.json");
        assert_eq!(decode_event(&wire_line("ready.json")).unwrap(), Event::Ready);
    }

    #[test]
    fn fixture_clicked() {
        roundtrip_test::<Event>("clicked.json");
        match decode_event(&wire_line("clicked.json")).unwrap() {
            Event::Clicked(click) => {
                assert_eq!(click.seq_id, 7);
                assert_eq!(click.item.title, "B (√)");
                assert!(click.item.checked);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn minimal_click_fills_defaults() {
        match decode_event(&wire_line("clicked_minimal.json")).unwrap() {
            Event::Clicked(click) => {
                assert_eq!(click.seq_id, 3);
                assert_eq!(click.item.title, "Quit");
                assert!(click.item.tooltip.is_empty());
                assert!(!click.item.checked);
                assert!(click.item.enabled);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn events_tolerate_unknown_fields() {
        let line = r#"{"type":"clicked","item":{"title":"x","icon":"ignored"},"seq_id":1,"extra":true}"#;
        assert!(matches!(decode_event(line).unwrap(), Event::Clicked(_)));
    }

    #[test]
    fn encoded_events_decode_back() {
        for name in ["ready.json", "clicked.json"] {
            let event = decode_event(&wire_line(name)).unwrap();
            let line = encode_event(&event).unwrap();
            assert_eq!(decode_event(&line).unwrap(), event, "{name}");
        }
    }
}
