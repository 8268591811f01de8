// Restart durability: a fresh store on the same location must see
// everything the previous one wrote.

use std::path::Path;
use std::sync::Arc;

use modernapp_prefs::{AppPreferences, BackendKind, PreferenceStore, PrefsError, StoreConfig};

fn open(dir: &Path, backend: BackendKind) -> PreferenceStore {
    PreferenceStore::open(&StoreConfig::in_dir(dir, backend)).unwrap()
}

fn on_disk_backends() -> Vec<BackendKind> {
    let mut kinds = vec![BackendKind::Json];
    if cfg!(feature = "sqlite") {
        kinds.push(BackendKind::Sqlite);
    }
    kinds
}

// -------------------------------------------------------------------------
// Raw store
// -------------------------------------------------------------------------

#[test]
fn writes_survive_restart() {
    for kind in on_disk_backends() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = open(dir.path(), kind);
            store.set_bool("notifications_enabled", false).unwrap();
            store.set_string("user_name", "Alice").unwrap();
            store.set_int("launch_count", 12).unwrap();
            store.set_float("font_scale", 1.25).unwrap();
        }

        let store = open(dir.path(), kind);
        assert!(!store.get_bool("notifications_enabled", true), "{kind:?}");
        assert_eq!(store.get_string("user_name", Some("John Doe")).as_deref(), Some("Alice"));
        assert_eq!(store.get_int("launch_count", 0), 12);
        assert_eq!(store.get_float("font_scale", 1.0), 1.25);
    }
}

#[test]
fn first_launch_survives_restart() {
    for kind in on_disk_backends() {
        let dir = tempfile::tempdir().unwrap();

        assert!(open(dir.path(), kind).is_first_launch());
        open(dir.path(), kind).mark_launched().unwrap();
        assert!(!open(dir.path(), kind).is_first_launch(), "{kind:?}");
    }
}

#[test]
fn clear_survives_restart() {
    for kind in on_disk_backends() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = open(dir.path(), kind);
            store.set_bool("dark_mode_enabled", true).unwrap();
            store.set_string("user_email", "a@example.com").unwrap();
            store.clear_all(&["first_launch"]).unwrap();
        }

        let store = open(dir.path(), kind);
        assert!(!store.is_first_launch(), "{kind:?}");
        assert!(!store.get_bool("dark_mode_enabled", false));
        assert_eq!(store.get_string("user_email", None), None);
        assert_eq!(store.snapshot().len(), 1);
    }
}

#[test]
fn json_namespace_file_is_flat_object() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path(), BackendKind::Json);
    store.set_bool("dark_mode_enabled", true).unwrap();
    store.set_string("user_name", "Alice").unwrap();

    let contents = std::fs::read_to_string(dir.path().join("modern_app_prefs.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json, serde_json::json!({"dark_mode_enabled": true, "user_name": "Alice"}));
}

#[test]
fn non_finite_float_is_refused_by_json_and_namespace_survives() {
    for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = open(dir.path(), BackendKind::Json);
            store.set_string("user_name", "Alice").unwrap();
            store.mark_launched().unwrap();
            let err = store.set_float("font_scale", n).unwrap_err();
            assert!(matches!(err, PrefsError::Serialize(_)), "{n}");
            assert_eq!(store.get_float("font_scale", 1.0), 1.0);
        }

        let store = open(dir.path(), BackendKind::Json);
        assert_eq!(store.get_string("user_name", None).as_deref(), Some("Alice"), "{n}");
        assert!(!store.is_first_launch());
        assert_eq!(store.get_float("font_scale", 1.0), 1.0);
    }
}

#[cfg(feature = "sqlite")]
#[test]
fn non_finite_float_survives_sqlite_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = open(dir.path(), BackendKind::Sqlite);
        store.set_float("nan", f64::NAN).unwrap();
        store.set_float("inf", f64::INFINITY).unwrap();
        store.set_float("neg_inf", f64::NEG_INFINITY).unwrap();
    }

    let store = open(dir.path(), BackendKind::Sqlite);
    assert!(store.get_float("nan", 0.0).is_nan());
    assert_eq!(store.get_float("inf", 0.0), f64::INFINITY);
    assert_eq!(store.get_float("neg_inf", 0.0), f64::NEG_INFINITY);
}

#[test]
fn null_entry_in_namespace_file_drops_only_itself() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("modern_app_prefs.json"),
        r#"{"font_scale": null, "first_launch": false, "user_name": "Alice"}"#,
    )
    .unwrap();

    let store = open(dir.path(), BackendKind::Json);
    assert_eq!(store.get_string("user_name", None).as_deref(), Some("Alice"));
    assert!(!store.is_first_launch());
    assert_eq!(store.get_float("font_scale", 1.0), 1.0);
    assert_eq!(store.snapshot().len(), 2);
}

#[test]
fn memory_backend_forgets_on_restart() {
    let dir = tempfile::tempdir().unwrap();
    open(dir.path(), BackendKind::Memory).set_bool("k", true).unwrap();
    assert!(!open(dir.path(), BackendKind::Memory).get_bool("k", false));
}

#[test]
fn reload_reflects_other_writer() {
    let dir = tempfile::tempdir().unwrap();
    let reader = open(dir.path(), BackendKind::Json);
    let writer = open(dir.path(), BackendKind::Json);

    writer.set_string("user_name", "Alice").unwrap();
    assert_eq!(reader.get_string("user_name", None), None);

    reader.reload().unwrap();
    assert_eq!(reader.get_string("user_name", None).as_deref(), Some("Alice"));
}

// -------------------------------------------------------------------------
// Typed facade
// -------------------------------------------------------------------------

#[test]
fn profile_edits_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let prefs = AppPreferences::new(Arc::new(open(dir.path(), BackendKind::Json)));
        prefs.set_user_name("Alice").unwrap();
        prefs.set_user_email("alice@example.com").unwrap();
        prefs.set_notifications_enabled(false).unwrap();
        prefs.mark_launched().unwrap();
    }

    let prefs = AppPreferences::new(Arc::new(open(dir.path(), BackendKind::Json)));
    let profile = prefs.profile();
    assert_eq!(profile.user_name, "Alice");
    assert_eq!(profile.user_email, "alice@example.com");
    assert!(!profile.notifications_enabled);
    assert!(!profile.dark_mode_enabled);
    assert!(!profile.first_launch);
}

#[test]
fn reads_previously_saved_namespace_file() {
    // A namespace file as an existing install would have left it
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("modern_app_prefs.json"),
        r#"{
            "notifications_enabled": false,
            "dark_mode_enabled": true,
            "user_name": "Jane Roe",
            "user_email": "jane@example.com"
        }"#,
    )
    .unwrap();

    let prefs = AppPreferences::new(Arc::new(open(dir.path(), BackendKind::Json)));
    assert!(!prefs.notifications_enabled());
    assert!(prefs.dark_mode_enabled());
    assert_eq!(prefs.user_name(), "Jane Roe");
    assert_eq!(prefs.user_email(), "jane@example.com");
    assert!(prefs.is_first_launch());
}
