/// Lifecycle hook tests
///
/// Hook ordering around dispense/load/store/trash for typed entities
/// Run with: cargo test --test lifecycle_tests

use rustbean::{AsBean, Bean, BeanError, BeanType, Lifecycle, Result, Value, lifecycle};

#[derive(Debug)]
struct Note {
    bean: Bean,
    events: Vec<&'static str>,
}

impl AsBean for Note {
    fn bean(&self) -> &Bean {
        &self.bean
    }

    fn bean_mut(&mut self) -> &mut Bean {
        &mut self.bean
    }
}

impl Lifecycle for Note {
    fn after_dispense(&mut self) -> Result<()> {
        self.events.push("after_dispense");
        self.bean.put("title", "untitled")?;
        Ok(())
    }

    fn before_load(&mut self) -> Result<()> {
        self.events.push("before_load");
        Ok(())
    }

    fn after_load(&mut self) -> Result<()> {
        self.events.push("after_load");
        Ok(())
    }

    fn before_store(&mut self) -> Result<()> {
        self.events.push("before_store");
        if self.bean.get::<String>("title").trim().is_empty() {
            return Err(BeanError::hook("before_store", "title is required"));
        }
        Ok(())
    }

    fn after_store(&mut self) -> Result<()> {
        self.events.push("after_store");
        Ok(())
    }

    fn before_trash(&mut self) -> Result<()> {
        self.events.push("before_trash");
        Ok(())
    }

    fn after_trash(&mut self) -> Result<()> {
        self.events.push("after_trash");
        Ok(())
    }
}

impl BeanType for Note {
    fn construct() -> Result<Self> {
        Ok(Note {
            bean: Bean::with_kind("note")?,
            events: Vec::new(),
        })
    }
}

fn row(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_dispense_fires_after_dispense() {
    let note: Note = lifecycle::dispense().unwrap();
    assert_eq!(note.events, vec!["after_dispense"]);
    assert_eq!(note.bean.kind(), Some("note"));
    assert_eq!(note.bean.get::<String>("title"), "untitled");
}

#[test]
fn test_load_fires_hooks_around_population() {
    let note = lifecycle::load::<Note, _>(|| {
        Ok(Some(row(&[
            ("id", Value::Integer(7)),
            ("title", Value::from("hi")),
        ])))
    })
    .unwrap()
    .expect("row exists");

    assert_eq!(note.events, vec!["before_load", "after_load"]);
    assert_eq!(note.bean.id(), Some(7));
    assert_eq!(note.bean.get::<String>("title"), "hi");
}

#[test]
fn test_load_missing_row_skips_after_load() {
    let mut note = Note::construct().unwrap();
    let found = lifecycle::load_into(&mut note, || Ok(None)).unwrap();

    assert!(!found);
    assert_eq!(note.events, vec!["before_load"]);
}

#[test]
fn test_load_failure_skips_after_load() {
    let mut note = Note::construct().unwrap();
    let result = lifecycle::load_into(&mut note, || Err(BeanError::Storage("offline".into())));

    assert!(matches!(result, Err(BeanError::Storage(_))));
    assert_eq!(note.events, vec!["before_load"]);
}

#[test]
fn test_store_assigns_id_before_after_store() {
    let mut note: Note = lifecycle::dispense().unwrap();
    note.bean.put("title", "groceries").unwrap();

    let id = lifecycle::store(&mut note, |bean| {
        assert_eq!(bean.get::<String>("title"), "groceries");
        Ok(41)
    })
    .unwrap();

    assert_eq!(id, 41);
    assert_eq!(note.bean.id(), Some(41));
    assert_eq!(note.events, vec!["after_dispense", "before_store", "after_store"]);
    assert_eq!(note.bean.to_string(), "note #41");
}

#[test]
fn test_failed_store_skips_after_store() {
    let mut note: Note = lifecycle::dispense().unwrap();

    let result = lifecycle::store(&mut note, |_| Err(BeanError::Storage("constraint".into())));

    assert!(result.is_err());
    assert_eq!(note.bean.id(), None);
    assert_eq!(note.events, vec!["after_dispense", "before_store"]);
}

#[test]
fn test_before_store_veto_prevents_persist() {
    let mut note: Note = lifecycle::dispense().unwrap();
    note.bean.put("title", "  ").unwrap();

    let result = lifecycle::store(&mut note, |_| panic!("persist must not run"));

    match result {
        Err(BeanError::HookFailed { hook, message }) => {
            assert_eq!(hook, "before_store");
            assert_eq!(message, "title is required");
        }
        other => panic!("expected hook veto, got {:?}", other),
    }
    assert_eq!(note.events, vec!["after_dispense", "before_store"]);
}

#[test]
fn test_trash_fires_hooks_only_on_success() {
    let mut note: Note = lifecycle::dispense().unwrap();
    note.bean.set_id(Some(3));

    let failed = lifecycle::trash(&mut note, |_| Err(BeanError::Storage("locked".into())));
    assert!(failed.is_err());
    assert_eq!(note.events, vec!["after_dispense", "before_trash"]);

    note.events.clear();
    let trashed = lifecycle::trash(&mut note, |bean| {
        assert_eq!(bean.id(), Some(3));
        Ok(())
    })
    .unwrap();
    assert!(trashed);
    assert_eq!(note.events, vec!["before_trash", "after_trash"]);
}

#[test]
fn test_plain_bean_uses_default_hooks() {
    let mut bean = lifecycle::dispense_kind("memo").unwrap();
    bean.put("body", "text").unwrap();

    let id = lifecycle::store(&mut bean, |_| Ok(1)).unwrap();
    assert_eq!(id, 1);
    assert!(lifecycle::trash(&mut bean, |_| Ok(())).unwrap());
}
