// JSON-backed template and visit store behavior

use ambient_scribe::store::{
    JsonTemplateStore, JsonVisitStore, NewVisit, TemplateStore, VisitStore, MAX_VISITS,
};
use anyhow::Result;
use tempfile::TempDir;

fn new_visit(tag: &str) -> NewVisit {
    NewVisit {
        template_name: "New Patient ENT Visit".to_string(),
        patient_name: Some(format!("Patient {}", tag)),
        patient_dob: None,
        note: format!("note {}", tag),
        transcript: format!("transcript {}", tag),
    }
}

#[test]
fn test_built_in_templates_listed_by_default() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonTemplateStore::new(dir.path().join("templates.json"))?;

    let templates = store.list()?;
    assert_eq!(templates.len(), 5);
    assert!(templates.iter().all(|t| t.is_default));

    let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"New Patient ENT Visit"));
    assert!(names.contains(&"Post-Op Check"));
    Ok(())
}

#[test]
fn test_save_and_get_custom_template() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("templates.json");
    let store = JsonTemplateStore::new(&path)?;

    let saved = store.save("Allergy Follow-Up", "SUBJECTIVE:\n\nPLAN:")?;
    assert!(saved.id.starts_with("custom-"));
    assert!(!saved.is_default);

    let fetched = store.get(&saved.id)?.expect("saved template should be found");
    assert_eq!(fetched.name, "Allergy Follow-Up");
    assert_eq!(fetched.content, "SUBJECTIVE:\n\nPLAN:");

    // Custom templates survive a store reopen
    let reopened = JsonTemplateStore::new(&path)?;
    assert_eq!(reopened.list()?.len(), 6);
    Ok(())
}

#[test]
fn test_update_custom_template() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonTemplateStore::new(dir.path().join("templates.json"))?;

    let saved = store.save("Draft", "BODY")?;
    store.update(&saved.id, Some("Final"), None)?;

    let fetched = store.get(&saved.id)?.expect("template should exist");
    assert_eq!(fetched.name, "Final");
    assert_eq!(fetched.content, "BODY", "content untouched when not provided");
    Ok(())
}

#[test]
fn test_delete_custom_template() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonTemplateStore::new(dir.path().join("templates.json"))?;

    let saved = store.save("Disposable", "X")?;
    store.delete(&saved.id)?;

    assert!(store.get(&saved.id)?.is_none());
    assert_eq!(store.list()?.len(), 5);
    Ok(())
}

#[test]
fn test_built_ins_are_immutable() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonTemplateStore::new(dir.path().join("templates.json"))?;

    let built_in_id = store.list()?[0].id.clone();
    store.update(&built_in_id, Some("Renamed"), Some("Rewritten"))?;
    store.delete(&built_in_id)?;

    let still_there = store.get(&built_in_id)?.expect("built-in should remain");
    assert_ne!(still_there.name, "Renamed");
    assert_eq!(store.list()?.len(), 5);
    Ok(())
}

#[test]
fn test_visits_listed_newest_first() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonVisitStore::new(dir.path().join("visits.json"))?;

    store.save(new_visit("first"))?;
    store.save(new_visit("second"))?;
    store.save(new_visit("third"))?;

    let visits = store.list()?;
    assert_eq!(visits.len(), 3);
    assert_eq!(visits[0].note, "note third");
    assert_eq!(visits[2].note, "note first");
    Ok(())
}

#[test]
fn test_visit_cap_drops_oldest() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonVisitStore::new(dir.path().join("visits.json"))?;

    for i in 0..(MAX_VISITS + 3) {
        store.save(new_visit(&i.to_string()))?;
    }

    let visits = store.list()?;
    assert_eq!(visits.len(), MAX_VISITS);
    assert_eq!(visits[0].note, format!("note {}", MAX_VISITS + 2));
    assert!(
        visits.iter().all(|v| v.note != "note 0"),
        "oldest visits past the cap are discarded"
    );
    Ok(())
}

#[test]
fn test_visit_delete() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("visits.json");
    let store = JsonVisitStore::new(&path)?;

    let keep = store.save(new_visit("keep"))?;
    let gone = store.save(new_visit("gone"))?;

    store.delete(&gone.id)?;

    let visits = store.list()?;
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].id, keep.id);

    // Deletion is persisted
    let reopened = JsonVisitStore::new(&path)?;
    assert_eq!(reopened.list()?.len(), 1);
    Ok(())
}
