//! Canned platform documents for tests.

use serde_json::{json, Value};

pub(crate) const PLATFORM: &str = "https://fs.test/platform";

pub(crate) fn person_url(id: &str) -> String {
    format!("{}/tree/persons/{}.json", PLATFORM, id)
}

pub(crate) fn parents_url(id: &str) -> String {
    format!("{}/tree/persons/{}/parents.json", PLATFORM, id)
}

pub(crate) fn children_url(id: &str) -> String {
    format!("{}/tree/persons/{}/children.json", PLATFORM, id)
}

pub(crate) fn spouses_url(id: &str) -> String {
    format!("{}/tree/persons/{}/spouses.json", PLATFORM, id)
}

pub(crate) fn couple_url(id: &str) -> String {
    format!("{}/tree/couple-relationships/{}.json", PLATFORM, id)
}

fn reference(id: Option<&str>) -> Option<Value> {
    id.map(|id| json!({ "resourceId": id }))
}

fn fact(kind: &str, date: Option<&str>, place: Option<&str>) -> Value {
    let mut fact = json!({ "type": format!("http://gedcomx.org/{}", kind) });
    if let Some(date) = date {
        fact["date"] = json!({ "original": date });
    }
    if let Some(place) = place {
        fact["place"] = json!({ "original": place });
    }
    fact
}

/// `gender` is the short GEDCOM X term, e.g. `"Male"`
pub(crate) fn person_json(
    given: Option<&str>,
    surname: Option<&str>,
    gender: Option<&str>,
    facts: &[(&str, Option<&str>, Option<&str>)],
) -> Value {
    let mut parts = Vec::new();
    if let Some(given) = given {
        parts.push(json!({ "type": "http://gedcomx.org/Given", "value": given }));
    }
    if let Some(surname) = surname {
        parts.push(json!({ "type": "http://gedcomx.org/Surname", "value": surname }));
    }
    let mut person = json!({
        "names": [{ "nameForms": [{ "parts": parts }] }],
        "facts": facts.iter().map(|(k, d, p)| fact(k, *d, *p)).collect::<Vec<_>>(),
    });
    if let Some(gender) = gender {
        person["gender"] = json!({ "type": format!("http://gedcomx.org/{}", gender) });
    }
    json!({ "persons": [person] })
}

pub(crate) fn parents_json(father: Option<&str>, mother: Option<&str>) -> Value {
    let mut rel = json!({});
    if let Some(f) = reference(father) {
        rel["father"] = f;
    }
    if let Some(m) = reference(mother) {
        rel["mother"] = m;
    }
    json!({ "childAndParentsRelationships": [rel] })
}

pub(crate) fn children_json(triples: &[(Option<&str>, Option<&str>, &str)]) -> Value {
    let rels: Vec<Value> = triples
        .iter()
        .map(|(father, mother, child)| {
            let mut rel = json!({ "child": { "resourceId": child } });
            if let Some(f) = reference(*father) {
                rel["father"] = f;
            }
            if let Some(m) = reference(*mother) {
                rel["mother"] = m;
            }
            rel
        })
        .collect();
    json!({ "childAndParentsRelationships": rels })
}

pub(crate) fn spouses_json(couples: &[(&str, &str, &str)]) -> Value {
    let rels: Vec<Value> = couples
        .iter()
        .map(|(p1, p2, id)| {
            json!({
                "id": id,
                "person1": { "resourceId": p1 },
                "person2": { "resourceId": p2 },
            })
        })
        .collect();
    json!({ "relationships": rels })
}

pub(crate) fn marriage_json(date: Option<&str>, place: Option<&str>) -> Value {
    json!({ "relationships": [{ "facts": [fact("Marriage", date, place)] }] })
}
