//! Integration tests for contact filtering through the search controller.

use contact_book::domain::ContactId;
use contact_book::models::{Contact, NewContact};
use contact_book::search::{filter_contacts, tokenizer::tokenize, CombineWith, SearchOptions};
use contact_book::services::{ContactBookState, ContactSnapshot, SearchController};

fn contact(id: u64, name: &str, address: &str, postal_code: &str, city: &str) -> Contact {
    Contact::new(
        ContactId::from(id),
        NewContact::new(name, address, postal_code, city),
    )
}

fn directory() -> Vec<Contact> {
    vec![
        contact(1, "Ann Smith", "1 Main Street", "A1 2BC", "Springfield"),
        contact(2, "Bob Jones", "22 Oak Avenue", "B2 3CD", "Shelbyville"),
        contact(3, "Annabelle Lee", "3 Elm Road", "C3 4DE", "Springfield"),
        contact(4, "Carl Mainz", "4 Harbour Way", "D4 5EF", "Capital City"),
        contact(5, "Dora Oakley", "5 Pine Close", "E5 6FG", "Ogdenville"),
    ]
}

fn ids(contacts: &[Contact]) -> Vec<&str> {
    contacts
        .iter()
        .filter_map(|c| c.id.as_ref().map(|id| id.as_str()))
        .collect()
}

#[test]
fn test_scenario_single_contact() {
    let controller = SearchController::default();
    let snapshot = ContactSnapshot::loaded(vec![contact(1, "Ann", "1 St", "A1", "X")], 1);
    let mut state = ContactBookState::new();

    controller.on_search_value_change(&mut state, "An");
    assert!(controller.evaluate(&mut state, &snapshot));
    let visible = controller.visible_contacts(&state, &snapshot).unwrap();
    assert_eq!(ids(visible), vec!["1"]);

    controller.on_search_value_change(&mut state, "");
    assert!(controller.evaluate(&mut state, &snapshot));
    let visible = controller.visible_contacts(&state, &snapshot).unwrap();
    assert_eq!(visible, snapshot.contacts().unwrap().as_slice());
}

#[test]
fn test_empty_query_returns_full_set_unchanged() {
    let contacts = directory();
    let controller = SearchController::default();
    let snapshot = ContactSnapshot::loaded(contacts.clone(), 1);
    let mut state = ContactBookState::new();

    controller.on_search_value_change(&mut state, "Spring");
    controller.evaluate(&mut state, &snapshot);
    controller.on_search_value_change(&mut state, "");
    controller.evaluate(&mut state, &snapshot);

    assert_eq!(state.filtered(), Some(contacts.as_slice()));
}

#[test]
fn test_every_prefix_of_every_word_is_found() {
    let contacts = directory();
    let options = SearchOptions::default();

    for contact in &contacts {
        for value in [&contact.name, &contact.address, &contact.postal_code, &contact.city] {
            for word in tokenize(value) {
                let chars: Vec<char> = word.chars().collect();
                for end in 1..=chars.len() {
                    let prefix: String = chars[..end].iter().collect();
                    let result = filter_contacts(&contacts, &prefix, options);
                    assert!(
                        result.contains(contact),
                        "'{}' did not find {}",
                        prefix,
                        contact.name
                    );
                }
            }
        }
    }
}

#[test]
fn test_typo_within_budget_still_matches() {
    let contacts = vec![contact(1, "Ann", "1 Main Street", "A1", "Springfield")];
    let options = SearchOptions::default();

    // "sprngfield" is one deletion away; budget is round(10 * 0.2) = 2
    assert_eq!(filter_contacts(&contacts, "sprngfield", options).len(), 1);
    // "stret" is one deletion away; budget is round(5 * 0.2) = 1
    assert_eq!(filter_contacts(&contacts, "stret", options).len(), 1);
    // two edits on a five letter term exceed the budget
    assert!(filter_contacts(&contacts, "strxx", options).is_empty());
}

#[test]
fn test_results_keep_source_order() {
    let contacts = directory();
    let result = filter_contacts(&contacts, "springfield", SearchOptions::default());
    assert_eq!(ids(&result), vec!["1", "3"]);

    let mut reversed = contacts.clone();
    reversed.reverse();
    let result = filter_contacts(&reversed, "springfield", SearchOptions::default());
    assert_eq!(ids(&result), vec!["3", "1"]);
}

#[test]
fn test_multi_word_query_keeps_partial_matches() {
    let contacts = directory();
    let result = filter_contacts(&contacts, "annabelle bob", SearchOptions::default());
    assert_eq!(ids(&result), vec!["2", "3"]);

    let result = filter_contacts(&contacts, "dora zzzzzz", SearchOptions::default());
    assert_eq!(ids(&result), vec!["5"]);
}

#[test]
fn test_and_combination_narrows_results() {
    let contacts = directory();
    let options = SearchOptions {
        combine_with: CombineWith::And,
        ..SearchOptions::default()
    };

    let result = filter_contacts(&contacts, "ann springfield", options);
    assert_eq!(ids(&result), vec!["1", "3"]);

    let result = filter_contacts(&contacts, "annabelle springfield", options);
    assert_eq!(ids(&result), vec!["3"]);
}

#[test]
fn test_unchanged_query_is_not_recomputed() {
    let controller = SearchController::default();
    let snapshot = ContactSnapshot::loaded(directory(), 1);
    let mut state = ContactBookState::new();

    controller.on_search_value_change(&mut state, "oak");
    assert!(controller.evaluate(&mut state, &snapshot));

    controller.on_search_value_change(&mut state, "oak");
    assert!(!controller.evaluate(&mut state, &snapshot));
    assert_eq!(ids(state.filtered().unwrap()), vec!["2", "5"]);
}

#[test]
fn test_failed_load_shows_nothing() {
    use contact_book::services::ContactListState;

    let controller = SearchController::default();
    let snapshot = ContactSnapshot {
        state: ContactListState::Failed("An unexpected error occurred".to_string()),
        generation: 1,
    };
    let mut state = ContactBookState::new();

    controller.on_search_value_change(&mut state, "ann");
    assert!(!controller.evaluate(&mut state, &snapshot));
    assert!(controller.visible_contacts(&state, &snapshot).is_none());
}
