use super::*;
use crate::test_helpers::sample_user;

fn people() -> Vec<User> {
    let mut ana = sample_user("ana");
    ana.full_name = "Ana Ruiz".to_owned();
    let mut luis = sample_user("luis");
    luis.full_name = "Luis Gomez".to_owned();
    luis.email = "lgomez@corp.example".to_owned();
    vec![ana, luis]
}

#[test]
fn matches_name_or_email() {
    let users = people();
    let by_name: Vec<&str> = search_users(&users, "RUIZ").iter().map(|u| u.id.as_str()).collect();
    assert_eq!(by_name, vec!["ana"]);

    let by_email: Vec<&str> = search_users(&users, "corp").iter().map(|u| u.id.as_str()).collect();
    assert_eq!(by_email, vec!["luis"]);
}

#[test]
fn blank_term_returns_everyone() {
    assert_eq!(search_users(&people(), "   ").len(), 2);
    assert!(search_users(&people(), "zzz").is_empty());
}

#[test]
fn term_is_matched_untrimmed() {
    let users = people();
    assert!(search_users(&users, "ruiz ").is_empty());
    let spaced: Vec<&str> = search_users(&users, "ana r").iter().map(|u| u.id.as_str()).collect();
    assert_eq!(spaced, vec!["ana"]);
}
