use core_regex::Regex;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn two_matches_each_capture_a_word_and_a_number() {
    let re = Regex::new(r"(\w+)\s+(\d+)").unwrap();
    let subject = chars("foo 123 bar 456 baz");

    let first = re.search(&subject, 0).unwrap();
    assert_eq!(first.get(0), Some((0, 7)));
    assert_eq!(first.get(1), Some((0, 3)));
    assert_eq!(first.get(2), Some((4, 7)));

    let (_, first_end) = first.get(0).unwrap();
    let second = re.search(&subject, first_end).unwrap();
    assert_eq!(second.get(0), Some((8, 15)));
    assert_eq!(second.get(1), Some((8, 11)));
    assert_eq!(second.get(2), Some((12, 15)));
}

#[test]
fn nullable_body_under_a_star_quantifier_terminates() {
    let re = Regex::new("(a?)*").unwrap();
    let caps = re.search(&chars("aaab"), 0).unwrap();
    assert_eq!(caps.get(0), Some((0, 3)));
}

#[test]
fn empty_group_under_a_star_quantifier_terminates() {
    let re = Regex::new("()*b").unwrap();
    let caps = re.search(&chars("b"), 0).unwrap();
    assert_eq!(caps.get(0), Some((0, 1)));
}

#[test]
fn alternation_with_an_empty_branch_under_a_star_quantifier_terminates() {
    let re = Regex::new("(a|)*b").unwrap();
    let caps = re.search(&chars("aab"), 0).unwrap();
    assert_eq!(caps.get(0), Some((0, 3)));
}
