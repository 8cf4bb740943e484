use std::cmp::Ordering;

use serde_json::Value;

use crate::node::{Node, Tree};

/// Sort siblings by a named attribute.
///
/// Folders always precede other nodes regardless of direction. Within the
/// same group values compare naturally (strings) or numerically (numbers);
/// missing, null and empty values sort first. Equal keys keep their original
/// relative order.
pub fn sort_tree(
    tree: &[Node],
    key: &str,
    ascending: bool,
    recursive: bool,
) -> Tree {
    let mut result = tree.to_vec();
    sort_level(&mut result, key, ascending, recursive);
    result
}

fn sort_level(nodes: &mut [Node], key: &str, ascending: bool, recursive: bool) {
    nodes.sort_by(|left, right| {
        match (!left.is_folder()).cmp(&(!right.is_folder())) {
            Ordering::Equal => {
                let ord = compare_values(
                    left.attribute(key).as_ref(),
                    right.attribute(key).as_ref(),
                );
                if ascending { ord } else { ord.reverse() }
            },
            other => other,
        }
    });

    if recursive {
        for node in nodes.iter_mut() {
            sort_level(&mut node.children, key, ascending, recursive);
        }
    }
}

/// Compare two attribute values for sorting.
///
/// Missing values sort first, then numbers (including numeric strings),
/// then any other text.
pub fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (sort_key(left), sort_key(right)) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Less,
        (_, SortKey::Missing) => Ordering::Greater,
        (SortKey::Number(l), SortKey::Number(r)) => compare_numbers(l, r),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        (SortKey::Text(l), SortKey::Text(r)) => compare_natural(&l, &r),
    }
}

enum SortKey {
    Missing,
    Number(f64),
    Text(String),
}

fn sort_key(value: Option<&Value>) -> SortKey {
    match value {
        None | Some(Value::Null) => SortKey::Missing,
        Some(Value::Number(number)) => {
            number.as_f64().map_or(SortKey::Missing, SortKey::Number)
        },
        Some(Value::String(text)) if text.is_empty() => SortKey::Missing,
        Some(Value::String(text)) => match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => SortKey::Number(number),
            _ => SortKey::Text(text.clone()),
        },
        Some(other) => SortKey::Text(other.to_string()),
    }
}

fn compare_numbers(left: f64, right: f64) -> Ordering {
    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}

/// Natural string order: digit runs compare by value, text runs compare
/// case-insensitively first with a case-sensitive tiebreak.
pub fn compare_natural(left: &str, right: &str) -> Ordering {
    let mut left_runs = Runs::new(left);
    let mut right_runs = Runs::new(right);

    loop {
        let ord = match (left_runs.next(), right_runs.next()) {
            (Some(Run::Digits(l)), Some(Run::Digits(r))) => compare_digits(l, r),
            (Some(Run::Text(l)), Some(Run::Text(r))) => compare_text(l, r),
            (Some(Run::Digits(_)), Some(Run::Text(_))) => Ordering::Less,
            (Some(Run::Text(_)), Some(Run::Digits(_))) => Ordering::Greater,
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => return left.cmp(right),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Run<'a> {
    Text(&'a str),
    Digits(&'a str),
}

/// Splits a string into alternating text and ASCII digit runs.
struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Runs<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, ch)| ch.is_ascii_digit() != digits)
            .map_or(self.rest.len(), |(index, _)| index);
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits { Run::Digits(run) } else { Run::Text(run) })
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

fn compare_digits(left: &str, right: &str) -> Ordering {
    let left_value = strip_zeros(left);
    let right_value = strip_zeros(right);
    left_value
        .len()
        .cmp(&right_value.len())
        .then_with(|| left_value.cmp(right_value))
        .then_with(|| left.len().cmp(&right.len()))
}

fn strip_zeros(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}
