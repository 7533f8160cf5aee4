//! Reference designator ordering, grouping and condensed display

use crate::types::ResolvedComponent;
use std::collections::BTreeMap;

/// Separator placed between the ends of a collapsed list
pub const ELLIPSIS: &str = "…";

/// Joined three-member lists longer than this collapse to `first…last`
const MAX_TRIPLE_WIDTH: usize = 9;

/// Type prefix of a designator: everything except the digits
pub fn component_type(designator: &str) -> String {
    designator.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Numeric part of a designator; 0 when there are no digits
pub fn designator_number(designator: &str) -> u64 {
    let digits: String = designator.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Sort key of a designator: (type prefix, number)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub kind: String,
    pub number: u64,
}

impl SortKey {
    pub fn new(designator: &str) -> Self {
        Self {
            kind: component_type(designator),
            number: designator_number(designator),
        }
    }
}

/// Sort designators by type, then by number within a type.
///
/// Done as two stable passes (number first, then type), so designators with
/// equal keys keep their input order.
pub fn sort_designators<I, S>(designators: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut keyed: Vec<(SortKey, String)> = designators
        .into_iter()
        .map(Into::into)
        .map(|d| (SortKey::new(&d), d))
        .collect();
    keyed.sort_by_key(|(key, _)| key.number);
    keyed.sort_by(|(a, _), (b, _)| a.kind.cmp(&b.kind));
    keyed.into_iter().map(|(_, d)| d).collect()
}

/// Designators sharing a type and a resolved name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignatorGroup {
    pub kind: String,
    pub name: Vec<String>,
    pub members: Vec<String>,
}

impl DesignatorGroup {
    fn start(kind: String, designator: &str, component: &ResolvedComponent) -> Self {
        Self {
            kind,
            name: component.name.clone(),
            members: vec![designator.to_string()],
        }
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Condensed designator list for display
    pub fn condensed(&self) -> String {
        condense_designators(&self.members)
    }
}

/// Group sorted designators into same-type, same-name clusters.
///
/// Each group starts at the first unconsumed designator and absorbs the
/// following ones until the type or the name changes. Designators absent from
/// `components` are ignored.
pub fn group_designators(sorted: &[String], components: &BTreeMap<String, ResolvedComponent>) -> Vec<DesignatorGroup> {
    let mut groups: Vec<DesignatorGroup> = Vec::new();

    for designator in sorted {
        let Some(component) = components.get(designator) else {
            continue;
        };
        let kind = component_type(designator);

        match groups.last_mut() {
            Some(group) if group.kind == kind && group.name == component.name => {
                group.members.push(designator.clone());
            }
            _ => groups.push(DesignatorGroup::start(kind, designator, component)),
        }
    }

    groups
}

/// One group per designator, in sorted order
pub fn single_groups(sorted: &[String], components: &BTreeMap<String, ResolvedComponent>) -> Vec<DesignatorGroup> {
    sorted
        .iter()
        .filter_map(|d| {
            let component = components.get(d)?;
            Some(DesignatorGroup::start(component_type(d), d, component))
        })
        .collect()
}

/// Condensed display of a group's designator list.
///
/// One or two members are listed, three are listed unless the joined text is
/// wider than nine characters, and anything longer becomes `first…last`.
pub fn condense_designators(designators: &[String]) -> String {
    match designators {
        [] => String::new(),
        [single] => single.clone(),
        [a, b] => format!("{}, {}", a, b),
        [first, _, last] => {
            let joined = designators.join(", ");
            if joined.chars().count() > MAX_TRIPLE_WIDTH {
                format!("{}{}{}", first, ELLIPSIS, last)
            } else {
                joined
            }
        }
        [first, .., last] => format!("{}{}{}", first, ELLIPSIS, last),
    }
}
