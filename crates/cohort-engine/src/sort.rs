//! Column sorting for the records table.

use crate::record::{Age, Field, Record};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Selected sort column and direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SortState {
    pub field: Field,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(Field::FirstName, SortDirection::Ascending)
    }
}

impl SortState {
    pub fn new(field: Field, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header click: the active field flips direction, any other field is
    /// selected ascending.
    pub fn toggle(&mut self, field: Field) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Parse `FIELD` or `FIELD:asc|desc`.
    pub fn parse(s: &str) -> Option<Self> {
        let (name, direction) = match s.rsplit_once(':') {
            Some((name, dir)) => (name, SortDirection::parse(dir)?),
            None => (s, SortDirection::Ascending),
        };
        Some(Self::new(Field::from_name(name)?, direction))
    }
}

/// Ascending comparison of two records on `field`.
///
/// Ages order numeric values first, numerically, then unparsed text with
/// [`collate`]. Every other field compares by display text with [`collate`].
pub fn compare(a: &Record, b: &Record, field: Field) -> Ordering {
    if field == Field::Age {
        return compare_age(&a.age, &b.age);
    }
    collate(&field.value(a), &field.value(b))
}

fn compare_age(a: &Age, b: &Age) -> Ordering {
    match (a, b) {
        (Age::Years(x), Age::Years(y)) => x.cmp(y),
        (Age::Years(_), Age::Unparsed(_)) => Ordering::Less,
        (Age::Unparsed(_), Age::Years(_)) => Ordering::Greater,
        (Age::Unparsed(x), Age::Unparsed(y)) => collate(x, y),
    }
}

/// Case-insensitive text ordering.
///
/// Letters are compared lowercased with common Latin diacritics folded onto
/// their base letter, so "émile" sorts next to "emile". Strings equal under
/// that folding fall back to their lowercase code points; case alone never
/// separates two values.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .cmp(b.chars().flat_map(char::to_lowercase).map(fold_diacritic));
    folded.then_with(|| {
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
    })
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è'..='ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ì'..='ï' | 'ī' | 'į' => 'i',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ù'..='ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' | 'ś' => 's',
        'ž' | 'ź' | 'ż' => 'z',
        other => other,
    }
}

/// A new vector of `records` ordered by `state`.
///
/// The sort is unstable: records with equal keys come out in no particular
/// order.
pub fn sorted<'a, I>(records: I, state: SortState) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut out: Vec<&Record> = records.into_iter().collect();
    out.sort_unstable_by(|a, b| state.direction.apply(compare(a, b, state.field)));
    out
}
